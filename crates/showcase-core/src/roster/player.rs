// Player and combine-stat records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date of birth layouts seen in roster sheets.
const DOB_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

/// Preferred kicking foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Foot {
    #[default]
    Right,
    Left,
    Both,
}

impl Foot {
    /// Parse a spreadsheet cell into a Foot.
    ///
    /// Accepts the full names case-insensitively plus the single-letter
    /// shorthands "R" and "L". Returns `None` for anything else, including
    /// the empty string.
    pub fn from_cell(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "right" | "r" => Some(Foot::Right),
            "left" | "l" => Some(Foot::Left),
            "both" => Some(Foot::Both),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Foot::Right => "Right",
            Foot::Left => "Left",
            Foot::Both => "Both",
        }
    }
}

impl fmt::Display for Foot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// One normalized combine measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub label: String,
    /// Normalized score, always within 0..=100.
    pub value: u8,
    /// Raw reading with its unit suffix, or "-" when no reading was given.
    pub display_value: String,
}

/// A fully normalized player record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub number: String,
    pub position: String,
    pub bio: String,
    pub origin: String,
    pub current_team: String,
    /// Squad name or id from the sheet. Only used for team assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_team: Option<String>,
    pub height: String,
    pub foot: Foot,
    pub gpa: String,
    pub eligibility: String,
    pub dob: String,
    pub is_signed: bool,
    pub image: String,
    /// Speed, Broad Jump, CMJ, in that order.
    pub stats: Vec<Stat>,
}

impl Player {
    /// Jersey number as an integer for roster ordering.
    ///
    /// Reads the leading integer of the trimmed `number` field ("7" -> 7,
    /// "10a" -> 10). Anything without a leading integer sorts as 0.
    pub fn jersey_number(&self) -> i64 {
        leading_int(&self.number).unwrap_or(0)
    }

    /// Date of birth, when `dob` is `DD.MM.YYYY` or `YYYY-MM-DD`.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let dob = self.dob.trim();
        DOB_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(dob, fmt).ok())
    }

    /// Age in whole years on `today`. `None` when the date of birth does not
    /// parse or lies after `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        today.years_since(self.birth_date()?)
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
