// Row normalization: one `SheetRow` -> one `Player`, every field defaulted.

use tracing::warn;

use crate::ingest::image::transform_image;
use crate::ingest::stats::{score_reading, Metric};
use crate::ingest::{Scorer, SheetRow};
use crate::roster::player::{Foot, Player};

pub const DEFAULT_NAME: &str = "Unknown Player";
pub const DEFAULT_NUMBER: &str = "0";
pub const DEFAULT_POSITION: &str = "ATH";

/// Trimmed cell text.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

fn clean_or(value: &str, default: &str) -> String {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned.to_string()
    }
}

/// First candidate that is non-empty after trimming.
fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
}

fn resolve_foot(raw: &str, player_id: &str) -> Foot {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return Foot::default();
    }
    Foot::from_cell(cleaned).unwrap_or_else(|| {
        warn!("player '{player_id}': unrecognized foot '{cleaned}', using Right");
        Foot::default()
    })
}

/// Build a player from one sheet row. `index` is the row's 0-based position
/// among the data rows and seeds the generated id when the ID cell is blank.
///
/// Never fails: every missing or malformed cell resolves to a default.
pub fn normalize_row(row: &SheetRow, index: usize, scorer: &Scorer) -> Player {
    let id = clean_or(&row.id, &format!("gen-{index}"));

    let stats = Metric::ALL
        .iter()
        .zip(row.readings())
        .map(|(&metric, raw)| {
            score_reading(raw, metric, scorer.bounds.get(metric), scorer.fallback)
        })
        .collect();

    Player {
        name: clean_or(&row.name, DEFAULT_NAME),
        number: clean_or(&row.number, DEFAULT_NUMBER),
        position: clean_or(&row.position, DEFAULT_POSITION),
        bio: clean(&row.bio),
        image: transform_image(&row.image_url),
        origin: clean(&row.origin),
        current_team: clean(&row.current_team),
        showcase_team: first_non_empty(&[row.showcase_team.as_str(), row.team.as_str()])
            .map(str::to_string),
        height: clean(&row.height),
        foot: resolve_foot(&row.foot, &id),
        gpa: clean(&row.gpa),
        eligibility: clean(&row.eligibility),
        dob: first_non_empty(&[
            row.dob.as_str(),
            row.date_of_birth.as_str(),
            row.birthday.as_str(),
        ])
        .unwrap_or_default()
        .to_string(),
        is_signed: false,
        stats,
        id,
    }
}
