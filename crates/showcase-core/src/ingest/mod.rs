// Roster sheet ingestion.
//
// CSV text -> `SheetRow` records (the single parsing boundary) -> optional
// bounds pass over every row -> one `Player` per row, in sheet order.

pub mod image;
pub mod normalize;
pub mod stats;

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

use crate::config::{ScoringConfig, ScoringStrategy};
use crate::roster::player::Player;
use stats::{observed_bounds, MetricBounds};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structural failure reading the sheet. Field-level problems never surface
/// here; they resolve to defaults during normalization.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Sheet row
// ---------------------------------------------------------------------------

/// One spreadsheet line, keyed by trimmed column name.
///
/// Every column is optional; an absent column reads as an empty string.
/// Extra columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Number")]
    pub number: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Bio")]
    pub bio: String,
    #[serde(rename = "Image_URL")]
    pub image_url: String,
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "CurrentTeam")]
    pub current_team: String,
    #[serde(rename = "Showcase_Team")]
    pub showcase_team: String,
    /// Older sheets label the showcase squad column `Team`.
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Height")]
    pub height: String,
    #[serde(rename = "Foot")]
    pub foot: String,
    #[serde(rename = "GPA")]
    pub gpa: String,
    #[serde(rename = "Eligibility")]
    pub eligibility: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "Date_of_Birth")]
    pub date_of_birth: String,
    #[serde(rename = "Birthday")]
    pub birthday: String,
    #[serde(rename = "Speed_40yd")]
    pub speed_40yd: String,
    #[serde(rename = "Broad_Jump")]
    pub broad_jump: String,
    #[serde(rename = "CMJ_Vert")]
    pub cmj_vert: String,
}

impl SheetRow {
    /// Raw combine readings in [`stats::Metric::ALL`] order.
    pub fn readings(&self) -> [&str; 3] {
        [
            self.speed_40yd.as_str(),
            self.broad_jump.as_str(),
            self.cmj_vert.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Scoring context
// ---------------------------------------------------------------------------

/// Bounds and fallback used to score every row of one sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    pub bounds: MetricBounds,
    pub fallback: u8,
}

impl Scorer {
    /// Build the scorer for `rows` under the configured strategy. The
    /// dynamic strategy reads every row before any score is produced.
    pub fn for_rows(rows: &[SheetRow], scoring: &ScoringConfig) -> Self {
        let bounds = match scoring.strategy {
            ScoringStrategy::Fixed => MetricBounds::fixed(&scoring.fixed_bounds),
            ScoringStrategy::Dynamic => observed_bounds(rows.iter().map(SheetRow::readings)),
        };
        Scorer {
            bounds,
            fallback: scoring.fallback_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Read every data row of a sheet. Column names are trimmed and rows with
/// missing trailing cells are accepted. When two columns share a name after
/// trimming, the rightmost one wins.
pub fn read_rows<R: Read>(rdr: R) -> Result<Vec<SheetRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    let keep = last_occurrences(&headers);
    let kept_headers: csv::StringRecord = keep.iter().map(|&i| &headers[i]).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells: csv::StringRecord = keep
            .iter()
            .map(|&i| record.get(i).unwrap_or(""))
            .collect();
        rows.push(cells.deserialize(Some(&kept_headers))?);
    }
    Ok(rows)
}

/// Indices of the columns to read: for each distinct header name, the
/// position of its last occurrence, in column order.
fn last_occurrences(headers: &csv::StringRecord) -> Vec<usize> {
    let mut last: HashMap<&str, usize> = HashMap::new();
    for (i, name) in headers.iter().enumerate() {
        last.insert(name, i);
    }
    let mut keep: Vec<usize> = last.into_values().collect();
    keep.sort_unstable();
    keep
}

/// Map already-read rows to players, scoring against `scoring`.
pub fn normalize_rows(rows: &[SheetRow], scoring: &ScoringConfig) -> Vec<Player> {
    let scorer = Scorer::for_rows(rows, scoring);
    debug!(
        strategy = ?scoring.strategy,
        bounds = ?scorer.bounds,
        "scoring {} rows",
        rows.len()
    );
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize::normalize_row(row, index, &scorer))
        .collect()
}

/// Parse a whole sheet into players.
pub fn parse_players<R: Read>(rdr: R, scoring: &ScoringConfig) -> Result<Vec<Player>, IngestError> {
    let rows = read_rows(rdr)?;
    Ok(normalize_rows(&rows, scoring))
}

/// Parse sheet text into players.
pub fn parse_players_str(csv_text: &str, scoring: &ScoringConfig) -> Result<Vec<Player>, IngestError> {
    parse_players(csv_text.as_bytes(), scoring)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
