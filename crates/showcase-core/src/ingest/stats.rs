// Combine stat scoring: raw readings -> 0-100 scores.
//
// Bounds come either from configuration (fixed strategy) or from a first
// pass over every row in the sheet (dynamic strategy). The pass is a pure
// function so it can be tested apart from the row mapping.

use serde::Deserialize;

use crate::config::FixedBounds;
use crate::roster::player::Stat;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The three measured combine attributes, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Sprint40,
    BroadJump,
    CmjVert,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Sprint40, Metric::BroadJump, Metric::CmjVert];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Sprint40 => "40 Yard Dash",
            Metric::BroadJump => "Broad Jump",
            Metric::CmjVert => "CMJ (Vert)",
        }
    }

    /// Sheet column the raw reading is read from.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Sprint40 => "Speed_40yd",
            Metric::BroadJump => "Broad_Jump",
            Metric::CmjVert => "CMJ_Vert",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Sprint40 => "s",
            Metric::BroadJump | Metric::CmjVert => "cm",
        }
    }

    /// Sprint times improve as they drop; jumps improve as they grow.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Sprint40)
    }

    fn index(&self) -> usize {
        match self {
            Metric::Sprint40 => 0,
            Metric::BroadJump => 1,
            Metric::CmjVert => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Interpolation range for one metric. `min` is always the numerically
/// smaller value, whatever the metric's polarity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Spread below which bounds are treated as degenerate.
const SPREAD_EPSILON: f64 = 1e-9;

/// Per-metric bounds. A metric without bounds scores every reading with
/// the fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricBounds {
    bounds: [Option<Bounds>; 3],
}

impl MetricBounds {
    pub fn get(&self, metric: Metric) -> Option<Bounds> {
        self.bounds[metric.index()]
    }

    pub fn fixed(fixed: &FixedBounds) -> Self {
        let mut out = MetricBounds::default();
        for metric in Metric::ALL {
            out.bounds[metric.index()] = Some(fixed.get(metric));
        }
        out
    }
}

/// Compute the observed min/max of each metric across all rows.
///
/// Each item holds one row's raw readings in [`Metric::ALL`] order.
/// Unparsable and non-positive readings are ignored; a metric with no valid
/// reading gets no bounds.
pub fn observed_bounds<'a, I>(rows: I) -> MetricBounds
where
    I: IntoIterator<Item = [&'a str; 3]>,
{
    let mut out = MetricBounds::default();
    for readings in rows {
        for metric in Metric::ALL {
            let Some(value) = parse_reading(readings[metric.index()]) else {
                continue;
            };
            if value <= 0.0 {
                continue;
            }
            let slot = &mut out.bounds[metric.index()];
            *slot = Some(match *slot {
                Some(b) => Bounds {
                    min: b.min.min(value),
                    max: b.max.max(value),
                },
                None => Bounds {
                    min: value,
                    max: value,
                },
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Parsing and scoring
// ---------------------------------------------------------------------------

/// Parse a reading the way a spreadsheet user writes it: the longest leading
/// decimal number of the trimmed cell ("4.5s" -> 4.5, "260 cm" -> 260).
///
/// Returns `None` when the cell does not start with a number or the number
/// is not finite.
pub fn parse_reading(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < len && bytes[end] == b'.' {
        end += 1;
        while end < len && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when it carries digits.
    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Linear 0-100 score of `value` within `bounds`.
///
/// Lower-is-better metrics score 100 at `min` and 0 at `max`; the others the
/// reverse. The result is rounded and clamped, so readings outside the bounds
/// saturate instead of extrapolating. Degenerate bounds (`min == max`) score
/// 100.
pub fn score(value: f64, bounds: Bounds, lower_is_better: bool) -> u8 {
    let spread = bounds.max - bounds.min;
    if spread.abs() < SPREAD_EPSILON {
        return 100;
    }
    let raw = if lower_is_better {
        (bounds.max - value) / spread * 100.0
    } else {
        (value - bounds.min) / spread * 100.0
    };
    // NaN saturates to 0 in the cast.
    raw.round().clamp(0.0, 100.0) as u8
}

/// Score one raw cell for `metric` and build its display record.
///
/// A cell that does not parse, a reading that is not positive, or a metric
/// without bounds scores `fallback`. Non-positive readings are never
/// measurements: they are the same readings [`observed_bounds`] skips.
/// The display value is the trimmed cell plus the unit suffix, or "-" for
/// an empty cell; it does not depend on whether the cell parsed.
pub fn score_reading(raw: &str, metric: Metric, bounds: Option<Bounds>, fallback: u8) -> Stat {
    let cleaned = raw.trim();
    let measured = parse_reading(cleaned).filter(|v| *v > 0.0);
    let value = match (measured, bounds) {
        (Some(v), Some(b)) => score(v, b, metric.lower_is_better()),
        _ => fallback,
    };
    let display_value = if cleaned.is_empty() {
        "-".to_string()
    } else {
        format!("{cleaned}{}", metric.unit())
    };
    Stat {
        label: metric.label().to_string(),
        value,
        display_value,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
