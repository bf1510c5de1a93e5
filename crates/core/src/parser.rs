//! Parser for size-limit JSON output
//!
//! size-limit prints an array of records:
//! ```text
//! [{ "name": "dist/index.js", "passed": true, "size": "110894",
//!    "loading": "2.1658984375", "running": "0.10210999999999999" }]
//! ```
//! Numbers may come as JSON numbers or numeric strings. `passed` is ignored.

use crate::data::{MeasurementRecord, Snapshot};
use crate::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A number that size-limit may emit either bare or quoted
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn to_f64(&self) -> std::result::Result<f64, String> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("expected a number, found {:?}", s))?,
        };

        if !value.is_finite() || value < 0.0 {
            return Err(format!("expected a non-negative number, found {}", value));
        }

        Ok(value)
    }
}

fn size_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let value = NumberOrString::deserialize(deserializer)?
        .to_f64()
        .map_err(D::Error::custom)?;

    if value.fract() != 0.0 || value >= u64::MAX as f64 {
        return Err(D::Error::custom(format!(
            "expected a whole number of bytes, found {}",
            value
        )));
    }

    Ok(value as u64)
}

// Only called when the field is present; a present `null` counts as zero.
fn seconds_from_any<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => value.to_f64().map(Some).map_err(D::Error::custom),
        None => Ok(Some(0.0)),
    }
}

/// A record as size-limit prints it
#[derive(Deserialize)]
struct RawRecord {
    name: String,
    #[serde(deserialize_with = "size_from_any")]
    size: u64,
    #[serde(default, deserialize_with = "seconds_from_any")]
    loading: Option<f64>,
    #[serde(default, deserialize_with = "seconds_from_any")]
    running: Option<f64>,
}

impl From<RawRecord> for MeasurementRecord {
    fn from(raw: RawRecord) -> Self {
        // Timing is all-or-nothing: one field alone is dropped.
        match (raw.loading, raw.running) {
            (Some(loading), Some(running)) => {
                MeasurementRecord::with_timing(raw.name, raw.size, loading, running)
            }
            _ => MeasurementRecord::new(raw.name, raw.size),
        }
    }
}

/// Parse size-limit output into a snapshot
///
/// Later records with an already seen name replace earlier ones.
pub fn parse_results(output: &str) -> Result<Snapshot> {
    let raw: Vec<RawRecord> = serde_json::from_str(output)?;
    Ok(raw.into_iter().map(MeasurementRecord::from).collect())
}
