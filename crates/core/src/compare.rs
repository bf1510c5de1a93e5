//! Snapshot comparison and report table assembly

use crate::data::{MeasurementRecord, Snapshot};
use crate::error::{Error, Result};
use crate::fmt::{format_bytes, format_change, format_time};
use std::str::FromStr;

/// Header of a report without timing columns
pub const SIZE_RESULTS_HEADER: [&str; 2] = ["Path", "Size"];

/// Header of a report with timing columns
pub const TIME_RESULTS_HEADER: [&str; 5] = [
    "Path",
    "Size",
    "Loading time (3g)",
    "Running time (snapdragon)",
    "Total time",
];

/// Report rows; row 0 is the header
pub type Table = Vec<Vec<String>>;

/// Threshold below which a size change is left out of the report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    /// Any change in bytes is significant
    NonZero,
    /// Absolute change in bytes must reach this value
    Size(f64),
    /// Absolute change in percentage points must reach this value
    Pct(f64),
}

impl Margin {
    /// Whether a size change from `base` to `current` passes this margin
    pub fn is_significant(&self, base: u64, current: u64) -> bool {
        let raw_change = current as f64 - base as f64;
        match *self {
            Margin::NonZero => raw_change != 0.0,
            Margin::Size(value) => raw_change.abs() >= value,
            Margin::Pct(value) => get_change(base as f64, current as f64).abs() >= value,
        }
    }
}

impl FromStr for Margin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "non-zero" {
            return Ok(Margin::NonZero);
        }

        let invalid = || Error::InvalidMargin(s.to_string());
        let number = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };

        match s.strip_suffix('%') {
            Some(pct) => number(pct).map(Margin::Pct),
            None => number(s).map(Margin::Size),
        }
    }
}

/// Parse a margin setting; an empty string means no filtering
pub fn parse_margin(input: &str) -> Result<Option<Margin>> {
    if input.is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}

/// Options for [`format_results`]
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Size changes below this margin are dropped from size reports
    pub size_margin: Option<Margin>,
}

/// Shape of a report, decided once for the whole table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Size,
    Time,
}

impl ReportKind {
    /// A single untimed artifact in `current` makes the whole report size-only
    pub fn classify(current: &Snapshot) -> Self {
        if current.iter().any(|r| r.timing.is_none()) {
            ReportKind::Size
        } else {
            ReportKind::Time
        }
    }

    pub fn header(self) -> Vec<String> {
        let header: &[&str] = match self {
            ReportKind::Size => &SIZE_RESULTS_HEADER,
            ReportKind::Time => &TIME_RESULTS_HEADER,
        };
        header.iter().map(|h| h.to_string()).collect()
    }
}

/// Percentage change from `base` to `current`; a zero base counts as +100
pub fn get_change(base: f64, current: f64) -> f64 {
    if base == 0.0 {
        return 100.0;
    }
    ((current - base) / base) * 100.0
}

fn format_line(value: &str, change: &str) -> String {
    format!("{} ({})", value, change)
}

fn format_size_result(
    name: &str,
    base: &MeasurementRecord,
    current: &MeasurementRecord,
    options: &FormatOptions,
) -> Option<Vec<String>> {
    if let Some(margin) = &options.size_margin {
        if !margin.is_significant(base.size, current.size) {
            return None;
        }
    }

    Some(vec![
        name.to_string(),
        format_line(
            &format_bytes(current.size),
            &format_change(base.size as f64, current.size as f64),
        ),
    ])
}

fn format_time_result(
    name: &str,
    base: &MeasurementRecord,
    current: &MeasurementRecord,
) -> Vec<String> {
    vec![
        name.to_string(),
        format_line(
            &format_bytes(current.size),
            &format_change(base.size as f64, current.size as f64),
        ),
        format_line(
            &format_time(current.loading()),
            &format_change(base.loading(), current.loading()),
        ),
        format_line(
            &format_time(current.running()),
            &format_change(base.running(), current.running()),
        ),
        format_time(current.total().unwrap_or(0.0)),
    ]
}

/// Names of both snapshots: base order first, then names new in current
fn union_names<'a>(base: &'a Snapshot, current: &'a Snapshot) -> Vec<&'a str> {
    base.names()
        .chain(current.names().filter(|name| !base.contains(name)))
        .collect()
}

/// Compare two snapshots and build the report table
///
/// An artifact missing on one side is compared against an empty record, so
/// it shows up as a 100% increase or decrease. Margins only apply to size
/// reports.
pub fn format_results(base: &Snapshot, current: &Snapshot, options: &FormatOptions) -> Table {
    let kind = ReportKind::classify(current);

    let mut table = vec![kind.header()];
    for name in union_names(base, current) {
        let empty = MeasurementRecord::empty();
        let base_result = base.get(name).unwrap_or(&empty);
        let current_result = current.get(name).unwrap_or(&empty);

        let row = match kind {
            ReportKind::Size => format_size_result(name, base_result, current_result, options),
            ReportKind::Time => Some(format_time_result(name, base_result, current_result)),
        };
        table.extend(row);
    }

    table
}
