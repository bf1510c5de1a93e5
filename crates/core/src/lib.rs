//! size-report-core - Parsing and diffing of size-limit measurements
//!
//! This crate holds the pure part of size-report: it never spawns processes,
//! touches the network or persists anything. Callers hand it two raw
//! payloads and get back a table of display strings.
//!
//! # Features
//!
//! - Parse size-limit JSON output into a [`Snapshot`]
//! - Compare a base and a current snapshot, with optional noise filtering
//! - Format byte sizes, timings and percentage changes for display
//!
//! # Example
//!
//! ```
//! use size_report_core::{format_results, parse_margin, parse_results, FormatOptions};
//!
//! let base = parse_results(r#"[{"name": "dist/index.js", "size": "110894"}]"#).unwrap();
//! let current = parse_results(r#"[{"name": "dist/index.js", "size": 100894}]"#).unwrap();
//!
//! let options = FormatOptions {
//!     size_margin: parse_margin("non-zero").unwrap(),
//! };
//! let table = format_results(&base, &current, &options);
//!
//! assert_eq!(table[1], vec!["dist/index.js", "98.53 KB (-9.02% 🔽)"]);
//! ```

pub mod compare;
pub mod data;
pub mod error;
pub mod fmt;
pub mod parser;

pub use compare::{
    format_results, get_change, parse_margin, FormatOptions, Margin, ReportKind, Table,
    SIZE_RESULTS_HEADER, TIME_RESULTS_HEADER,
};
pub use data::{MeasurementRecord, Snapshot, Timing};
pub use error::{Error, Result};
pub use fmt::{format_bytes, format_change, format_time};
pub use parser::parse_results;
