//! tempora
//!
//! Time-series preparation and prompt assembly for LLM forecasting.
//!
//! This facade crate re-exports the data model and codec from
//! `tempora-core`, adds the tabular file layer (`io`), and the prompt
//! assembler (`prompt`).
//!
//! ```
//! use tempora::{Datum, TimeSeries, TextFormat, ValueKind, from_str};
//!
//! let text = "date,sales\n2021-01-01 00:00:00,5.0\n2021-01-02 00:00:00,7.5";
//! let ts = from_str(text, TextFormat::Csv).unwrap();
//! assert_eq!(ts.len(), 2);
//! assert_eq!(ts.to_str(TextFormat::Csv, ValueKind::Numeric).unwrap(), text);
//! ```
#![warn(missing_docs)]

/// Tabular file layer (`read_file` / `to_file`).
pub mod io;
/// Forecasting prompt assembly.
pub mod prompt;

pub use io::{read_file, to_file};
pub use prompt::{PromptBuilder, PromptKind};
pub use tempora_core::{
    Column, Datum, Frequency, Metrics, MultiSeries, TimeSeries, UniSeries, date_range, format,
    from_str, sample, series, timeparse, to_str,
};
pub use tempora_types::{AggMethod, SampleMethod, TemporaError, TextFormat, ValueKind};
