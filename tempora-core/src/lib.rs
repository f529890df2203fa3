//! tempora-core
//!
//! Core engine of the tempora workspace: the series data model and every
//! operation on it.
//!
//! - `series`: cells, univariate and multivariate series, the `TimeSeries`
//!   sum type.
//! - `frequency`: cadence inference, grids, and normalization support.
//! - `sample`: start-index policies behind windowed sampling.
//! - `format`: the textual codecs used for prompt assembly.
//! - `metrics`: forecast accuracy measures.
//!
//! Everything here is synchronous and operates on owned in-memory data;
//! the tabular file layer lives in the `tempora` facade crate.
#![warn(missing_docs)]

pub(crate) mod dedup;
/// Textual codecs for prompt-friendly renderings.
pub mod format;
/// Cadence inference and timestamp grids.
pub mod frequency;
pub(crate) mod impute;
/// Forecast accuracy measures.
pub mod metrics;
pub(crate) mod normalize;
/// Start-index policies for windowed sampling.
pub mod sample;
/// The series data model.
pub mod series;
pub(crate) mod stats;
/// Timestamp rendering and day-first disambiguating parsing.
pub mod timeparse;

pub use format::{from_str, to_str};
pub use frequency::{Frequency, date_range};
pub use metrics::Metrics;
pub use series::{Column, Datum, MultiSeries, TimeSeries, UniSeries};
