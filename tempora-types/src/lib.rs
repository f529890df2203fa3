//! Shared error type and closed enumerations for the tempora time-series toolkit.
#![warn(missing_docs)]

mod error;
mod format;
mod sampling;

pub use error::TemporaError;
pub use format::{TextFormat, ValueKind};
pub use sampling::{AggMethod, SampleMethod};
