use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::TemporaError;

/// Start-index selection policy for windowed sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleMethod {
    /// Sequential non-overlapping pairs from the beginning of the series.
    Frontend,
    /// Sequential non-overlapping pairs ending at the series tail.
    Backend,
    /// Distinct start indices drawn uniformly without replacement, sorted.
    Random,
    /// Start indices spread evenly across the legal range.
    Uniform,
}

impl SampleMethod {
    /// Stable lowercase identifier for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Random => "random",
            Self::Uniform => "uniform",
        }
    }
}

impl fmt::Display for SampleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleMethod {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frontend" => Ok(Self::Frontend),
            "backend" => Ok(Self::Backend),
            "random" => Ok(Self::Random),
            "uniform" => Ok(Self::Uniform),
            other => Err(TemporaError::invalid_arg(
                format!("Unknown sampling: {other}"),
                "frontend, backend, random, uniform",
            )),
        }
    }
}

/// Policy for resolving repeated index entries.
///
/// `Sum` applies to a single-column series; `SumFirst`/`SumLast` are the
/// multi-column equivalents that sum numeric columns per duplicate group and
/// keep the first/last categorical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggMethod {
    /// Keep the first occurrence per duplicated index entry.
    First,
    /// Keep the last occurrence per duplicated index entry.
    Last,
    /// Sum all values per duplicate group (single-column series).
    Sum,
    /// Sum numeric columns, keep the first categorical value per group.
    SumFirst,
    /// Sum numeric columns, keep the last categorical value per group.
    SumLast,
}

impl AggMethod {
    /// Stable lowercase identifier for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Sum => "sum",
            Self::SumFirst => "sumf",
            Self::SumLast => "suml",
        }
    }
}

impl fmt::Display for AggMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggMethod {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "sum" => Ok(Self::Sum),
            "sumf" => Ok(Self::SumFirst),
            "suml" => Ok(Self::SumLast),
            other => Err(TemporaError::invalid_arg(
                format!("Invalid method: {other}"),
                "first, last, sum, sumf, suml",
            )),
        }
    }
}
