use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::TemporaError;

/// The nine textual representations a series can be rendered to and parsed
/// back from.
///
/// The enum is closed: every variant has both an encoder and a decoder, and
/// dispatch over it is match-exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextFormat {
    /// Whole series as a single bracketed literal sequence, no index.
    Array,
    /// Comma-separated rows with each value wrapped in `[ ]`.
    Context,
    /// Comma-separated values with a header line.
    Csv,
    /// Separator-delimited rows, `|` by default.
    Custom,
    /// Array of JSON objects, one per row, index key first.
    Json,
    /// Pipe-delimited table with a `---` separator row.
    Markdown,
    /// One `key: value, key: value` line per row.
    Plain,
    /// Comma-separated rows with a trend arrow after each value column.
    Symbol,
    /// Tab-separated values with a header line.
    Tsv,
}

impl TextFormat {
    /// All formats, in stable order.
    pub const ALL: [Self; 9] = [
        Self::Array,
        Self::Context,
        Self::Csv,
        Self::Custom,
        Self::Json,
        Self::Markdown,
        Self::Plain,
        Self::Symbol,
        Self::Tsv,
    ];

    /// Stable lowercase identifier for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Context => "context",
            Self::Csv => "csv",
            Self::Custom => "custom",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Plain => "plain",
            Self::Symbol => "symbol",
            Self::Tsv => "tsv",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextFormat {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "context" => Ok(Self::Context),
            "csv" => Ok(Self::Csv),
            "custom" => Ok(Self::Custom),
            "json" => Ok(Self::Json),
            "markdown" => Ok(Self::Markdown),
            "plain" => Ok(Self::Plain),
            "symbol" => Ok(Self::Symbol),
            "tsv" => Ok(Self::Tsv),
            other => Err(TemporaError::invalid_arg(
                format!("Unknown format: {other}"),
                "array, context, csv, custom, json, markdown, plain, symbol, tsv",
            )),
        }
    }
}

/// How numeric values are rendered inside a textual representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Plain numeric literals.
    #[default]
    Numeric,
    /// Each numeric value spelled out character by character, joined with
    /// single spaces (`123.4` becomes `1 2 3 . 4`), which tokenizes better
    /// for language models.
    Textual,
}

impl ValueKind {
    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Textual => "textual",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_roundtrip() {
        for f in TextFormat::ALL {
            assert_eq!(f.as_str().parse::<TextFormat>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_format_is_named_in_error() {
        let err = "xml".parse::<TextFormat>().unwrap_err();
        assert!(err.to_string().contains("xml"));
        assert!(err.to_string().contains("markdown"));
    }
}
