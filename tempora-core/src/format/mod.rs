//! Textual codecs: render a series into one of the prompt-friendly formats
//! and parse such a rendering back into a series.
//!
//! Encoding is exact for present data; the `array` format is lossy (it
//! carries no timestamps, so parsing synthesizes an index) and the `symbol`
//! format drops its direction columns on the way back in.

mod decode;
mod encode;
mod textual;

pub use decode::{
    from_array, from_context, from_csv, from_custom, from_json, from_markdown, from_plain,
    from_symbol, from_tsv,
};
pub use encode::{
    to_array, to_context, to_csv, to_custom, to_json, to_markdown, to_plain, to_symbol, to_tsv,
};
pub use textual::encode as encode_textual;

use tempora_types::{TemporaError, TextFormat, ValueKind};

use crate::series::TimeSeries;

/// Default separator for the `custom` format.
pub const DEFAULT_CUSTOM_SEP: &str = "|";

/// Render a series in the given format.
///
/// With [`ValueKind::Textual`] the cells are digit-spaced before rendering.
///
/// # Errors
/// Propagates encoder failures; all formats in [`TextFormat`] are supported.
pub fn to_str(ts: &TimeSeries, format: TextFormat, kind: ValueKind) -> Result<String, TemporaError> {
    let encoded;
    let ts = match kind {
        ValueKind::Numeric => ts,
        ValueKind::Textual => {
            encoded = encode_textual(ts);
            &encoded
        }
    };
    match format {
        TextFormat::Array => Ok(to_array(ts)),
        TextFormat::Context => Ok(to_context(ts)),
        TextFormat::Csv => Ok(to_csv(ts)),
        TextFormat::Custom => Ok(to_custom(ts, DEFAULT_CUSTOM_SEP)),
        TextFormat::Json => to_json(ts),
        TextFormat::Markdown => Ok(to_markdown(ts)),
        TextFormat::Plain => Ok(to_plain(ts)),
        TextFormat::Symbol => Ok(to_symbol(ts)),
        TextFormat::Tsv => Ok(to_tsv(ts)),
    }
}

/// Parse a rendering produced by [`to_str`] back into a series.
///
/// Digit-spaced textual cells decode back into numbers regardless of the
/// value kind they were rendered with.
///
/// # Errors
/// Returns `TemporaError::Parse` for malformed input.
pub fn from_str(input: &str, format: TextFormat) -> Result<TimeSeries, TemporaError> {
    match format {
        TextFormat::Array => from_array(input),
        TextFormat::Context => from_context(input),
        TextFormat::Csv => from_csv(input),
        TextFormat::Custom => from_custom(input, DEFAULT_CUSTOM_SEP),
        TextFormat::Json => from_json(input),
        TextFormat::Markdown => from_markdown(input),
        TextFormat::Plain => from_plain(input),
        TextFormat::Symbol => from_symbol(input),
        TextFormat::Tsv => from_tsv(input),
    }
}
