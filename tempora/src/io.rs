//! Tabular file layer: load a series from disk and write one back.
//!
//! The extension picks the engine. `.csv`, `.json`, and `.parquet` go
//! through the `polars` readers and writers; `.xlsx` reads via `calamine`
//! and writes via `rust_xlsxwriter`.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tempora_core::series::{Datum, TimeSeries};
use tempora_core::timeparse::render_timestamp;
use tempora_types::TemporaError;
use tracing::debug;

const SUPPORTED_EXTENSIONS: &str = ".csv, .xlsx, .json, .parquet";

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

fn file_err(e: impl std::fmt::Display) -> TemporaError {
    TemporaError::File(e.to_string())
}

fn read_dataframe(path: &Path) -> Result<DataFrame, TemporaError> {
    match extension(path).as_str() {
        "csv" => {
            let file = File::open(path).map_err(file_err)?;
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(100))
                .with_rechunk(true)
                .into_reader_with_file_handle(file)
                .finish()
                .map_err(file_err)
        }
        "json" => {
            let file = File::open(path).map_err(file_err)?;
            JsonReader::new(file).finish().map_err(file_err)
        }
        "parquet" => {
            let file = File::open(path).map_err(file_err)?;
            ParquetReader::new(file).finish().map_err(file_err)
        }
        other => Err(TemporaError::invalid_arg(
            format!("Unsupported extension: .{other}"),
            SUPPORTED_EXTENSIONS,
        )),
    }
}

fn sheet_text(v: &calamine::Data) -> String {
    use calamine::Data;
    match v {
        Data::String(s) => s.clone(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| dt.to_string(), render_timestamp),
        other => other.to_string(),
    }
}

fn sheet_datum(v: &calamine::Data) -> Datum {
    use calamine::Data;
    match v {
        Data::Empty | Data::Error(_) => Datum::Missing,
        Data::Float(f) => Datum::from(*f),
        Data::Int(i) => Datum::Number(*i as f64),
        Data::Bool(b) => Datum::Text(b.to_string()),
        Data::String(s) => Datum::parse(s),
        other => Datum::parse(&sheet_text(other)),
    }
}

fn read_xlsx(path: &Path, index_col: Option<&str>) -> Result<TimeSeries, TemporaError> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path).map_err(file_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TemporaError::File("workbook has no sheets".into()))?
        .map_err(file_err)?;
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| TemporaError::Data("file has no columns".into()))?;
    let names: Vec<String> = header.iter().map(sheet_text).collect();

    let idx_pos = match index_col {
        Some(c) => names.iter().position(|n| n == c).ok_or_else(|| {
            TemporaError::InvalidArg(format!("Index column '{c}' not found in data."))
        })?,
        None => 0,
    };
    let index_name = names[idx_pos].clone();

    let mut index = Vec::new();
    let mut columns: Vec<(String, Vec<Datum>)> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx_pos)
        .map(|(_, n)| (n.clone(), Vec::new()))
        .collect();
    for row in rows {
        index.push(sheet_text(&row[idx_pos]));
        let cells = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx_pos)
            .map(|(_, v)| sheet_datum(v));
        for (slot, cell) in columns.iter_mut().zip(cells) {
            slot.1.push(cell);
        }
    }
    debug!(path = %path.display(), rows = index.len(), "loaded worksheet");
    TimeSeries::from_rows(index_name, &index, columns)
}

fn cell_datum(v: &AnyValue) -> Datum {
    match v {
        AnyValue::Null => Datum::Missing,
        AnyValue::Float64(f) => Datum::from(*f),
        AnyValue::Float32(f) => Datum::from(f64::from(*f)),
        AnyValue::Int64(i) => Datum::Number(*i as f64),
        AnyValue::Int32(i) => Datum::Number(f64::from(*i)),
        AnyValue::Int16(i) => Datum::Number(f64::from(*i)),
        AnyValue::Int8(i) => Datum::Number(f64::from(*i)),
        AnyValue::UInt64(i) => Datum::Number(*i as f64),
        AnyValue::UInt32(i) => Datum::Number(f64::from(*i)),
        AnyValue::UInt16(i) => Datum::Number(f64::from(*i)),
        AnyValue::UInt8(i) => Datum::Number(f64::from(*i)),
        AnyValue::Boolean(b) => Datum::Text(b.to_string()),
        AnyValue::String(s) => Datum::parse(s),
        AnyValue::StringOwned(s) => Datum::parse(s.as_str()),
        other => Datum::parse(&other.to_string()),
    }
}

fn cell_text(v: &AnyValue) -> String {
    match v {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Load a time series from a tabular file.
///
/// `index_col` names the timestamp column; it defaults to the first column.
/// Timestamps are parsed with day-first disambiguation, rows are sorted when
/// out of order, the cadence is inferred, and the variant follows the value
/// column count.
///
/// # Errors
/// Returns `TemporaError::InvalidArg` for an unsupported extension or a
/// missing index column, `TemporaError::File` for reader failures, and
/// `TemporaError::Parse` for unparseable timestamps.
pub fn read_file(
    path: impl AsRef<Path>,
    index_col: Option<&str>,
) -> Result<TimeSeries, TemporaError> {
    let path = path.as_ref();
    if extension(path) == "xlsx" {
        return read_xlsx(path, index_col);
    }
    let df = read_dataframe(path)?;
    debug!(path = %path.display(), rows = df.height(), "loaded dataframe");

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    let first = names
        .first()
        .ok_or_else(|| TemporaError::Data("file has no columns".into()))?;
    let index_name = match index_col {
        Some(c) if names.iter().any(|n| n == c) => c.to_string(),
        Some(c) => {
            return Err(TemporaError::InvalidArg(format!(
                "Index column '{c}' not found in data."
            )));
        }
        None => first.clone(),
    };

    let index_series = df.column(&index_name).map_err(file_err)?;
    let index: Vec<String> = index_series
        .as_materialized_series()
        .iter()
        .map(|v| cell_text(&v))
        .collect();

    let mut columns = Vec::new();
    for name in &names {
        if *name == index_name {
            continue;
        }
        let s = df.column(name).map_err(file_err)?;
        let cells: Vec<Datum> = s
            .as_materialized_series()
            .iter()
            .map(|v| cell_datum(&v))
            .collect();
        columns.push((name.clone(), cells));
    }
    TimeSeries::from_rows(index_name, &index, columns)
}

fn to_dataframe(ts: &TimeSeries) -> Result<DataFrame, TemporaError> {
    let index: Vec<String> = ts.index().iter().map(|t| render_timestamp(*t)).collect();
    let mut cols: Vec<Column> = vec![Series::new(ts.index_name().into(), index).into()];

    let value_columns: Vec<(&str, &[Datum])> = match ts {
        TimeSeries::Uni(s) => vec![(s.name(), s.values())],
        TimeSeries::Multi(s) => s
            .columns()
            .iter()
            .map(|c| (c.name.as_str(), c.values.as_slice()))
            .collect(),
    };
    for (name, values) in value_columns {
        let numeric = !values.iter().any(|v| matches!(v, Datum::Text(_)));
        if numeric {
            let cells: Vec<Option<f64>> = values.iter().map(Datum::as_number).collect();
            cols.push(Series::new(name.into(), cells).into());
        } else {
            let cells: Vec<Option<String>> = values
                .iter()
                .map(|v| (!v.is_missing()).then(|| v.to_string()))
                .collect();
            cols.push(Series::new(name.into(), cells).into());
        }
    }
    DataFrame::new(cols).map_err(file_err)
}

fn write_xlsx(ts: &TimeSeries, path: &Path) -> Result<(), TemporaError> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, ts.index_name()).map_err(file_err)?;

    let value_columns: Vec<(&str, &[Datum])> = match ts {
        TimeSeries::Uni(s) => vec![(s.name(), s.values())],
        TimeSeries::Multi(s) => s
            .columns()
            .iter()
            .map(|c| (c.name.as_str(), c.values.as_slice()))
            .collect(),
    };
    for (c, (name, _)) in value_columns.iter().enumerate() {
        sheet
            .write_string(0, (c + 1) as u16, *name)
            .map_err(file_err)?;
    }
    for (r, ts_entry) in ts.index().iter().enumerate() {
        let row = (r + 1) as u32;
        sheet
            .write_string(row, 0, render_timestamp(*ts_entry))
            .map_err(file_err)?;
        for (c, (_, values)) in value_columns.iter().enumerate() {
            let col = (c + 1) as u16;
            match &values[r] {
                Datum::Number(x) if !x.is_nan() => {
                    sheet.write_number(row, col, *x).map_err(file_err)?;
                }
                Datum::Text(s) => {
                    sheet.write_string(row, col, s).map_err(file_err)?;
                }
                _ => {}
            }
        }
    }
    workbook.save(path).map_err(file_err)
}

/// Write a time series to a tabular file, the format picked by extension.
///
/// # Errors
/// Returns `TemporaError::InvalidArg` for an unsupported extension and
/// `TemporaError::File` for writer failures.
pub fn to_file(ts: &TimeSeries, path: impl AsRef<Path>) -> Result<(), TemporaError> {
    let path = path.as_ref();
    match extension(path).as_str() {
        "csv" => {
            let mut df = to_dataframe(ts)?;
            let mut file = File::create(path).map_err(file_err)?;
            CsvWriter::new(&mut file).finish(&mut df).map_err(file_err)
        }
        "json" => {
            let mut df = to_dataframe(ts)?;
            let mut file = File::create(path).map_err(file_err)?;
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(&mut df)
                .map_err(file_err)
        }
        "parquet" => {
            let mut df = to_dataframe(ts)?;
            let file = File::create(path).map_err(file_err)?;
            ParquetWriter::new(file)
                .finish(&mut df)
                .map(|_| ())
                .map_err(file_err)
        }
        "xlsx" => write_xlsx(ts, path),
        other => Err(TemporaError::invalid_arg(
            format!("Unsupported extension: .{other}"),
            SUPPORTED_EXTENSIONS,
        )),
    }
}
