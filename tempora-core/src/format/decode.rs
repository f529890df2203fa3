use chrono::NaiveDate;
use serde_json::Value;
use tempora_types::TemporaError;

use crate::series::{Column, Datum, MultiSeries, TimeSeries, UniSeries};

/// Intermediate decoded table: raw index strings plus typed value columns,
/// still in the row order of the input text.
struct Table {
    index_name: String,
    index: Vec<String>,
    columns: Vec<(String, Vec<Datum>)>,
}

impl Table {
    fn into_series(self) -> Result<TimeSeries, TemporaError> {
        TimeSeries::from_rows(self.index_name, &self.index, self.columns)
    }
}

fn delimited_table(input: &str, sep: &str, bracketed: bool) -> Result<Table, TemporaError> {
    let mut lines = input.trim().lines();
    let header = lines
        .next()
        .ok_or_else(|| TemporaError::parse("empty input"))?;
    let names: Vec<&str> = header.split(sep).map(str::trim).collect();
    if names.len() < 2 {
        return Err(TemporaError::parse(format!(
            "expected an index column and at least one value column, got '{header}'"
        )));
    }
    let index_name = names[0].to_string();
    let mut columns: Vec<(String, Vec<Datum>)> = names[1..]
        .iter()
        .map(|n| ((*n).to_string(), Vec::new()))
        .collect();
    let mut index = Vec::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let cells: Vec<&str> = line.split(sep).map(str::trim).collect();
        if cells.len() != names.len() {
            return Err(TemporaError::parse(format!(
                "row has {} fields, header has {}: '{line}'",
                cells.len(),
                names.len()
            )));
        }
        index.push(cells[0].to_string());
        for (slot, cell) in columns.iter_mut().zip(&cells[1..]) {
            let cell = if bracketed {
                cell.strip_prefix('[')
                    .and_then(|c| c.strip_suffix(']'))
                    .unwrap_or(cell)
            } else {
                cell
            };
            slot.1.push(Datum::parse(cell));
        }
    }
    Ok(Table {
        index_name,
        index,
        columns,
    })
}

/// Parse a comma-separated rendering.
pub fn from_csv(input: &str) -> Result<TimeSeries, TemporaError> {
    delimited_table(input, ",", false)?.into_series()
}

/// Parse a tab-separated rendering.
pub fn from_tsv(input: &str) -> Result<TimeSeries, TemporaError> {
    delimited_table(input, "\t", false)?.into_series()
}

/// Parse a rendering delimited by `sep`.
pub fn from_custom(input: &str, sep: &str) -> Result<TimeSeries, TemporaError> {
    delimited_table(input, sep, false)?.into_series()
}

/// Parse a comma-separated rendering with bracket-wrapped value cells.
pub fn from_context(input: &str) -> Result<TimeSeries, TemporaError> {
    delimited_table(input, ",", true)?.into_series()
}

/// Parse a pipe-delimited table, skipping the `|---|` separator row.
pub fn from_markdown(input: &str) -> Result<TimeSeries, TemporaError> {
    let lines: Vec<&str> = input.trim().lines().collect();
    if lines.len() < 2 {
        return Err(TemporaError::parse("markdown table needs a header and a separator row"));
    }
    let body: Vec<String> = std::iter::once(lines[0])
        .chain(lines[2..].iter().copied())
        .map(|l| l.trim().trim_matches('|').to_string())
        .collect();
    delimited_table(&body.join("\n"), "|", false)?.into_series()
}

/// Parse `name: value` pair lines.
pub fn from_plain(input: &str) -> Result<TimeSeries, TemporaError> {
    let mut index_name = String::new();
    let mut index = Vec::new();
    let mut columns: Vec<(String, Vec<Datum>)> = Vec::new();
    for (row, line) in input.trim().lines().enumerate() {
        for (pos, part) in line.split(',').enumerate() {
            let (key, value) = part
                .split_once(':')
                .ok_or_else(|| TemporaError::parse(format!("missing ':' in '{part}'")))?;
            let (key, value) = (key.trim(), value.trim());
            if pos == 0 {
                if row == 0 {
                    index_name = key.to_string();
                }
                index.push(value.to_string());
            } else {
                if row == 0 {
                    columns.push((key.to_string(), Vec::new()));
                }
                let slot = columns
                    .get_mut(pos - 1)
                    .ok_or_else(|| TemporaError::parse(format!("unexpected field '{key}'")))?;
                slot.1.push(Datum::parse(value));
            }
        }
    }
    if columns.is_empty() {
        return Err(TemporaError::parse("empty input"));
    }
    Table {
        index_name,
        index,
        columns,
    }
    .into_series()
}

/// Parse a symbol rendering, dropping the direction columns.
pub fn from_symbol(input: &str) -> Result<TimeSeries, TemporaError> {
    let mut table = delimited_table(input, ",", false)?;
    table.columns.retain(|(name, _)| {
        name != "DirectionIndicator" && !name.ends_with("_DirectionIndicator")
    });
    if table.columns.is_empty() {
        return Err(TemporaError::parse("symbol input has only direction columns"));
    }
    table.into_series()
}

/// Parse a JSON array of row objects; the first key of each object is the
/// index.
///
/// Bare `NaN` literals, which some producers emit for missing cells, are
/// accepted and read as missing.
pub fn from_json(input: &str) -> Result<TimeSeries, TemporaError> {
    let sanitized;
    let input = if input.contains("NaN") {
        sanitized = replace_bare_nan(input);
        sanitized.as_str()
    } else {
        input
    };
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(input).map_err(|e| TemporaError::parse(e.to_string()))?;
    let first = rows
        .first()
        .ok_or_else(|| TemporaError::parse("empty input"))?;
    let mut keys = first.keys();
    let index_name = keys
        .next()
        .ok_or_else(|| TemporaError::parse("row objects have no fields"))?
        .clone();
    let column_names: Vec<String> = keys.cloned().collect();
    if column_names.is_empty() {
        return Err(TemporaError::parse(
            "expected an index field and at least one value field",
        ));
    }
    let mut index = Vec::new();
    let mut columns: Vec<(String, Vec<Datum>)> = column_names
        .into_iter()
        .map(|n| (n, Vec::new()))
        .collect();
    for row in &rows {
        let idx = row
            .get(&index_name)
            .ok_or_else(|| TemporaError::parse(format!("row is missing '{index_name}'")))?;
        index.push(json_text(idx));
        for (name, cells) in &mut columns {
            cells.push(row.get(name.as_str()).map_or(Datum::Missing, json_cell));
        }
    }
    Table {
        index_name,
        index,
        columns,
    }
    .into_series()
}

/// Replace `NaN` tokens outside string literals with `null`.
fn replace_bare_nan(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if rest.starts_with("NaN") {
            out.push_str("null");
            rest = &rest[3..];
            continue;
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn json_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_cell(v: &Value) -> Datum {
    match v {
        Value::Null => Datum::Missing,
        Value::Number(n) => n.as_f64().map_or(Datum::Missing, Datum::Number),
        Value::String(s) => Datum::parse(s),
        Value::Bool(b) => Datum::Text(b.to_string()),
        other => Datum::Text(other.to_string()),
    }
}

/// Parse a bare value listing; timestamps are synthesized as a daily index
/// from the epoch since the rendering carries none.
pub fn from_array(input: &str) -> Result<TimeSeries, TemporaError> {
    let body = input.trim();
    let body = body
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
        .ok_or_else(|| TemporaError::parse(format!("expected a bracketed list, got '{body}'")))?;
    let items = split_top_level(body)?;
    let nested = items.first().is_some_and(|i| i.starts_with('['));

    let epoch_index = |n: usize| -> Vec<chrono::NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        (0..n)
            .map(|i| epoch + chrono::Duration::days(i as i64))
            .collect()
    };

    if !nested {
        let values: Vec<Datum> = items.iter().map(|t| array_cell(t)).collect();
        let index = epoch_index(values.len());
        return Ok(UniSeries::new("value", "index", index, values)?.into());
    }

    let mut rows = Vec::new();
    for item in &items {
        let inner = item
            .strip_prefix('[')
            .and_then(|b| b.strip_suffix(']'))
            .ok_or_else(|| TemporaError::parse(format!("expected a nested list, got '{item}'")))?;
        let cells: Vec<Datum> = split_top_level(inner)?.iter().map(|t| array_cell(t)).collect();
        rows.push(cells);
    }
    let width = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != width) || width == 0 {
        return Err(TemporaError::parse("nested lists have uneven lengths"));
    }
    let columns = (0..width)
        .map(|c| Column {
            name: format!("v{c}"),
            values: rows.iter().map(|r| r[c].clone()).collect(),
        })
        .collect();
    let index = epoch_index(rows.len());
    Ok(MultiSeries::new("index", index, columns)?.into())
}

fn array_cell(token: &str) -> Datum {
    let token = token.trim();
    if let Some(inner) = token
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| token.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
    {
        Datum::parse(&inner.replace("\\'", "'"))
    } else {
        Datum::parse(token)
    }
}

/// Split a list body on commas outside quotes and brackets.
fn split_top_level(body: &str) -> Result<Vec<String>, TemporaError> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut current = String::new();
    let mut escaped = false;
    for c in body.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TemporaError::parse("unbalanced brackets"))?;
                current.push(c);
            }
            ',' if depth == 0 => {
                items.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if quote.is_some() || depth != 0 {
        return Err(TemporaError::parse("unbalanced quotes or brackets"));
    }
    let last = current.trim();
    if !last.is_empty() {
        items.push(last.to_string());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_round_trips_into_a_uni_series() {
        let ts = from_csv("date,sales\n2021-01-01 00:00:00,5.0\n2021-01-02 00:00:00,7.5").unwrap();
        let uni = ts.as_uni().unwrap();
        assert_eq!(uni.name(), "sales");
        assert_eq!(uni.values(), &[Datum::Number(5.0), Datum::Number(7.5)]);
    }

    #[test]
    fn unsorted_rows_are_reordered_by_timestamp() {
        let ts = from_csv("date,sales\n2021-01-02 00:00:00,7.0\n2021-01-01 00:00:00,5.0").unwrap();
        let uni = ts.as_uni().unwrap();
        assert_eq!(uni.values(), &[Datum::Number(5.0), Datum::Number(7.0)]);
    }

    #[test]
    fn symbol_drops_direction_columns() {
        let input = "date,Value,DirectionIndicator\n2021-01-01 00:00:00,5.0,→\n2021-01-02 00:00:00,3.0,↓";
        let ts = from_symbol(input).unwrap();
        assert_eq!(ts.as_uni().unwrap().values(), &[Datum::Number(5.0), Datum::Number(3.0)]);
    }

    #[test]
    fn context_strips_bracket_wrapping() {
        let ts = from_context("date,sales\n2021-01-01 00:00:00,[5.0]\n2021-01-02 00:00:00,[nan]")
            .unwrap();
        assert_eq!(ts.as_uni().unwrap().values(), &[Datum::Number(5.0), Datum::Missing]);
    }

    #[test]
    fn array_synthesizes_an_epoch_index() {
        let ts = from_array("[1.0, 2.0, nan]").unwrap();
        let uni = ts.as_uni().unwrap();
        assert_eq!(uni.name(), "value");
        assert_eq!(uni.index()[0].date().to_string(), "1970-01-01");
        assert_eq!(uni.values()[2], Datum::Missing);
    }

    #[test]
    fn nested_array_becomes_a_multi_series() {
        let ts = from_array("[[1.0, 'a'], [2.0, 'b']]").unwrap();
        let multi = ts.as_multi().unwrap();
        assert_eq!(multi.columns().len(), 2);
        assert_eq!(multi.columns()[1].values[0], Datum::Text("a".into()));
    }

    #[test]
    fn textual_cells_are_despaced_on_decode() {
        let ts = from_csv("date,sales\n2021-01-01 00:00:00,1 2 3 . 4\n2021-01-02 00:00:00,5 . 0")
            .unwrap();
        assert_eq!(
            ts.as_uni().unwrap().values(),
            &[Datum::Number(123.4), Datum::Number(5.0)]
        );
    }

    #[test]
    fn json_accepts_bare_nan_literals() {
        let input = r#"[{"date":"2021-01-01 00:00:00","v":NaN},{"date":"2021-01-02 00:00:00","v":2.0}]"#;
        let ts = from_json(input).unwrap();
        assert_eq!(
            ts.as_uni().unwrap().values(),
            &[Datum::Missing, Datum::Number(2.0)]
        );
        // a quoted "NaN" is a string cell, not a literal
        let input = r#"[{"date":"2021-01-01 00:00:00","v":"NaN"}]"#;
        let ts = from_json(input).unwrap();
        assert_eq!(ts.as_uni().unwrap().values(), &[Datum::Missing]);
    }

    #[test]
    fn json_preserves_column_order_and_nulls() {
        let input = r#"[{"date":"2021-01-01 00:00:00","a":1.0,"b":null},{"date":"2021-01-02 00:00:00","a":2.0,"b":3.5}]"#;
        let multi = from_json(input).unwrap();
        let multi = multi.as_multi().unwrap();
        assert_eq!(multi.index_name(), "date");
        assert_eq!(multi.columns()[0].name, "a");
        assert_eq!(multi.columns()[1].values[0], Datum::Missing);
    }
}
