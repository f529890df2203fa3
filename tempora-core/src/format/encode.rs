use std::cmp::Ordering;

use serde_json::{Map, Value};
use tempora_types::TemporaError;

use crate::series::{Datum, TimeSeries};
use crate::timeparse::render_timestamp;

/// Row-major view over either series variant: rendered index entries plus
/// value columns in declaration order.
struct View<'a> {
    index_name: &'a str,
    index: Vec<String>,
    columns: Vec<&'a str>,
    rows: Vec<Vec<&'a Datum>>,
}

impl<'a> View<'a> {
    fn new(ts: &'a TimeSeries) -> Self {
        let index = ts.index().iter().map(|t| render_timestamp(*t)).collect();
        match ts {
            TimeSeries::Uni(s) => Self {
                index_name: s.index_name(),
                index,
                columns: vec![s.name()],
                rows: s.values().iter().map(|v| vec![v]).collect(),
            },
            TimeSeries::Multi(s) => Self {
                index_name: s.index_name(),
                index,
                columns: s.columns().iter().map(|c| c.name.as_str()).collect(),
                rows: (0..s.len())
                    .map(|i| s.columns().iter().map(|c| &c.values[i]).collect())
                    .collect(),
            },
        }
    }
}

fn array_cell(v: &Datum) -> String {
    match v {
        Datum::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
        other => other.to_string(),
    }
}

/// Bare value listing without timestamps. One flat list for a univariate
/// series, one inner list per row for a multivariate one.
pub fn to_array(ts: &TimeSeries) -> String {
    match ts {
        TimeSeries::Uni(s) => {
            let cells: Vec<String> = s.values().iter().map(array_cell).collect();
            format!("[{}]", cells.join(", "))
        }
        TimeSeries::Multi(s) => {
            let rows: Vec<String> = (0..s.len())
                .map(|i| {
                    let cells: Vec<String> =
                        s.columns().iter().map(|c| array_cell(&c.values[i])).collect();
                    format!("[{}]", cells.join(", "))
                })
                .collect();
            format!("[{}]", rows.join(", "))
        }
    }
}

/// Delimited header-plus-rows rendering with a caller-chosen separator.
pub fn to_custom(ts: &TimeSeries, sep: &str) -> String {
    let view = View::new(ts);
    let header = format!("{}{sep}{}", view.index_name, view.columns.join(sep));
    let rows: Vec<String> = view
        .index
        .iter()
        .zip(&view.rows)
        .map(|(idx, row)| {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            format!("{idx}{sep}{}", cells.join(sep))
        })
        .collect();
    format!("{header}\n{}", rows.join("\n"))
}

/// Comma-separated header-plus-rows rendering.
pub fn to_csv(ts: &TimeSeries) -> String {
    to_custom(ts, ",")
}

/// Tab-separated header-plus-rows rendering.
pub fn to_tsv(ts: &TimeSeries) -> String {
    to_custom(ts, "\t")
}

/// Comma-separated rendering with every value cell wrapped in brackets.
pub fn to_context(ts: &TimeSeries) -> String {
    let view = View::new(ts);
    let header = format!("{},{}", view.index_name, view.columns.join(","));
    let rows: Vec<String> = view
        .index
        .iter()
        .zip(&view.rows)
        .map(|(idx, row)| {
            let cells: Vec<String> = row.iter().map(|v| format!("[{v}]")).collect();
            format!("{idx},{}", cells.join(","))
        })
        .collect();
    format!("{header}\n{}", rows.join("\n"))
}

/// Pipe-delimited table with a `|---|` separator row after the header.
pub fn to_markdown(ts: &TimeSeries) -> String {
    let view = View::new(ts);
    let header = format!("|{}|{}|", view.index_name, view.columns.join("|"));
    let bars: Vec<&str> = (0..=view.columns.len()).map(|_| "---").collect();
    let sep = format!("|{}|", bars.join("|"));
    let rows: Vec<String> = view
        .index
        .iter()
        .zip(&view.rows)
        .map(|(idx, row)| {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            format!("|{idx}|{}|", cells.join("|"))
        })
        .collect();
    format!("{header}\n{sep}\n{}", rows.join("\n"))
}

/// One `name: value` pair list per row, comma-joined.
pub fn to_plain(ts: &TimeSeries) -> String {
    let view = View::new(ts);
    let rows: Vec<String> = view
        .index
        .iter()
        .zip(&view.rows)
        .map(|(idx, row)| {
            let pairs: Vec<String> = view
                .columns
                .iter()
                .zip(row)
                .map(|(col, v)| format!("{col}: {v}"))
                .collect();
            format!("{}: {idx}, {}", view.index_name, pairs.join(", "))
        })
        .collect();
    rows.join("\n")
}

/// A JSON array of one object per row, the index entry first.
///
/// Missing cells serialize as `null`.
pub fn to_json(ts: &TimeSeries) -> Result<String, TemporaError> {
    let view = View::new(ts);
    let rows: Vec<Value> = view
        .index
        .iter()
        .zip(&view.rows)
        .map(|(idx, row)| {
            let mut obj = Map::new();
            obj.insert(view.index_name.to_string(), Value::String(idx.clone()));
            for (col, v) in view.columns.iter().zip(row) {
                let cell = match v {
                    Datum::Number(x) if !x.is_nan() => serde_json::Number::from_f64(*x)
                        .map_or(Value::Null, Value::Number),
                    Datum::Text(s) => Value::String(s.clone()),
                    _ => Value::Null,
                };
                obj.insert((*col).to_string(), cell);
            }
            Value::Object(obj)
        })
        .collect();
    serde_json::to_string(&Value::Array(rows)).map_err(|e| TemporaError::Data(e.to_string()))
}

fn direction(prev: Option<&Datum>, cur: &Datum) -> &'static str {
    let Some(prev) = prev else { return "→" };
    match (prev, cur) {
        (Datum::Number(a), Datum::Number(b)) if !a.is_nan() && !b.is_nan() => {
            if b > a {
                "↑"
            } else if b < a {
                "↓"
            } else {
                "→"
            }
        }
        (Datum::Text(a), Datum::Text(b)) => match b.cmp(a) {
            Ordering::Greater => "↑",
            Ordering::Less => "↓",
            Ordering::Equal => "→",
        },
        _ => "→",
    }
}

/// Comma-separated rendering where every value is followed by an arrow
/// marking its movement against the previous row.
pub fn to_symbol(ts: &TimeSeries) -> String {
    let index: Vec<String> = ts.index().iter().map(|t| render_timestamp(*t)).collect();
    match ts {
        TimeSeries::Uni(s) => {
            let header = format!("{},Value,DirectionIndicator", s.index_name());
            let rows: Vec<String> = s
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let prev = if i == 0 { None } else { Some(&s.values()[i - 1]) };
                    format!("{},{v},{}", index[i], direction(prev, v))
                })
                .collect();
            format!("{header}\n{}", rows.join("\n"))
        }
        TimeSeries::Multi(s) => {
            let cols: Vec<String> = s
                .columns()
                .iter()
                .map(|c| format!("{},{}_DirectionIndicator", c.name, c.name))
                .collect();
            let header = format!("{},{}", s.index_name(), cols.join(","));
            let rows: Vec<String> = (0..s.len())
                .map(|i| {
                    let parts: Vec<String> = s
                        .columns()
                        .iter()
                        .map(|c| {
                            let prev = if i == 0 { None } else { Some(&c.values[i - 1]) };
                            format!("{},{}", c.values[i], direction(prev, &c.values[i]))
                        })
                        .collect();
                    format!("{},{}", index[i], parts.join(","))
                })
                .collect();
            format!("{header}\n{}", rows.join("\n"))
        }
    }
}
