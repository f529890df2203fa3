use crate::series::{Datum, TimeSeries};

fn encode_cell(v: &Datum) -> Datum {
    if v.is_missing() {
        return v.clone();
    }
    let spaced: Vec<String> = v.to_string().chars().map(|c| c.to_string()).collect();
    Datum::Text(spaced.join(" "))
}

/// Rewrite cells into their digit-spaced textual form.
///
/// A univariate series has every present cell rewritten; a multivariate
/// series only its numeric columns, so categorical text survives untouched.
/// Missing cells stay missing.
#[must_use]
pub fn encode(ts: &TimeSeries) -> TimeSeries {
    match ts {
        TimeSeries::Uni(s) => {
            TimeSeries::Uni(s.with_values(s.values().iter().map(encode_cell).collect()))
        }
        TimeSeries::Multi(s) => {
            let columns = s
                .columns()
                .iter()
                .map(|col| {
                    let mut col = col.clone();
                    if col.is_numeric() {
                        col.values = col.values.iter().map(encode_cell).collect();
                    }
                    col
                })
                .collect();
            TimeSeries::Multi(s.with_columns(columns))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_every_character_of_the_rendering() {
        assert_eq!(
            encode_cell(&Datum::Number(123.4)),
            Datum::Text("1 2 3 . 4".into())
        );
        assert_eq!(encode_cell(&Datum::Number(5.0)), Datum::Text("5 . 0".into()));
    }

    #[test]
    fn missing_cells_stay_missing() {
        assert_eq!(encode_cell(&Datum::Missing), Datum::Missing);
    }
}
