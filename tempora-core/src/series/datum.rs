use core::fmt;

/// A single observation cell.
///
/// Numeric and textual payloads coexist inside one series the way a tabular
/// engine mixes float and object columns; `Missing` is an explicit marker and
/// renders as `nan`, never as zero or an empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// A numeric observation.
    Number(f64),
    /// A categorical/textual observation.
    Text(String),
    /// An explicitly missing observation.
    Missing,
}

impl Datum {
    /// True for `Missing` and for NaN payloads.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(_) => false,
        }
    }

    /// The numeric payload, if present and not NaN.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// The textual payload, if present.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way the original tabular engine stringifies it:
    /// integral floats keep a trailing `.0`, missing cells render `nan`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Number(n) => render_number(*n),
            Self::Text(s) => s.clone(),
            Self::Missing => "nan".to_string(),
        }
    }

    /// Parse a token produced by [`render`](Self::render) or by the textual
    /// value encoding.
    ///
    /// A token consisting only of digits, sign, dot, and spaces is despaced
    /// and parsed as a float (this reverses the space-joined digit encoding);
    /// recognized missing markers map to `Missing`; anything else stays text.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let t = token.trim();
        if t.is_empty() || matches!(t, "nan" | "NaN" | "NAN" | "None" | "null" | "<NA>") {
            return Self::Missing;
        }
        if t.contains(|c: char| c.is_ascii_digit())
            && t.chars()
                .all(|c| c.is_ascii_digit() || c == '-' || c == '.' || c == ' ')
        {
            let despaced: String = t.chars().filter(|c| *c != ' ').collect();
            if let Ok(n) = despaced.parse::<f64>() {
                return Self::Number(n);
            }
        }
        Self::Text(t.to_string())
    }

    /// Value equality within a floating tolerance; missing matches missing.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        match (self, other) {
            (a, b) if a.is_missing() && b.is_missing() => true,
            (Self::Number(a), Self::Number(b)) => (a - b).abs() <= tol,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for Datum {
    fn from(n: f64) -> Self {
        if n.is_nan() { Self::Missing } else { Self::Number(n) }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

fn render_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_keep_decimal_point() {
        assert_eq!(Datum::Number(1.0).render(), "1.0");
        assert_eq!(Datum::Number(-3.0).render(), "-3.0");
        assert_eq!(Datum::Number(4.5).render(), "4.5");
    }

    #[test]
    fn missing_renders_nan() {
        assert_eq!(Datum::Missing.render(), "nan");
        assert_eq!(Datum::Number(f64::NAN).render(), "nan");
    }

    #[test]
    fn parse_reverses_render() {
        assert_eq!(Datum::parse("1.0"), Datum::Number(1.0));
        assert_eq!(Datum::parse("nan"), Datum::Missing);
        assert_eq!(Datum::parse("hello"), Datum::Text("hello".into()));
    }

    #[test]
    fn parse_despaces_textual_encoding() {
        assert_eq!(Datum::parse("1 2 3 . 4"), Datum::Number(123.4));
        assert_eq!(Datum::parse("- 1 2 . 5"), Datum::Number(-12.5));
    }

    #[test]
    fn words_with_spaces_stay_text() {
        assert_eq!(Datum::parse("low demand"), Datum::Text("low demand".into()));
    }
}
