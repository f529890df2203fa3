use core::fmt;
use core::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};
use tempora_types::TemporaError;

/// Cadence of a time-series index.
///
/// Parsed from the usual offset aliases (`D`, `H`, `min`, ...) and used both
/// for normalization grids and for inference at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// One observation per second.
    Secondly,
    /// One observation per minute.
    Minutely,
    /// One observation per hour.
    Hourly,
    /// One observation per day.
    Daily,
    /// One observation per week.
    Weekly,
    /// One observation per calendar month.
    Monthly,
    /// One observation per calendar year.
    Yearly,
}

impl Frequency {
    /// Canonical offset alias.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "S",
            Self::Minutely => "T",
            Self::Hourly => "H",
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "MS",
            Self::Yearly => "YS",
        }
    }

    /// Fixed step length in seconds, `None` for calendar-based cadences.
    #[must_use]
    pub const fn fixed_seconds(self) -> Option<i64> {
        match self {
            Self::Secondly => Some(1),
            Self::Minutely => Some(60),
            Self::Hourly => Some(3_600),
            Self::Daily => Some(86_400),
            Self::Weekly => Some(604_800),
            Self::Monthly | Self::Yearly => None,
        }
    }

    /// The timestamp one step after `ts`.
    #[must_use]
    pub fn advance(self, ts: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.fixed_seconds() {
            Some(sec) => ts.checked_add_signed(Duration::seconds(sec)),
            None => {
                let months = if self == Self::Monthly { 1 } else { 12 };
                ts.checked_add_months(Months::new(months))
            }
        }
    }

    /// Infer the cadence of a sorted index from its adjacent deltas.
    ///
    /// All deltas must agree (calendar cadences are checked by stepping, so a
    /// monthly index over month ends still infers). Fewer than three points
    /// or mixed deltas yield `None`.
    #[must_use]
    pub fn infer(index: &[NaiveDateTime]) -> Option<Self> {
        if index.len() < 3 {
            return None;
        }
        let fixed = [
            Self::Secondly,
            Self::Minutely,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
        ];
        let first_delta = (index[1] - index[0]).num_seconds();
        if let Some(freq) = fixed.iter().find(|f| f.fixed_seconds() == Some(first_delta)) {
            let uniform = index
                .windows(2)
                .all(|w| (w[1] - w[0]).num_seconds() == first_delta);
            if uniform {
                return Some(*freq);
            }
        }
        for freq in [Self::Monthly, Self::Yearly] {
            let stepped = index
                .windows(2)
                .all(|w| freq.advance(w[0]) == Some(w[1]));
            if stepped {
                return Some(freq);
            }
        }
        None
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "S" | "SEC" => Ok(Self::Secondly),
            "T" | "MIN" => Ok(Self::Minutely),
            "H" => Ok(Self::Hourly),
            "D" => Ok(Self::Daily),
            "W" => Ok(Self::Weekly),
            "M" | "MS" | "ME" => Ok(Self::Monthly),
            "Y" | "YS" | "A" => Ok(Self::Yearly),
            other => Err(TemporaError::invalid_arg(
                format!("Unknown frequency: {other}"),
                "S, T/min, H, D, W, M/MS, Y/A",
            )),
        }
    }
}

/// A complete, evenly spaced timestamp sequence from `start` to `end`
/// inclusive at the given cadence.
///
/// ```
/// use tempora_core::{Frequency, date_range};
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2020, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let grid = date_range(d(1), d(4), Frequency::Daily);
/// assert_eq!(grid, vec![d(1), d(2), d(3), d(4)]);
/// ```
#[must_use]
pub fn date_range(start: NaiveDateTime, end: NaiveDateTime, freq: Frequency) -> Vec<NaiveDateTime> {
    let mut out = Vec::new();
    let mut cur = start;
    while cur <= end {
        out.push(cur);
        match freq.advance(cur) {
            Some(next) if next > cur => cur = next,
            _ => break,
        }
    }
    out
}
