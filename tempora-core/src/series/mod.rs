//! The series data model: cells, univariate and multivariate series, and
//! the [`TimeSeries`] sum type that codecs and the file layer operate on.

mod datum;
mod multi;
mod uni;

pub use datum::Datum;
pub use multi::{Column, MultiSeries};
pub use uni::UniSeries;

use chrono::NaiveDateTime;
use rand::Rng;
use tempora_types::{AggMethod, SampleMethod, TemporaError, TextFormat, ValueKind};

use crate::frequency::Frequency;

/// Either a univariate or a multivariate series.
///
/// Most operations exist on both variants with identical semantics; this
/// enum dispatches them so callers holding "a series" do not need to branch
/// themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSeries {
    /// Single value column.
    Uni(UniSeries),
    /// Several value columns over a shared index.
    Multi(MultiSeries),
}

impl From<UniSeries> for TimeSeries {
    fn from(s: UniSeries) -> Self {
        Self::Uni(s)
    }
}

impl From<MultiSeries> for TimeSeries {
    fn from(s: MultiSeries) -> Self {
        Self::Multi(s)
    }
}

impl TimeSeries {
    /// Assemble a series from raw index strings and typed value columns.
    ///
    /// Timestamps are parsed with day-first disambiguation, rows are sorted
    /// by timestamp when they do not already arrive in order, and the
    /// variant follows the column count: one value column yields
    /// [`UniSeries`], more yield [`MultiSeries`].
    ///
    /// # Errors
    /// Returns `TemporaError::Parse` for unparseable timestamps and
    /// `TemporaError::Data` for an empty column set or ragged columns.
    pub fn from_rows<S: AsRef<str>>(
        index_name: impl Into<String>,
        index: &[S],
        mut columns: Vec<(String, Vec<Datum>)>,
    ) -> Result<Self, TemporaError> {
        if columns.is_empty() {
            return Err(TemporaError::Data("no value columns".into()));
        }
        let mut parsed = crate::timeparse::parse_timestamp_column(index)?;
        if !parsed.windows(2).all(|w| w[0] <= w[1]) {
            let mut order: Vec<usize> = (0..parsed.len()).collect();
            order.sort_by_key(|&i| parsed[i]);
            parsed = order.iter().map(|&i| parsed[i]).collect();
            for (_, cells) in &mut columns {
                if cells.len() == order.len() {
                    *cells = order.iter().map(|&i| cells[i].clone()).collect();
                }
            }
        }
        if columns.len() == 1 {
            let (name, values) = columns.remove(0);
            Ok(UniSeries::new(name, index_name, parsed, values)?.into())
        } else {
            let columns = columns
                .into_iter()
                .map(|(name, values)| Column { name, values })
                .collect();
            Ok(MultiSeries::new(index_name, parsed, columns)?.into())
        }
    }

    /// Variant name, used in mismatch errors.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Uni(_) => "UniSeries",
            Self::Multi(_) => "MultiSeries",
        }
    }

    /// Borrow the univariate series.
    ///
    /// # Errors
    /// Returns `TemporaError::TypeMismatch` for the multivariate variant.
    pub fn as_uni(&self) -> Result<&UniSeries, TemporaError> {
        match self {
            Self::Uni(s) => Ok(s),
            other => Err(TemporaError::type_mismatch("UniSeries", other.variant_name())),
        }
    }

    /// Borrow the multivariate series.
    ///
    /// # Errors
    /// Returns `TemporaError::TypeMismatch` for the univariate variant.
    pub fn as_multi(&self) -> Result<&MultiSeries, TemporaError> {
        match self {
            Self::Multi(s) => Ok(s),
            other => Err(TemporaError::type_mismatch("MultiSeries", other.variant_name())),
        }
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Uni(s) => s.len(),
            Self::Multi(s) => s.len(),
        }
    }

    /// True when the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The timestamp index.
    #[must_use]
    pub fn index(&self) -> &[NaiveDateTime] {
        match self {
            Self::Uni(s) => s.index(),
            Self::Multi(s) => s.index(),
        }
    }

    /// Index (timestamp column) name.
    #[must_use]
    pub fn index_name(&self) -> &str {
        match self {
            Self::Uni(s) => s.index_name(),
            Self::Multi(s) => s.index_name(),
        }
    }

    /// Inferred or assigned cadence, if any.
    #[must_use]
    pub fn freq(&self) -> Option<Frequency> {
        match self {
            Self::Uni(s) => s.freq(),
            Self::Multi(s) => s.freq(),
        }
    }

    /// An independent copy of rows `lo..hi`.
    #[must_use]
    pub fn slice(&self, lo: usize, hi: usize) -> Self {
        match self {
            Self::Uni(s) => Self::Uni(s.slice(lo, hi)),
            Self::Multi(s) => Self::Multi(s.slice(lo, hi)),
        }
    }

    /// The first `n` observations.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// Sort observations by timestamp (stable).
    pub fn sort_by_index(&mut self) {
        match self {
            Self::Uni(s) => s.sort_by_index(),
            Self::Multi(s) => s.sort_by_index(),
        }
    }

    /// Resolve repeated index entries; the supported method set depends on
    /// the variant.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a method the variant does not
    /// support.
    pub fn agg_duplicates(&self, method: AggMethod) -> Result<Self, TemporaError> {
        match self {
            Self::Uni(s) => s.agg_duplicates(method).map(Self::Uni),
            Self::Multi(s) => s.agg_duplicates(method).map(Self::Multi),
        }
    }

    /// In-place variant of [`agg_duplicates`](Self::agg_duplicates).
    ///
    /// # Errors
    /// Same contract as the pure variant.
    pub fn agg_duplicates_mut(&mut self, method: AggMethod) -> Result<(), TemporaError> {
        *self = self.agg_duplicates(method)?;
        Ok(())
    }

    /// Reindex onto a complete grid at a fixed cadence.
    ///
    /// # Errors
    /// Returns `TemporaError::Inference` when no frequency is available.
    pub fn normalize(
        &self,
        freq: Option<Frequency>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Self, TemporaError> {
        match self {
            Self::Uni(s) => s.normalize(freq, start, end).map(Self::Uni),
            Self::Multi(s) => s.normalize(freq, start, end).map(Self::Multi),
        }
    }

    /// Split into (train, validation) around `end`.
    #[must_use]
    pub fn split(&self, start: NaiveDateTime, end: NaiveDateTime, periods: usize) -> (Self, Self) {
        match self {
            Self::Uni(s) => {
                let (a, b) = s.split(start, end, periods);
                (Self::Uni(a), Self::Uni(b))
            }
            Self::Multi(s) => {
                let (a, b) = s.split(start, end, periods);
                (Self::Multi(a), Self::Multi(b))
            }
        }
    }

    /// Windowed sampling with the thread rng.
    ///
    /// # Errors
    /// Same contract as [`slide_with_rng`](Self::slide_with_rng).
    pub fn slide(
        &self,
        method: SampleMethod,
        window: usize,
        samples: usize,
        step: Option<usize>,
    ) -> Result<Vec<(Self, Self)>, TemporaError> {
        self.slide_with_rng(method, window, samples, step, &mut rand::rng())
    }

    /// Generate ordered (input, output) window pairs.
    ///
    /// # Errors
    /// Returns `TemporaError::InvalidArg` for a zero `uniform` step.
    pub fn slide_with_rng<R: Rng + ?Sized>(
        &self,
        method: SampleMethod,
        window: usize,
        samples: usize,
        step: Option<usize>,
        rng: &mut R,
    ) -> Result<Vec<(Self, Self)>, TemporaError> {
        match self {
            Self::Uni(s) => Ok(s
                .slide_with_rng(method, window, samples, step, rng)?
                .into_iter()
                .map(|(a, b)| (Self::Uni(a), Self::Uni(b)))
                .collect()),
            Self::Multi(s) => Ok(s
                .slide_with_rng(method, window, samples, step, rng)?
                .into_iter()
                .map(|(a, b)| (Self::Multi(a), Self::Multi(b)))
                .collect()),
        }
    }

    /// Render the series in a textual format for prompt assembly.
    ///
    /// # Errors
    /// Propagates encoder failures (for example a symbol rendering over an
    /// empty series).
    pub fn to_str(&self, format: TextFormat, kind: ValueKind) -> Result<String, TemporaError> {
        crate::format::to_str(self, format, kind)
    }
}
