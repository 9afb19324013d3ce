//! Interval binning over ordered boundaries.
//!
//! Libraries disagree on which side of an interval is closed and whether the
//! outermost boundary is inside the range, so [`BinPolicy`] has no default and
//! every [`BinSpec`] states both choices.

use chrono::NaiveDate;
use fmtmap_model::{
    Closed, FormatError, Result, date_to_ordinal, format_numeric, ordinal_to_date,
};
use tracing::debug;

/// Interval closure and treatment of the outermost boundary.
///
/// - `Closed::Right`: intervals `(a, b]`; `include_outer` admits `b0`.
/// - `Closed::Left`: intervals `[a, b)`; `include_outer` admits `bn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinPolicy {
    pub closed: Closed,
    pub include_outer: bool,
}

impl BinPolicy {
    pub const fn right(include_lowest: bool) -> Self {
        Self {
            closed: Closed::Right,
            include_outer: include_lowest,
        }
    }

    pub const fn left(include_highest: bool) -> Self {
        Self {
            closed: Closed::Left,
            include_outer: include_highest,
        }
    }
}

/// N+1 strictly increasing boundaries and one label per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    boundaries: Vec<f64>,
    labels: Vec<String>,
    policy: BinPolicy,
}

impl BinSpec {
    /// Builds a spec; `labels = None` generates interval labels.
    ///
    /// `-inf` and `+inf` are accepted as first and last boundary to make the
    /// outer intervals open-ended.
    pub fn new(
        boundaries: Vec<f64>,
        labels: Option<Vec<String>>,
        policy: BinPolicy,
    ) -> Result<Self> {
        validate_boundaries(&boundaries)?;
        let labels = match labels {
            Some(labels) => labels,
            None => auto_labels(&boundaries, policy, format_numeric),
        };
        Self::with_labels(boundaries, labels, policy)
    }

    /// Builds a spec over date boundaries, stored as SAS date ordinals.
    pub fn from_dates(
        dates: &[NaiveDate],
        labels: Option<Vec<String>>,
        policy: BinPolicy,
    ) -> Result<Self> {
        let boundaries: Vec<f64> = dates
            .iter()
            .map(|date| date_to_ordinal(*date) as f64)
            .collect();
        validate_boundaries(&boundaries)?;
        let labels = match labels {
            Some(labels) => labels,
            None => auto_labels(&boundaries, policy, format_ordinal),
        };
        Self::with_labels(boundaries, labels, policy)
    }

    /// Splits the data range into `bins` intervals of equal width.
    ///
    /// `width = (max - min) / bins`. The last boundary is pinned to `max`, and
    /// `policy` applies unchanged: with `BinPolicy::right(false)` the data
    /// minimum itself is out of range.
    pub fn equal_width(data: &[f64], bins: usize, policy: BinPolicy) -> Result<Self> {
        if bins == 0 {
            return Err(FormatError::invalid_boundaries("bin count must be positive"));
        }
        if data.is_empty() {
            return Err(FormatError::invalid_boundaries("no data to bin"));
        }
        if data.iter().any(|value| !value.is_finite()) {
            return Err(FormatError::invalid_boundaries("data contains non-finite values"));
        }
        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= min {
            return Err(FormatError::invalid_boundaries("data has zero range"));
        }
        let width = (max - min) / bins as f64;
        let mut boundaries: Vec<f64> = (0..bins).map(|i| min + i as f64 * width).collect();
        boundaries.push(max);
        debug!(bins, min, max, width, "generated equal-width boundaries");
        Self::new(boundaries, None, policy)
    }

    fn with_labels(boundaries: Vec<f64>, labels: Vec<String>, policy: BinPolicy) -> Result<Self> {
        let expected = boundaries.len() - 1;
        if labels.len() != expected {
            return Err(FormatError::LabelCountMismatch {
                expected,
                actual: labels.len(),
            });
        }
        Ok(Self {
            boundaries,
            labels,
            policy,
        })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn policy(&self) -> BinPolicy {
        self.policy
    }

    pub fn interval_count(&self) -> usize {
        self.labels.len()
    }

    /// Zero-based index of the interval containing `value`.
    pub fn interval_index(&self, value: f64) -> Result<usize> {
        let bounds = &self.boundaries;
        let last = bounds.len() - 1;
        let out_of_range = || FormatError::OutOfRange {
            value,
            lower: bounds[0],
            upper: bounds[last],
        };
        if value.is_nan() {
            return Err(out_of_range());
        }
        match self.policy.closed {
            Closed::Right => {
                let pos = bounds.partition_point(|&bound| bound < value);
                if pos == 0 {
                    if value == bounds[0] && self.policy.include_outer {
                        Ok(0)
                    } else {
                        Err(out_of_range())
                    }
                } else if pos > last {
                    Err(out_of_range())
                } else {
                    Ok(pos - 1)
                }
            }
            Closed::Left => {
                let pos = bounds.partition_point(|&bound| bound <= value);
                if pos == 0 {
                    Err(out_of_range())
                } else if pos > last {
                    if value == bounds[last] && self.policy.include_outer {
                        Ok(last - 1)
                    } else {
                        Err(out_of_range())
                    }
                } else {
                    Ok(pos - 1)
                }
            }
        }
    }

    pub fn bin(&self, value: f64) -> Result<&str> {
        let index = self.interval_index(value)?;
        Ok(&self.labels[index])
    }

    pub fn bin_date(&self, date: NaiveDate) -> Result<&str> {
        self.bin(date_to_ordinal(date) as f64)
    }
}

fn validate_boundaries(boundaries: &[f64]) -> Result<()> {
    if boundaries.len() < 2 {
        return Err(FormatError::invalid_boundaries(
            "at least two boundaries are required",
        ));
    }
    if boundaries.iter().any(|bound| bound.is_nan()) {
        return Err(FormatError::invalid_boundaries("boundary is NaN"));
    }
    if let Some(pair) = boundaries.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(FormatError::invalid_boundaries(format!(
            "boundaries must be strictly increasing ({} >= {})",
            format_numeric(pair[0]),
            format_numeric(pair[1])
        )));
    }
    Ok(())
}

/// R-style labels: `(a, b]` or `[a, b)`, with the admitted outer boundary
/// shown as closed.
fn auto_labels(boundaries: &[f64], policy: BinPolicy, show: fn(f64) -> String) -> Vec<String> {
    let count = boundaries.len() - 1;
    boundaries
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| {
            let (low, high) = (show(pair[0]), show(pair[1]));
            match policy.closed {
                Closed::Right if idx == 0 && policy.include_outer => format!("[{low}, {high}]"),
                Closed::Right => format!("({low}, {high}]"),
                Closed::Left if idx + 1 == count && policy.include_outer => {
                    format!("[{low}, {high}]")
                }
                Closed::Left => format!("[{low}, {high})"),
            }
        })
        .collect()
}

fn format_ordinal(ordinal: f64) -> String {
    ordinal_to_date(ordinal as i64)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format_numeric(ordinal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages() -> BinSpec {
        BinSpec::new(
            vec![0.0, 40.0, 60.0, 100.0],
            Some(vec![
                "Young".to_string(),
                "Middle-Aged".to_string(),
                "Old".to_string(),
            ]),
            BinPolicy::right(false),
        )
        .expect("age bins")
    }

    #[test]
    fn right_closed_bins() {
        let spec = ages();
        assert_eq!(spec.bin(59.0).unwrap(), "Middle-Aged");
        assert_eq!(spec.bin(40.0).unwrap(), "Young");
        assert_eq!(spec.bin(40.5).unwrap(), "Middle-Aged");
        assert_eq!(spec.bin(100.0).unwrap(), "Old");
        assert!(matches!(
            spec.bin(0.0),
            Err(FormatError::OutOfRange { .. })
        ));
        assert!(spec.bin(100.1).is_err());
        assert!(spec.bin(f64::NAN).is_err());
    }

    #[test]
    fn include_lowest_admits_first_boundary() {
        let spec = BinSpec::new(vec![0.0, 40.0, 100.0], None, BinPolicy::right(true)).unwrap();
        assert_eq!(spec.bin(0.0).unwrap(), "[0, 40]");
        assert_eq!(spec.labels()[1], "(40, 100]");
    }

    #[test]
    fn left_closed_bins() {
        let spec = BinSpec::new(vec![0.0, 40.0, 100.0], None, BinPolicy::left(false)).unwrap();
        assert_eq!(spec.bin(0.0).unwrap(), "[0, 40)");
        assert_eq!(spec.bin(40.0).unwrap(), "[40, 100)");
        assert!(spec.bin(100.0).is_err());

        let closed = BinSpec::new(vec![0.0, 40.0, 100.0], None, BinPolicy::left(true)).unwrap();
        assert_eq!(closed.bin(100.0).unwrap(), "[40, 100]");
    }

    #[test]
    fn infinite_sentinels_open_the_ends() {
        let spec = BinSpec::new(
            vec![f64::NEG_INFINITY, 0.0, f64::INFINITY],
            None,
            BinPolicy::right(false),
        )
        .unwrap();
        assert_eq!(spec.bin(-1e12).unwrap(), "(-Inf, 0]");
        assert_eq!(spec.bin(1e12).unwrap(), "(0, Inf]");
    }

    #[test]
    fn rejects_bad_boundaries_and_labels() {
        let policy = BinPolicy::right(false);
        assert!(matches!(
            BinSpec::new(vec![0.0, 0.0, 1.0], None, policy),
            Err(FormatError::InvalidBoundaries { .. })
        ));
        assert!(BinSpec::new(vec![1.0], None, policy).is_err());
        assert_eq!(
            BinSpec::new(vec![0.0, 1.0, 2.0], Some(vec!["a".to_string()]), policy).unwrap_err(),
            FormatError::LabelCountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn equal_width_uses_data_range() {
        let spec =
            BinSpec::equal_width(&[10.0, 20.0, 30.0, 50.0], 4, BinPolicy::right(true)).unwrap();
        assert_eq!(spec.boundaries(), &[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(spec.bin(10.0).unwrap(), "[10, 20]");
        assert_eq!(spec.bin(50.0).unwrap(), "(40, 50]");

        let strict =
            BinSpec::equal_width(&[10.0, 20.0, 30.0, 50.0], 4, BinPolicy::right(false)).unwrap();
        assert!(strict.bin(10.0).is_err());

        assert!(BinSpec::equal_width(&[5.0, 5.0], 2, BinPolicy::right(true)).is_err());
        assert!(BinSpec::equal_width(&[], 2, BinPolicy::right(true)).is_err());
        assert!(BinSpec::equal_width(&[1.0, 2.0], 0, BinPolicy::right(true)).is_err());
    }

    #[test]
    fn date_boundaries_bin_dates() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mar = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let spec = BinSpec::from_dates(&[jan, feb, mar], None, BinPolicy::left(false)).unwrap();
        assert_eq!(spec.labels()[0], "[2024-01-01, 2024-02-01)");
        let mid_feb = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        assert_eq!(spec.bin_date(mid_feb).unwrap(), "[2024-02-01, 2024-03-01)");
        assert!(spec.bin_date(mar).is_err());
    }
}
