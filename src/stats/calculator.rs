//! Statistics Calculator Module
//! Handles descriptive statistics, value frequencies and the scalar
//! reductions shared by the cleaner and the aggregator.

use crate::data::{column_text, numeric_values, ColumnKind};
use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Frequency of one distinct value in a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            column: String::new(),
            count: n,
            mean: Statistics::mean(values),
            std: Self::std(values).unwrap_or(f64::NAN),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Summary statistics for every numeric column, in table order.
    pub fn describe(df: &DataFrame) -> PolarsResult<Vec<ColumnSummary>> {
        crate::data::columns_of_kind(df, ColumnKind::Numeric)
            .into_iter()
            .map(|name| {
                let values: Vec<f64> = numeric_values(df, &name)?.into_iter().flatten().collect();
                let mut summary = Self::compute_descriptive_stats(&values);
                summary.column = name;
                Ok(summary)
            })
            .collect()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        (!values.is_empty()).then(|| Statistics::mean(values))
    }

    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Some(Self::percentile(&sorted, 50.0))
    }

    /// Sample standard deviation (n - 1); undefined below two values.
    pub fn std(values: &[f64]) -> Option<f64> {
        (values.len() > 1).then(|| Statistics::std_dev(values))
    }

    pub fn min(values: &[f64]) -> Option<f64> {
        (!values.is_empty()).then(|| Statistics::min(values))
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        (!values.is_empty()).then(|| Statistics::max(values))
    }

    pub fn sum(values: &[f64]) -> f64 {
        values.iter().sum()
    }

    /// Weighted mean over (value, weight) pairs. `None` when there are no
    /// pairs or the weights sum to zero.
    pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
        let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
        if pairs.is_empty() || total_weight == 0.0 {
            return None;
        }
        let weighted: f64 = pairs.iter().map(|(v, w)| v * w).sum();
        let avg = weighted / total_weight;
        avg.is_finite().then_some(avg)
    }

    /// Distinct non-missing values with their counts, most frequent first.
    /// Equal counts keep first-seen order.
    pub fn value_counts(column: &Column) -> Vec<ValueCount> {
        let mut counts: Vec<ValueCount> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for value in column_text(column).into_iter().flatten() {
            match positions.get(&value) {
                Some(&pos) => counts[pos].count += 1,
                None => {
                    positions.insert(value.clone(), counts.len());
                    counts.push(ValueCount { value, count: 1 });
                }
            }
        }

        // stable sort keeps first-seen order among ties
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Value counts for every categorical column, in table order.
    pub fn categorical_value_counts(df: &DataFrame) -> Vec<(String, Vec<ValueCount>)> {
        df.get_columns()
            .iter()
            .filter(|col| ColumnKind::of(col.dtype()) == ColumnKind::Categorical)
            .map(|col| (col.name().to_string(), Self::value_counts(col)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn descriptive_stats_match_pandas_describe() {
        let s = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.std, 1.2909944487358056));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.p25, 1.75));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.p75, 3.25));
        assert!(approx(s.max, 4.0));
    }

    #[test]
    fn empty_values_give_nan_summary() {
        let s = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
    }

    #[test]
    fn describe_skips_missing_and_text_columns() {
        let df = df!(
            "label" => ["a", "b", "c"],
            "x" => [Some(2.0), None, Some(4.0)]
        )
        .unwrap();
        let summaries = StatsCalculator::describe(&df).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].column, "x");
        assert_eq!(summaries[0].count, 2);
        assert!(approx(summaries[0].mean, 3.0));
    }

    #[test]
    fn reductions_handle_small_inputs() {
        assert_eq!(StatsCalculator::mean(&[]), None);
        assert_eq!(StatsCalculator::std(&[5.0]), None);
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(StatsCalculator::min(&[3.0, -1.0]), Some(-1.0));
        assert_eq!(StatsCalculator::max(&[3.0, -1.0]), Some(3.0));
        assert_eq!(StatsCalculator::sum(&[]), 0.0);
    }

    #[test]
    fn weighted_mean_rejects_zero_weights() {
        assert_eq!(
            StatsCalculator::weighted_mean(&[(2.0, 1.0), (4.0, 3.0)]),
            Some(3.5)
        );
        assert_eq!(StatsCalculator::weighted_mean(&[(2.0, 0.0), (4.0, 0.0)]), None);
        assert_eq!(StatsCalculator::weighted_mean(&[]), None);
    }

    #[test]
    fn value_counts_sorted_with_stable_ties() {
        let col = Column::new(
            "fruit".into(),
            [Some("pear"), Some("apple"), None, Some("apple"), Some("fig"), Some("pear")],
        );
        let counts = StatsCalculator::value_counts(&col);
        let flat: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("pear", 2), ("apple", 2), ("fig", 1)]);
    }
}
