//! Chart Data Module
//! Turns table columns into plot-ready series: a histogram for a numeric
//! column and a frequency bar chart for a categorical column.

use crate::data::numeric_values;
use crate::stats::{StatsCalculator, ValueCount};
use polars::prelude::*;

/// One histogram bar covering `[start, end)` (the last bin also includes `end`).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramData {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarData {
    pub column: String,
    pub categories: Vec<ValueCount>,
    /// Distinct values left out by the display limit
    pub hidden: usize,
}

/// Plot-ready data for a single chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Histogram(HistogramData),
    Bar(BarData),
}

impl ChartData {
    pub fn title(&self) -> String {
        match self {
            ChartData::Histogram(h) => format!("Histogram of {}", h.column),
            ChartData::Bar(b) => format!("Bar Chart of {}", b.column),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Histogram(h) => h.bins.is_empty(),
            ChartData::Bar(b) => b.categories.is_empty(),
        }
    }

    /// Histogram of a numeric column's non-missing values.
    pub fn histogram(df: &DataFrame, column: &str, bins: usize) -> PolarsResult<Self> {
        let values: Vec<f64> = numeric_values(df, column)?.into_iter().flatten().collect();
        Ok(ChartData::Histogram(HistogramData {
            column: column.to_string(),
            bins: equal_width_bins(&values, bins),
        }))
    }

    /// Frequencies of a column's values, most frequent first, capped at `limit`.
    pub fn bar(df: &DataFrame, column: &str, limit: usize) -> PolarsResult<Self> {
        let mut categories = StatsCalculator::value_counts(df.column(column)?);
        let hidden = categories.len().saturating_sub(limit);
        categories.truncate(limit);
        Ok(ChartData::Bar(BarData {
            column: column.to_string(),
            categories,
            hidden,
        }))
    }
}

/// Split `[min, max]` into `bins` equal-width intervals and count values.
/// A constant column gets one unit-wide bin centred on its value.
pub fn equal_width_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(min), Some(max)) = (StatsCalculator::min(values), StatsCalculator::max(values)) else {
        return Vec::new();
    };

    if min == max {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            count: values.len(),
        }];
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}
