//! Missing-Value Resolver
//! Applies the user's numeric or categorical cleaning strategy to the table,
//! plus duplicate-row removal and the "same method for every column" shortcut.
//!
//! Every request is validated and computed before the table is touched, so a
//! failed request leaves the table exactly as it was.

use crate::data::schema::{self, ColumnKind};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleaningError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),
    #[error("Column '{column}' is not {expected}")]
    WrongColumnKind {
        column: String,
        expected: &'static str,
    },
    #[error("Column '{column}' has no values, so it cannot be filled with {strategy}")]
    AllMissing {
        column: String,
        strategy: &'static str,
    },
    #[error(
        "Cannot compute a weighted average for '{column}': weights in '{weight_column}' are all missing or sum to zero"
    )]
    DegenerateWeights {
        column: String,
        weight_column: String,
    },
}

/// Which columns a strategy applies to.
///
/// `All` expands to every column of the strategy's kind that contains at
/// least one missing value. `Only` names the columns explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnScope {
    #[default]
    All,
    Only(Vec<String>),
}

impl ColumnScope {
    /// Build a scope from a multi-selection; nothing selected means `All`.
    pub fn from_selection(selected: Vec<String>) -> Self {
        if selected.is_empty() {
            ColumnScope::All
        } else {
            ColumnScope::Only(selected)
        }
    }

    /// Expand to concrete column names of `kind`.
    fn resolve(&self, df: &DataFrame, kind: ColumnKind) -> Result<Vec<String>, CleaningError> {
        match self {
            ColumnScope::All => Ok(schema::columns_with_missing(df, kind)),
            ColumnScope::Only(names) => {
                let mut seen = HashSet::new();
                let mut resolved = Vec::with_capacity(names.len());
                for name in names {
                    check_kind(df, name, kind)?;
                    if seen.insert(name.as_str()) {
                        resolved.push(name.clone());
                    }
                }
                Ok(resolved)
            }
        }
    }
}

fn check_kind(df: &DataFrame, name: &str, kind: ColumnKind) -> Result<(), CleaningError> {
    match schema::kind_of(df, name) {
        None => Err(CleaningError::UnknownColumn(name.to_string())),
        Some(k) if k != kind => Err(CleaningError::WrongColumnKind {
            column: name.to_string(),
            expected: kind.label(),
        }),
        Some(_) => Ok(()),
    }
}

/// Strategies for numeric columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericStrategy {
    DropRows,
    FillMean,
    FillMedian,
    FillWeightedAverage { weight_column: String },
    Interpolate,
    LeaveAsIs,
}

impl NumericStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            NumericStrategy::DropRows => "Drop rows with missing values",
            NumericStrategy::FillMean => "Fill with mean",
            NumericStrategy::FillMedian => "Fill with median",
            NumericStrategy::FillWeightedAverage { .. } => "Fill with weighted average",
            NumericStrategy::Interpolate => "Interpolate",
            NumericStrategy::LeaveAsIs => "Leave as is",
        }
    }
}

/// Strategies for categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalStrategy {
    DropRows,
    FillMode,
    LeaveAsIs,
}

impl CategoricalStrategy {
    pub const ALL: [CategoricalStrategy; 3] = [
        CategoricalStrategy::DropRows,
        CategoricalStrategy::FillMode,
        CategoricalStrategy::LeaveAsIs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoricalStrategy::DropRows => "Drop rows with missing values",
            CategoricalStrategy::FillMode => "Fill with mode",
            CategoricalStrategy::LeaveAsIs => "Leave as is",
        }
    }
}

/// One method applied to every column at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStrategy {
    DropRows,
    FillMeanNumeric,
    FillModeAll,
}

impl BulkStrategy {
    pub const ALL: [BulkStrategy; 3] = [
        BulkStrategy::DropRows,
        BulkStrategy::FillMeanNumeric,
        BulkStrategy::FillModeAll,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BulkStrategy::DropRows => "Drop rows with missing values",
            BulkStrategy::FillMeanNumeric => "Fill with mean (numeric only)",
            BulkStrategy::FillModeAll => "Fill with mode (all columns)",
        }
    }
}

/// What a cleaning request did.
#[derive(Debug, Clone, PartialEq)]
pub enum CleaningOutcome {
    /// No column of the requested kind has a missing value.
    NoMissingValues,
    /// "Leave as is" was chosen.
    LeftAsIs,
    Applied(CleaningReport),
}

impl CleaningOutcome {
    pub fn message(&self, kind: &str) -> String {
        match self {
            CleaningOutcome::NoMissingValues => {
                format!("No {} columns with missing values found in the dataset.", kind)
            }
            CleaningOutcome::LeftAsIs => {
                format!("No changes will be made to missing {} values.", kind)
            }
            CleaningOutcome::Applied(report) => report.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    pub columns: Vec<String>,
    pub rows_before: usize,
    pub rows_after: usize,
    pub cells_filled: usize,
    pub message: String,
}

/// Handles missing-value cleaning operations.
pub struct MissingValueResolver;

impl MissingValueResolver {
    /// Apply a numeric strategy to the numeric columns in `scope`.
    pub fn resolve_numeric(
        df: &mut DataFrame,
        strategy: &NumericStrategy,
        scope: &ColumnScope,
    ) -> Result<CleaningOutcome, CleaningError> {
        if schema::columns_with_missing(df, ColumnKind::Numeric).is_empty() {
            return Ok(CleaningOutcome::NoMissingValues);
        }
        let targets = match strategy {
            NumericStrategy::LeaveAsIs => return Ok(CleaningOutcome::LeftAsIs),
            _ => scope.resolve(df, ColumnKind::Numeric)?,
        };
        log::debug!("Numeric cleaning '{}' on {:?}", strategy.label(), targets);

        let rows_before = df.height();
        let (message, cells_filled) = match strategy {
            NumericStrategy::DropRows => {
                *df = Self::drop_rows(df, &targets)?;
                ("Rows with missing values dropped!", 0)
            }
            NumericStrategy::FillMean => (
                "Missing values filled with mean!",
                Self::fill_numeric_scalar(df, &targets, "mean", StatsCalculator::mean)?,
            ),
            NumericStrategy::FillMedian => (
                "Missing values filled with median!",
                Self::fill_numeric_scalar(df, &targets, "median", StatsCalculator::median)?,
            ),
            NumericStrategy::FillWeightedAverage { weight_column } => (
                "Missing values filled with weighted average!",
                Self::fill_weighted_average(df, &targets, weight_column)?,
            ),
            NumericStrategy::Interpolate => (
                "Missing values filled with linear interpolation!",
                Self::interpolate(df, &targets)?,
            ),
            NumericStrategy::LeaveAsIs => return Ok(CleaningOutcome::LeftAsIs),
        };

        Ok(Self::report(targets, rows_before, df.height(), cells_filled, message))
    }

    /// Apply a categorical strategy to the categorical columns in `scope`.
    pub fn resolve_categorical(
        df: &mut DataFrame,
        strategy: CategoricalStrategy,
        scope: &ColumnScope,
    ) -> Result<CleaningOutcome, CleaningError> {
        if schema::columns_with_missing(df, ColumnKind::Categorical).is_empty() {
            return Ok(CleaningOutcome::NoMissingValues);
        }

        let targets = match strategy {
            CategoricalStrategy::LeaveAsIs => return Ok(CleaningOutcome::LeftAsIs),
            _ => scope.resolve(df, ColumnKind::Categorical)?,
        };
        log::debug!("Categorical cleaning '{}' on {:?}", strategy.label(), targets);

        let rows_before = df.height();
        let (message, cells_filled) = match strategy {
            CategoricalStrategy::DropRows => {
                *df = Self::drop_rows(df, &targets)?;
                ("Rows with missing values dropped!", 0)
            }
            CategoricalStrategy::FillMode => (
                "Missing values filled with mode!",
                Self::fill_mode(df, &targets)?,
            ),
            CategoricalStrategy::LeaveAsIs => return Ok(CleaningOutcome::LeftAsIs),
        };

        Ok(Self::report(targets, rows_before, df.height(), cells_filled, message))
    }

    /// Apply one method across every column.
    pub fn resolve_all(
        df: &mut DataFrame,
        strategy: BulkStrategy,
    ) -> Result<CleaningOutcome, CleaningError> {
        let targets: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.null_count() > 0)
            .map(|c| c.name().to_string())
            .collect();
        if targets.is_empty() {
            return Ok(CleaningOutcome::NoMissingValues);
        }

        let rows_before = df.height();
        let (targets, message, cells_filled) = match strategy {
            BulkStrategy::DropRows => {
                *df = Self::drop_rows(df, &targets)?;
                (targets, "Rows with missing values dropped from all columns!", 0)
            }
            BulkStrategy::FillMeanNumeric => {
                let numeric = schema::columns_with_missing(df, ColumnKind::Numeric);
                let filled = Self::fill_numeric_scalar(df, &numeric, "mean", StatsCalculator::mean)?;
                (numeric, "Missing values in numeric columns filled with mean!", filled)
            }
            BulkStrategy::FillModeAll => {
                let filled = Self::fill_mode(df, &targets)?;
                (targets, "Missing values in all columns filled with mode!", filled)
            }
        };

        Ok(Self::report(targets, rows_before, df.height(), cells_filled, message))
    }

    /// Drop exact duplicate rows, keeping the first occurrence. Returns the
    /// number of rows removed.
    pub fn remove_duplicates(df: &mut DataFrame) -> Result<usize, CleaningError> {
        let unique = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;

        let removed = df.height() - unique.height();
        if removed > 0 {
            *df = unique;
        }
        Ok(removed)
    }

    fn report(
        columns: Vec<String>,
        rows_before: usize,
        rows_after: usize,
        cells_filled: usize,
        message: &str,
    ) -> CleaningOutcome {
        log::info!(
            "{} columns={:?} rows {} -> {}, {} cells filled",
            message,
            columns,
            rows_before,
            rows_after,
            cells_filled
        );
        CleaningOutcome::Applied(CleaningReport {
            columns,
            rows_before,
            rows_after,
            cells_filled,
            message: message.to_string(),
        })
    }

    /// Rows with no missing value in any of `columns`.
    fn drop_rows(df: &DataFrame, columns: &[String]) -> Result<DataFrame, CleaningError> {
        let predicate = columns
            .iter()
            .map(|name| col(name.as_str()).is_not_null())
            .reduce(|acc, e| acc.and(e));
        match predicate {
            Some(predicate) => Ok(df.clone().lazy().filter(predicate).collect()?),
            None => Ok(df.clone()),
        }
    }

    /// Fill each column's missing values with one scalar computed from its
    /// non-missing values.
    fn fill_numeric_scalar(
        df: &mut DataFrame,
        columns: &[String],
        strategy: &'static str,
        reduce: fn(&[f64]) -> Option<f64>,
    ) -> Result<usize, CleaningError> {
        let mut filled = Vec::with_capacity(columns.len());
        for name in columns {
            let values = schema::numeric_values(df, name)?;
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let fill = reduce(&present).ok_or_else(|| CleaningError::AllMissing {
                column: name.clone(),
                strategy,
            })?;
            filled.push((name.as_str(), values, fill));
        }

        let mut cells = 0;
        let replacements: Vec<Series> = filled
            .into_iter()
            .map(|(name, values, fill)| {
                cells += values.iter().filter(|v| v.is_none()).count();
                Self::filled_series(name, &values, fill)
            })
            .collect();
        Self::replace_columns(df, replacements)?;
        Ok(cells)
    }

    fn fill_weighted_average(
        df: &mut DataFrame,
        columns: &[String],
        weight_column: &str,
    ) -> Result<usize, CleaningError> {
        check_kind(df, weight_column, ColumnKind::Numeric)?;
        let weights = schema::numeric_values(df, weight_column)?;

        let mut cells = 0;
        let mut replacements = Vec::with_capacity(columns.len());
        for name in columns {
            let values = schema::numeric_values(df, name)?;
            // rows missing either the value or its weight are left out
            let pairs: Vec<(f64, f64)> = values
                .iter()
                .zip(weights.iter())
                .filter_map(|(v, w)| Some(((*v)?, (*w)?)))
                .collect();
            let fill = StatsCalculator::weighted_mean(&pairs).ok_or_else(|| {
                CleaningError::DegenerateWeights {
                    column: name.clone(),
                    weight_column: weight_column.to_string(),
                }
            })?;
            cells += values.iter().filter(|v| v.is_none()).count();
            replacements.push(Self::filled_series(name, &values, fill));
        }

        Self::replace_columns(df, replacements)?;
        Ok(cells)
    }

    fn interpolate(df: &mut DataFrame, columns: &[String]) -> Result<usize, CleaningError> {
        let mut cells = 0;
        let mut replacements = Vec::with_capacity(columns.len());
        for name in columns {
            let values = schema::numeric_values(df, name)?;
            let interpolated =
                interpolate_linear(&values).ok_or_else(|| CleaningError::AllMissing {
                    column: name.clone(),
                    strategy: "interpolation",
                })?;
            cells += values.iter().filter(|v| v.is_none()).count();
            replacements.push(Series::new(name.as_str().into(), interpolated));
        }

        Self::replace_columns(df, replacements)?;
        Ok(cells)
    }

    /// Fill each column with its most frequent value. Works for any dtype;
    /// the column keeps its type because the fill is a gather of an existing row.
    fn fill_mode(df: &mut DataFrame, columns: &[String]) -> Result<usize, CleaningError> {
        let mut cells = 0;
        let mut replacements = Vec::with_capacity(columns.len());
        for name in columns {
            let column = df.column(name)?;
            // floats are keyed by exact value
            let (present, mode) = if column.dtype().is_float() {
                let keys = float_keys(column)?;
                (keys.iter().map(Option::is_some).collect::<Vec<_>>(), mode_row(&keys))
            } else {
                let keys = schema::column_text(column);
                (keys.iter().map(Option::is_some).collect::<Vec<_>>(), mode_row(&keys))
            };
            let mode = mode.ok_or_else(|| CleaningError::AllMissing {
                column: name.clone(),
                strategy: "mode",
            })?;

            let indices: Vec<IdxSize> = present
                .iter()
                .enumerate()
                .map(|(row, &is_present)| {
                    if is_present {
                        row as IdxSize
                    } else {
                        mode as IdxSize
                    }
                })
                .collect();
            cells += present.iter().filter(|p| !**p).count();

            let gathered = column
                .as_materialized_series()
                .take(&IdxCa::from_vec("idx".into(), indices))?;
            replacements.push(gathered);
        }

        Self::replace_columns(df, replacements)?;
        Ok(cells)
    }

    fn filled_series(name: &str, values: &[Option<f64>], fill: f64) -> Series {
        let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
        Series::new(name.into(), filled)
    }

    fn replace_columns(df: &mut DataFrame, replacements: Vec<Series>) -> PolarsResult<()> {
        for series in replacements {
            df.with_column(series)?;
        }
        Ok(())
    }
}

/// Linear interpolation over row order. Runs before the first or after the
/// last known value take that nearest known value. `None` if nothing is known.
pub fn interpolate_linear(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|x| (i, x)))
        .collect();
    let (&(first_idx, first_val), &(last_idx, last_val)) = (known.first()?, known.last()?);

    let mut out = Vec::with_capacity(values.len());
    let mut next = 0;
    for (i, v) in values.iter().enumerate() {
        if let Some(x) = v {
            out.push(*x);
            next += 1;
            continue;
        }
        if i < first_idx {
            out.push(first_val);
        } else if i > last_idx {
            out.push(last_val);
        } else {
            let (lo_idx, lo_val) = known[next - 1];
            let (hi_idx, hi_val) = known[next];
            let t = (i - lo_idx) as f64 / (hi_idx - lo_idx) as f64;
            out.push(lo_val + (hi_val - lo_val) * t);
        }
    }
    Some(out)
}

/// Exact identity of each float cell. Both zeros share one key.
fn float_keys(column: &Column) -> PolarsResult<Vec<Option<u64>>> {
    let cast = column.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.map(|x| if x == 0.0 { 0u64 } else { x.to_bits() }))
        .collect())
}

/// Row index of the first occurrence of the most frequent non-missing key.
/// Ties go to the key seen first.
pub fn mode_row<K: Eq + Hash>(keys: &[Option<K>]) -> Option<usize> {
    let mut counts: HashMap<&K, (usize, usize)> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(k) = key {
            counts.entry(k).or_insert((0, row)).0 += 1;
        }
    }
    counts
        .into_values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(_, first)| first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        schema::numeric_values(df, name).unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        schema::column_text(df.column(name).unwrap())
    }

    fn mixed() -> DataFrame {
        df!(
            "city" => [Some("Oslo"), None, Some("Rome"), Some("Oslo"), None],
            "temp" => [Some(1.0), None, Some(3.0), Some(5.0), Some(7.0)],
            "rain" => [Some(10i64), Some(20), None, Some(40), Some(50)],
            "id" => [1i64, 2, 3, 4, 5]
        )
        .unwrap()
    }

    #[test]
    fn scope_from_empty_selection_is_all() {
        assert_eq!(ColumnScope::from_selection(vec![]), ColumnScope::All);
        assert_eq!(
            ColumnScope::from_selection(vec!["a".into()]),
            ColumnScope::Only(vec!["a".into()])
        );
    }

    #[test]
    fn mean_fill_preserves_mean_and_removes_missing() {
        let mut df = mixed();
        let outcome = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillMean,
            &ColumnScope::Only(vec!["temp".into()]),
        )
        .unwrap();

        let temp = floats(&df, "temp");
        assert!(temp.iter().all(|v| v.is_some()));
        let values: Vec<f64> = temp.into_iter().flatten().collect();
        assert_eq!(StatsCalculator::mean(&values), Some(4.0));
        assert_eq!(values[1], 4.0);
        // rain was outside the scope
        assert_eq!(df.column("rain").unwrap().null_count(), 1);

        match outcome {
            CleaningOutcome::Applied(report) => {
                assert_eq!(report.columns, vec!["temp"]);
                assert_eq!(report.cells_filled, 1);
                assert_eq!(report.rows_after, 5);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn all_scope_fills_every_numeric_column_with_missing() {
        let mut df = mixed();
        MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillMedian,
            &ColumnScope::All,
        )
        .unwrap();

        assert_eq!(floats(&df, "temp")[1], Some(4.0));
        assert_eq!(floats(&df, "rain")[2], Some(30.0));
        // untouched integer column keeps its type
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("city").unwrap().null_count(), 2);
    }

    #[test]
    fn drop_rows_only_considers_scope() {
        let mut df = mixed();
        MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::DropRows,
            &ColumnScope::Only(vec!["temp".into()]),
        )
        .unwrap();

        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 4);
        assert_eq!(df.column("temp").unwrap().null_count(), 0);
        assert_eq!(df.column("rain").unwrap().null_count(), 1);
    }

    #[test]
    fn drop_rows_all_numeric() {
        let mut df = mixed();
        MissingValueResolver::resolve_numeric(&mut df, &NumericStrategy::DropRows, &ColumnScope::All)
            .unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(floats(&df, "id"), vec![Some(1.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn weighted_average_uses_aligned_pairs() {
        let mut df = df!(
            "v" => [Some(2.0), Some(4.0), None],
            "w" => [1.0, 3.0, 1.0]
        )
        .unwrap();
        MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillWeightedAverage {
                weight_column: "w".into(),
            },
            &ColumnScope::All,
        )
        .unwrap();
        assert_eq!(floats(&df, "v"), vec![Some(2.0), Some(4.0), Some(3.5)]);
    }

    #[test]
    fn weighted_average_skips_rows_with_missing_weight() {
        let mut df = df!(
            "v" => [Some(2.0), Some(100.0), Some(4.0), None],
            "w" => [Some(1.0), None, Some(3.0), Some(2.0)]
        )
        .unwrap();
        MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillWeightedAverage {
                weight_column: "w".into(),
            },
            &ColumnScope::Only(vec!["v".into()]),
        )
        .unwrap();
        assert_eq!(floats(&df, "v")[3], Some(3.5));
    }

    #[test]
    fn zero_weights_are_an_error_and_leave_table_untouched() {
        let original = df!(
            "v" => [Some(2.0), Some(4.0), None],
            "w" => [0.0, 0.0, 1.0]
        )
        .unwrap();
        let mut df = original.clone();
        let err = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillWeightedAverage {
                weight_column: "w".into(),
            },
            &ColumnScope::All,
        )
        .unwrap_err();

        assert!(matches!(err, CleaningError::DegenerateWeights { ref column, .. } if column == "v"));
        assert!(df.equals_missing(&original));
    }

    #[test]
    fn weight_column_must_be_numeric() {
        let mut df = mixed();
        let err = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillWeightedAverage {
                weight_column: "city".into(),
            },
            &ColumnScope::All,
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::WrongColumnKind { .. }));
    }

    #[test]
    fn interpolation_fills_interior_and_edges() {
        let values = [None, Some(1.0), None, None, Some(4.0), None];
        assert_eq!(
            interpolate_linear(&values),
            Some(vec![1.0, 1.0, 2.0, 3.0, 4.0, 4.0])
        );
        assert_eq!(interpolate_linear(&[None, None]), None);
    }

    #[test]
    fn interpolating_an_empty_column_is_reported() {
        let mut df = df!(
            "x" => [None::<f64>, None],
            "y" => [Some(1.0), None]
        )
        .unwrap();
        let err = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::Interpolate,
            &ColumnScope::All,
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::AllMissing { ref column, .. } if column == "x"));
        // y must not have been filled either
        assert_eq!(df.column("y").unwrap().null_count(), 1);
    }

    #[test]
    fn leave_as_is_never_mutates() {
        let original = mixed();
        let mut df = original.clone();
        let outcome =
            MissingValueResolver::resolve_numeric(&mut df, &NumericStrategy::LeaveAsIs, &ColumnScope::All)
                .unwrap();
        assert_eq!(outcome, CleaningOutcome::LeftAsIs);

        let outcome = MissingValueResolver::resolve_categorical(
            &mut df,
            CategoricalStrategy::LeaveAsIs,
            &ColumnScope::All,
        )
        .unwrap();
        assert_eq!(outcome, CleaningOutcome::LeftAsIs);
        assert!(df.equals_missing(&original));
    }

    #[test]
    fn no_missing_numeric_is_a_reported_noop() {
        let mut df = df!("a" => [1.0, 2.0], "b" => [Some("x"), None]).unwrap();
        let outcome =
            MissingValueResolver::resolve_numeric(&mut df, &NumericStrategy::FillMean, &ColumnScope::All)
                .unwrap();
        assert_eq!(outcome, CleaningOutcome::NoMissingValues);
        assert!(outcome.message("numeric").contains("No numeric columns"));
    }

    #[test]
    fn numeric_scope_rejects_text_and_unknown_columns() {
        let mut df = mixed();
        let err = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillMean,
            &ColumnScope::Only(vec!["city".into()]),
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::WrongColumnKind { .. }));

        let err = MissingValueResolver::resolve_numeric(
            &mut df,
            &NumericStrategy::FillMean,
            &ColumnScope::Only(vec!["missing".into()]),
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::UnknownColumn(name) if name == "missing"));
    }

    #[test]
    fn mode_fill_uses_existing_value() {
        let mut df = mixed();
        MissingValueResolver::resolve_categorical(
            &mut df,
            CategoricalStrategy::FillMode,
            &ColumnScope::All,
        )
        .unwrap();
        let city = strings(&df, "city");
        assert_eq!(city[1].as_deref(), Some("Oslo"));
        assert_eq!(city[4].as_deref(), Some("Oslo"));
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        // numeric columns untouched
        assert_eq!(df.column("temp").unwrap().null_count(), 1);
    }

    #[test]
    fn mode_ties_go_to_first_seen() {
        let texts: Vec<Option<String>> = ["b", "a", "a", "b"]
            .iter()
            .map(|s| Some(s.to_string()))
            .chain([None])
            .collect();
        assert_eq!(mode_row(&texts), Some(0));
        assert_eq!(mode_row::<String>(&[None, None]), None);
    }

    #[test]
    fn categorical_drop_rows() {
        let mut df = mixed();
        MissingValueResolver::resolve_categorical(
            &mut df,
            CategoricalStrategy::DropRows,
            &ColumnScope::All,
        )
        .unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("city").unwrap().null_count(), 0);
    }

    #[test]
    fn bulk_strategies() {
        let mut df = mixed();
        MissingValueResolver::resolve_all(&mut df, BulkStrategy::DropRows).unwrap();
        assert_eq!(df.height(), 2);

        let mut df = mixed();
        MissingValueResolver::resolve_all(&mut df, BulkStrategy::FillMeanNumeric).unwrap();
        assert_eq!(df.column("temp").unwrap().null_count(), 0);
        assert_eq!(df.column("rain").unwrap().null_count(), 0);
        assert_eq!(df.column("city").unwrap().null_count(), 2);

        let mut df = mixed();
        MissingValueResolver::resolve_all(&mut df, BulkStrategy::FillModeAll).unwrap();
        assert!(df.get_columns().iter().all(|c| c.null_count() == 0));
        // integer column keeps its type under mode fill
        assert_eq!(df.column("rain").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn duplicates_removed_keeping_first() {
        let mut df = df!(
            "k" => [Some("a"), Some("b"), Some("a"), None, None],
            "v" => [Some(1i64), Some(2), Some(1), None, None]
        )
        .unwrap();
        let removed = MissingValueResolver::remove_duplicates(&mut df).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(df.height(), 3);
        assert_eq!(
            strings(&df, "k"),
            vec![Some("a".to_string()), Some("b".to_string()), None]
        );
    }

    #[test]
    fn close_floats_are_not_duplicates() {
        let mut df = df!("x" => [0.1, 0.1000000000001, 0.1000000000002]).unwrap();
        let removed = MissingValueResolver::remove_duplicates(&mut df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn float_mode_counts_exact_values() {
        let mut df = df!(
            "x" => [Some(5.0), Some(1.00000000001), Some(1.00000000002), None]
        )
        .unwrap();
        MissingValueResolver::resolve_all(&mut df, BulkStrategy::FillModeAll).unwrap();
        // every value appears once, so the first one wins
        assert_eq!(floats(&df, "x")[3], Some(5.0));
    }

    #[test]
    fn leave_as_is_ignores_scope() {
        let mut df = mixed();
        let scope = ColumnScope::Only(vec!["nope".to_string()]);
        let outcome = MissingValueResolver::resolve_categorical(
            &mut df,
            CategoricalStrategy::LeaveAsIs,
            &scope,
        )
        .unwrap();
        assert_eq!(outcome, CleaningOutcome::LeftAsIs);
        let outcome =
            MissingValueResolver::resolve_numeric(&mut df, &NumericStrategy::LeaveAsIs, &scope)
                .unwrap();
        assert_eq!(outcome, CleaningOutcome::LeftAsIs);
    }
}
