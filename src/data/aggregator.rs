//! Aggregator Module
//! Grouped summaries: one row per distinct value of a categorical grouping
//! column, one output column per (target column, function) pair.

use crate::data::schema::{self, ColumnKind};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),
    #[error("Cannot group by numeric column '{0}'; choose a categorical column")]
    NumericGroupColumn(String),
    #[error("Cannot apply '{function}' to column '{column}': it is not numeric")]
    UnsupportedFunction {
        column: String,
        function: &'static str,
    },
}

/// Named reductions available per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AggFunction {
    Mean,
    Sum,
    Min,
    Max,
    Count,
    Std,
    Median,
}

impl AggFunction {
    /// Canonical order, also used for output columns.
    pub const ALL: [AggFunction; 7] = [
        AggFunction::Mean,
        AggFunction::Sum,
        AggFunction::Min,
        AggFunction::Max,
        AggFunction::Count,
        AggFunction::Std,
        AggFunction::Median,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggFunction::Mean => "mean",
            AggFunction::Sum => "sum",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Count => "count",
            AggFunction::Std => "std",
            AggFunction::Median => "median",
        }
    }

    /// `count` works on any column; everything else needs numbers.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggFunction::Count)
    }

    /// Reduce the non-missing values of one group.
    fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            AggFunction::Mean => StatsCalculator::mean(values),
            AggFunction::Sum => Some(StatsCalculator::sum(values)),
            AggFunction::Min => StatsCalculator::min(values),
            AggFunction::Max => StatsCalculator::max(values),
            AggFunction::Count => Some(values.len() as f64),
            AggFunction::Std => StatsCalculator::std(values),
            AggFunction::Median => StatsCalculator::median(values),
        }
    }
}

/// A grouped aggregation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRequest {
    pub group_by: String,
    pub targets: Vec<String>,
    pub functions: Vec<AggFunction>,
}

#[derive(Debug, Clone)]
pub enum AggregationOutcome {
    /// No target columns or no functions selected.
    NothingToDo(String),
    Summary(DataFrame),
}

/// Row positions of each group, in the order groups first appear.
struct Groups {
    keys: Vec<String>,
    first_rows: Vec<IdxSize>,
    rows: Vec<Vec<usize>>,
}

impl Groups {
    /// Partition rows by the grouping column's value. Rows with a missing
    /// group value belong to no group.
    fn partition(column: &Column) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups = Groups {
            keys: Vec::new(),
            first_rows: Vec::new(),
            rows: Vec::new(),
        };

        for (row, key) in schema::column_text(column).into_iter().enumerate() {
            let Some(key) = key else { continue };
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.keys.push(key);
                groups.first_rows.push(row as IdxSize);
                groups.rows.push(Vec::new());
                groups.rows.len() - 1
            });
            groups.rows[slot].push(row);
        }
        groups
    }
}

/// Computes grouped summaries without touching the input table.
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(
        df: &DataFrame,
        request: &AggregationRequest,
    ) -> Result<AggregationOutcome, AggregationError> {
        if request.group_by.is_empty() {
            return Ok(AggregationOutcome::NothingToDo(
                "Select a categorical column to group by.".to_string(),
            ));
        }
        let group_kind = schema::kind_of(df, &request.group_by)
            .ok_or_else(|| AggregationError::UnknownColumn(request.group_by.clone()))?;
        if group_kind == ColumnKind::Numeric {
            return Err(AggregationError::NumericGroupColumn(request.group_by.clone()));
        }

        let mut seen = HashSet::new();
        let targets: Vec<&String> = request
            .targets
            .iter()
            .filter(|t| **t != request.group_by && seen.insert(t.as_str()))
            .collect();
        let mut functions = request.functions.clone();
        functions.sort();
        functions.dedup();

        if targets.is_empty() {
            return Ok(AggregationOutcome::NothingToDo(
                "Select at least one column to aggregate.".to_string(),
            ));
        }
        if functions.is_empty() {
            return Ok(AggregationOutcome::NothingToDo(
                "Select at least one aggregation function.".to_string(),
            ));
        }

        // Validate every pair before computing anything
        for target in &targets {
            let kind = schema::kind_of(df, target)
                .ok_or_else(|| AggregationError::UnknownColumn(target.to_string()))?;
            if kind == ColumnKind::Categorical {
                if let Some(f) = functions.iter().find(|f| f.requires_numeric()) {
                    return Err(AggregationError::UnsupportedFunction {
                        column: target.to_string(),
                        function: f.name(),
                    });
                }
            }
        }

        let group_column = df.column(&request.group_by)?;
        let groups = Groups::partition(group_column);

        let mut columns = Vec::with_capacity(1 + targets.len() * functions.len());
        let keys = group_column
            .as_materialized_series()
            .take(&IdxCa::from_vec("idx".into(), groups.first_rows.clone()))?;
        columns.push(Column::from(keys));

        for target in targets {
            let present = Self::present_values(df, target, &groups)?;
            for function in &functions {
                let name = format!("{}_{}", target, function.name());
                let series = match function {
                    AggFunction::Count => {
                        let counts: Vec<IdxSize> =
                            present.iter().map(|g| g.len() as IdxSize).collect();
                        Series::new(name.as_str().into(), counts)
                    }
                    _ => {
                        let values: Vec<Option<f64>> =
                            present.iter().map(|g| function.apply(g)).collect();
                        Series::new(name.as_str().into(), values)
                    }
                };
                columns.push(Column::from(series));
            }
        }

        let summary = DataFrame::new(columns)?;
        log::info!(
            "Aggregated by '{}': {} groups, {} columns",
            request.group_by,
            summary.height(),
            summary.width()
        );
        Ok(AggregationOutcome::Summary(summary))
    }

    /// Non-missing values of `target` per group. Categorical targets only
    /// reach here for `count`, so their values are placeholders.
    fn present_values(
        df: &DataFrame,
        target: &str,
        groups: &Groups,
    ) -> Result<Vec<Vec<f64>>, AggregationError> {
        let values: Vec<Option<f64>> = match schema::kind_of(df, target) {
            Some(ColumnKind::Numeric) => schema::numeric_values(df, target)?,
            _ => schema::column_text(df.column(target)?)
                .into_iter()
                .map(|t| t.map(|_| 0.0))
                .collect(),
        };

        Ok(groups
            .rows
            .iter()
            .map(|rows| rows.iter().filter_map(|&r| values[r]).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> DataFrame {
        df!(
            "region" => [Some("B"), Some("A"), Some("B"), None, Some("A")],
            "amount" => [Some(5.0), Some(10.0), None, Some(99.0), Some(20.0)],
            "note" => [Some("x"), None, Some("y"), Some("z"), Some("w")]
        )
        .unwrap()
    }

    fn request(targets: &[&str], functions: &[AggFunction]) -> AggregationRequest {
        AggregationRequest {
            group_by: "region".into(),
            targets: targets.iter().map(|s| s.to_string()).collect(),
            functions: functions.to_vec(),
        }
    }

    fn summary(outcome: AggregationOutcome) -> DataFrame {
        match outcome {
            AggregationOutcome::Summary(df) => df,
            AggregationOutcome::NothingToDo(msg) => panic!("nothing to do: {}", msg),
        }
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        schema::numeric_values(df, name).unwrap()
    }

    #[test]
    fn mean_per_group_in_emergence_order() {
        let df = df!(
            "group" => ["A", "A", "B"],
            "val" => [10.0, 20.0, 5.0]
        )
        .unwrap();
        let req = AggregationRequest {
            group_by: "group".into(),
            targets: vec!["val".into()],
            functions: vec![AggFunction::Mean],
        };
        let out = summary(Aggregator::aggregate(&df, &req).unwrap());

        assert_eq!(schema::column_names(&out), vec!["group", "val_mean"]);
        assert_eq!(
            schema::column_text(out.column("group").unwrap()),
            vec![Some("A".to_string()), Some("B".to_string())]
        );
        assert_eq!(floats(&out, "val_mean"), vec![Some(15.0), Some(5.0)]);
    }

    #[test]
    fn missing_values_and_null_groups_are_excluded() {
        let df = sales();
        let out = summary(
            Aggregator::aggregate(
                &df,
                &request(
                    &["amount"],
                    &[AggFunction::Count, AggFunction::Sum, AggFunction::Max],
                ),
            )
            .unwrap(),
        );

        assert_eq!(
            schema::column_names(&out),
            vec!["region", "amount_sum", "amount_max", "amount_count"]
        );
        assert_eq!(out.height(), 2);
        assert_eq!(floats(&out, "amount_sum"), vec![Some(5.0), Some(30.0)]);
        assert_eq!(floats(&out, "amount_count"), vec![Some(1.0), Some(2.0)]);
        assert_eq!(floats(&out, "amount_max"), vec![Some(5.0), Some(20.0)]);
    }

    #[test]
    fn std_and_median_per_group() {
        let df = sales();
        let out = summary(
            Aggregator::aggregate(
                &df,
                &request(&["amount"], &[AggFunction::Std, AggFunction::Median]),
            )
            .unwrap(),
        );
        let std = floats(&out, "amount_std");
        // B has one value, so no sample deviation
        assert_eq!(std[0], None);
        assert!((std[1].unwrap() - 7.0710678118654755).abs() < 1e-9);
        assert_eq!(floats(&out, "amount_median"), vec![Some(5.0), Some(15.0)]);
    }

    #[test]
    fn count_works_on_text_columns() {
        let df = sales();
        let out = summary(
            Aggregator::aggregate(&df, &request(&["note"], &[AggFunction::Count])).unwrap(),
        );
        assert_eq!(floats(&out, "note_count"), vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn numeric_function_on_text_aborts_request() {
        let df = sales();
        let err = Aggregator::aggregate(
            &df,
            &request(&["amount", "note"], &[AggFunction::Count, AggFunction::Std]),
        )
        .unwrap_err();
        match err {
            AggregationError::UnsupportedFunction { column, function } => {
                assert_eq!(column, "note");
                assert_eq!(function, "std");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn numeric_group_column_is_rejected() {
        let df = sales();
        let req = AggregationRequest {
            group_by: "amount".into(),
            targets: vec!["note".into()],
            functions: vec![AggFunction::Count],
        };
        assert!(matches!(
            Aggregator::aggregate(&df, &req),
            Err(AggregationError::NumericGroupColumn(_))
        ));
    }

    #[test]
    fn empty_selections_are_nothing_to_do() {
        let df = sales();
        assert!(matches!(
            Aggregator::aggregate(&df, &request(&[], &[AggFunction::Mean])).unwrap(),
            AggregationOutcome::NothingToDo(_)
        ));
        assert!(matches!(
            Aggregator::aggregate(&df, &request(&["amount"], &[])).unwrap(),
            AggregationOutcome::NothingToDo(_)
        ));
        // grouping column alone is not a target
        assert!(matches!(
            Aggregator::aggregate(&df, &request(&["region"], &[AggFunction::Count])).unwrap(),
            AggregationOutcome::NothingToDo(_)
        ));
    }

    #[test]
    fn input_table_is_not_mutated() {
        let df = sales();
        let before = df.clone();
        Aggregator::aggregate(&df, &request(&["amount"], &[AggFunction::Mean])).unwrap();
        assert!(df.equals_missing(&before));
    }

    #[test]
    fn repeated_targets_are_aggregated_once() {
        let df = sales();
        let out = summary(
            Aggregator::aggregate(&df, &request(&["amount", "amount"], &[AggFunction::Mean]))
                .unwrap(),
        );
        assert_eq!(out.width(), 2);
        assert_eq!(floats(&out, "amount_mean"), vec![Some(5.0), Some(15.0)]);
    }

    #[test]
    fn missing_group_column_is_guidance() {
        let df = df!("v" => [1.0, 2.0]).unwrap();
        let req = AggregationRequest {
            group_by: String::new(),
            targets: vec!["v".into()],
            functions: vec![AggFunction::Mean],
        };
        assert!(matches!(
            Aggregator::aggregate(&df, &req).unwrap(),
            AggregationOutcome::NothingToDo(_)
        ));
    }
}
