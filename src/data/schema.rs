//! Column classification and small DataFrame helpers shared by the
//! loader, cleaner and aggregator.

use polars::prelude::*;

/// How a column participates in cleaning and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

/// All column names in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Names of the columns of the given kind, in table order.
pub fn columns_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == kind)
        .map(|col| col.name().to_string())
        .collect()
}

/// Names of the columns of the given kind holding at least one missing value.
pub fn columns_with_missing(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == kind && col.null_count() > 0)
        .map(|col| col.name().to_string())
        .collect()
}

/// Kind of a named column, if it exists.
pub fn kind_of(df: &DataFrame, name: &str) -> Option<ColumnKind> {
    df.column(name).ok().map(|col| ColumnKind::of(col.dtype()))
}

/// Numeric column as `f64` options, one per row.
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let as_f64 = df.column(name)?.cast(&DataType::Float64)?;
    Ok(as_f64.f64()?.into_iter().collect())
}

/// Display text for a cell, `None` for missing values.
pub fn cell_text(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string().trim_matches('"').to_string()),
    }
}

/// Display text for every cell of a column (missing as `None`).
pub fn column_text(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|i| column.get(i).ok().and_then(|v| cell_text(&v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "city" => [Some("Oslo"), None, Some("Rome")],
            "temp" => [Some(1.5), Some(2.0), None],
            "visits" => [3i64, 4, 5]
        )
        .unwrap()
    }

    #[test]
    fn classifies_numeric_and_text() {
        assert_eq!(ColumnKind::of(&DataType::Int32), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&DataType::String), ColumnKind::Categorical);
        assert_eq!(ColumnKind::of(&DataType::Boolean), ColumnKind::Categorical);
    }

    #[test]
    fn lists_columns_by_kind_and_missing() {
        let df = sample();
        assert_eq!(columns_of_kind(&df, ColumnKind::Numeric), vec!["temp", "visits"]);
        assert_eq!(columns_of_kind(&df, ColumnKind::Categorical), vec!["city"]);
        assert_eq!(columns_with_missing(&df, ColumnKind::Numeric), vec!["temp"]);
        assert_eq!(columns_with_missing(&df, ColumnKind::Categorical), vec!["city"]);
    }

    #[test]
    fn cell_text_strips_quotes_and_nulls() {
        let df = sample();
        let city = df.column("city").unwrap();
        assert_eq!(
            column_text(city),
            vec![Some("Oslo".to_string()), None, Some("Rome".to_string())]
        );
        assert_eq!(kind_of(&df, "visits"), Some(ColumnKind::Numeric));
        assert_eq!(kind_of(&df, "nope"), None);
    }
}
