//! Data Loader Module
//! Reads CSV files with Polars and spreadsheets with calamine into a DataFrame.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load spreadsheet: {0}")]
    Excel(String),
    #[error("Spreadsheet has no worksheets")]
    NoSheets,
    #[error("Unsupported file type '{0}' (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),
}

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    pub const CSV_EXTENSIONS: [&'static str; 1] = ["csv"];
    pub const EXCEL_EXTENSIONS: [&'static str; 4] = ["xlsx", "xls", "xlsm", "xlsb"];

    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if Self::CSV_EXTENSIONS.contains(&ext.as_str()) {
            Ok(FileFormat::Csv)
        } else if Self::EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            Ok(FileFormat::Excel)
        } else {
            Err(LoaderError::UnsupportedFormat(ext))
        }
    }
}

/// Inferred type of a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetColType {
    Int64,
    Float64,
    Boolean,
    Utf8,
}

/// Largest magnitude below which every whole float is an exact i64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Loads uploaded files into memory.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV or spreadsheet file, normalizing float NaN to null.
    pub fn load(path: &Path, infer_schema_length: usize) -> Result<DataFrame, LoaderError> {
        let df = match FileFormat::from_path(path)? {
            FileFormat::Csv => Self::load_csv(path, infer_schema_length)?,
            FileFormat::Excel => Self::load_excel(path)?,
        };
        let df = Self::nan_to_null(df)?;

        log::info!(
            "Loaded {}: {} rows, {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(path: &Path, infer_schema_length: usize) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(infer_schema_length))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Load the first worksheet of a spreadsheet. The first row holds the headers.
    pub fn load_excel(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| LoaderError::Excel(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoSheets)?
            .map_err(|e| LoaderError::Excel(e.to_string()))?;

        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        let Some((header_row, body)) = rows.split_first() else {
            return Ok(DataFrame::empty());
        };

        let mut columns = Vec::with_capacity(header_row.len());
        for (col_idx, header) in header_row.iter().enumerate() {
            let name = match Self::cell_string(header) {
                Some(h) if !h.trim().is_empty() => h,
                _ => format!("column_{}", col_idx + 1),
            };
            let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(col_idx)).collect();
            let series = Self::sheet_column_to_series(&name, &cells);
            columns.push(Column::from(series));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Infer a column type: any text makes the column text, integers (or whole
    /// floats) stay integral, booleans only when nothing else is present.
    fn infer_sheet_column(cells: &[Option<&Data>]) -> SheetColType {
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;

        for cell in cells.iter().flatten() {
            match cell {
                Data::Int(_) => has_int = true,
                Data::Float(f) => {
                    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
                        has_int = true;
                    } else {
                        has_float = true;
                    }
                }
                Data::Bool(_) => has_bool = true,
                Data::Empty | Data::Error(_) => {}
                _ => return SheetColType::Utf8,
            }
        }

        match (has_int, has_float, has_bool) {
            (_, _, true) if has_int || has_float => SheetColType::Utf8,
            (_, true, false) => SheetColType::Float64,
            (true, false, false) => SheetColType::Int64,
            (false, false, true) => SheetColType::Boolean,
            _ => SheetColType::Utf8,
        }
    }

    fn sheet_column_to_series(name: &str, cells: &[Option<&Data>]) -> Series {
        match Self::infer_sheet_column(cells) {
            SheetColType::Int64 => {
                let v: Vec<Option<i64>> = cells
                    .iter()
                    .map(|c| match c {
                        Some(Data::Int(i)) => Some(*i),
                        Some(Data::Float(f)) => Some(*f as i64),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), v)
            }
            SheetColType::Float64 => {
                let v: Vec<Option<f64>> = cells
                    .iter()
                    .map(|c| match c {
                        Some(Data::Int(i)) => Some(*i as f64),
                        Some(Data::Float(f)) => Some(*f),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), v)
            }
            SheetColType::Boolean => {
                let v: Vec<Option<bool>> = cells
                    .iter()
                    .map(|c| match c {
                        Some(Data::Bool(b)) => Some(*b),
                        _ => None,
                    })
                    .collect();
                Series::new(name.into(), v)
            }
            SheetColType::Utf8 => {
                let v: Vec<Option<String>> = cells
                    .iter()
                    .map(|c| c.and_then(Self::cell_string))
                    .collect();
                Series::new(name.into(), v)
            }
        }
    }

    fn cell_string(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Replace float NaN with null so the table has a single missing marker.
    fn nan_to_null(mut df: DataFrame) -> PolarsResult<DataFrame> {
        let float_cols: Vec<PlSmallStr> = df
            .get_columns()
            .iter()
            .filter(|c| matches!(c.dtype(), DataType::Float32 | DataType::Float64))
            .map(|c| c.name().clone())
            .collect();

        for name in float_cols {
            let values: Vec<Option<f64>> = df
                .column(name.as_str())?
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect();

            if values.iter().flatten().any(|v| v.is_nan()) {
                let cleaned: Vec<Option<f64>> = values
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect();
                df.with_column(Series::new(name, cleaned))?;
            }
        }
        Ok(df)
    }
}
