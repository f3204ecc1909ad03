//! Stats module - descriptive statistics and value frequencies

mod calculator;

pub use calculator::{ColumnSummary, StatsCalculator, ValueCount};
