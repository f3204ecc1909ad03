//! Dashboard Session
//! Owns the table of one uploaded file and threads it through the cleaning
//! and aggregation steps. Each dashboard window holds at most one session.

use crate::charts::ChartData;
use crate::config::DashboardConfig;
use crate::data::{
    AggregationError, AggregationOutcome, AggregationRequest, Aggregator, BulkStrategy,
    CategoricalStrategy, CleaningError, CleaningOutcome, ColumnScope, DataLoader, LoaderError,
    MissingValueResolver, NumericStrategy,
};
use crate::stats::{ColumnSummary, StatsCalculator, ValueCount};
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub struct Session {
    source: PathBuf,
    loaded: DataFrame,
    current: DataFrame,
    aggregation: Option<DataFrame>,
}

impl Session {
    /// Load a file into a new session.
    pub fn open(path: &Path, config: &DashboardConfig) -> Result<Self, LoaderError> {
        let df = DataLoader::load(path, config.infer_schema_length)?;
        Ok(Self::from_frame(path, df))
    }

    pub fn from_frame(source: impl Into<PathBuf>, df: DataFrame) -> Self {
        Self {
            source: source.into(),
            loaded: df.clone(),
            current: df,
            aggregation: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// The table as loaded, before any cleaning.
    pub fn loaded(&self) -> &DataFrame {
        &self.loaded
    }

    /// The table after the cleaning applied so far.
    pub fn table(&self) -> &DataFrame {
        &self.current
    }

    pub fn preview(&self, rows: usize) -> DataFrame {
        self.current.head(Some(rows))
    }

    pub fn last_aggregation(&self) -> Option<&DataFrame> {
        self.aggregation.as_ref()
    }

    /// Discard all cleaning and start again from the loaded table.
    pub fn reset(&mut self) {
        self.current = self.loaded.clone();
        self.aggregation = None;
        log::info!("Session reset to loaded data ({} rows)", self.current.height());
    }

    pub fn remove_duplicates(&mut self) -> Result<usize, CleaningError> {
        let removed = MissingValueResolver::remove_duplicates(&mut self.current)?;
        if removed > 0 {
            self.aggregation = None;
        }
        log::info!("Removed {} duplicate rows", removed);
        Ok(removed)
    }

    pub fn clean_numeric(
        &mut self,
        strategy: &NumericStrategy,
        scope: &ColumnScope,
    ) -> Result<CleaningOutcome, CleaningError> {
        let outcome = MissingValueResolver::resolve_numeric(&mut self.current, strategy, scope);
        self.after_cleaning(outcome)
    }

    pub fn clean_categorical(
        &mut self,
        strategy: CategoricalStrategy,
        scope: &ColumnScope,
    ) -> Result<CleaningOutcome, CleaningError> {
        let outcome = MissingValueResolver::resolve_categorical(&mut self.current, strategy, scope);
        self.after_cleaning(outcome)
    }

    pub fn clean_all(&mut self, strategy: BulkStrategy) -> Result<CleaningOutcome, CleaningError> {
        let outcome = MissingValueResolver::resolve_all(&mut self.current, strategy);
        self.after_cleaning(outcome)
    }

    fn after_cleaning(
        &mut self,
        outcome: Result<CleaningOutcome, CleaningError>,
    ) -> Result<CleaningOutcome, CleaningError> {
        match &outcome {
            Ok(CleaningOutcome::Applied(_)) => self.aggregation = None,
            Ok(_) => {}
            Err(e) => log::warn!("Cleaning failed: {}", e),
        }
        outcome
    }

    /// Aggregate the current table; a produced summary is kept for display.
    pub fn aggregate(
        &mut self,
        request: &AggregationRequest,
    ) -> Result<AggregationOutcome, AggregationError> {
        let outcome = Aggregator::aggregate(&self.current, request).inspect_err(|e| {
            log::warn!("Aggregation failed: {}", e);
        })?;
        self.aggregation = match &outcome {
            AggregationOutcome::Summary(df) => Some(df.clone()),
            AggregationOutcome::NothingToDo(_) => None,
        };
        Ok(outcome)
    }

    pub fn summary_statistics(&self) -> PolarsResult<Vec<ColumnSummary>> {
        StatsCalculator::describe(&self.current)
    }

    pub fn value_counts(&self) -> Vec<(String, Vec<ValueCount>)> {
        StatsCalculator::categorical_value_counts(&self.current)
    }

    pub fn histogram(&self, column: &str, bins: usize) -> PolarsResult<ChartData> {
        ChartData::histogram(&self.current, column, bins)
    }

    pub fn bar_chart(&self, column: &str, limit: usize) -> PolarsResult<ChartData> {
        ChartData::bar(&self.current, column, limit)
    }
}
