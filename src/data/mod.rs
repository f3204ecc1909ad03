//! Data module - loading, cleaning and aggregation

mod aggregator;
mod cleaner;
mod loader;
mod schema;

pub use aggregator::{AggFunction, AggregationError, AggregationOutcome, AggregationRequest, Aggregator};
pub use cleaner::{
    BulkStrategy, CategoricalStrategy, CleaningError, CleaningOutcome, ColumnScope,
    MissingValueResolver, NumericStrategy,
};
pub use loader::{DataLoader, LoaderError};
pub use schema::{
    column_names, column_text, columns_of_kind, columns_with_missing, numeric_values, ColumnKind,
};
