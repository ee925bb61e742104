//! Smart-Sales Core
//!
//! Shared types for the smart-sales batch pipeline: the tabular
//! `DataTable`/`Value` model, the error taxonomy, pipeline configuration,
//! and the SQLite warehouse schema.

use std::path::PathBuf;

pub mod config;
pub mod schema;
pub mod table;

pub use config::PipelineConfig;
pub use table::{DataTable, Value};

/// Errors that can occur across the pipeline stages.
///
/// Malformed cell values (unparseable dates, numbers) are deliberately NOT
/// represented here: they are recovered locally during cleaning by coercing
/// the value to [`Value::Null`], so a single bad record never aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("required input not found: {0}")]
    SourceMissing(PathBuf),

    #[error("schema violation in table '{table}': {detail}")]
    SchemaViolation { table: String, detail: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, SalesError>;
