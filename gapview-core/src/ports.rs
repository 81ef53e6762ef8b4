//! Trait describing dataset backends and the shared error type.

use calamine::XlsxError;
use csv::Error as CsvError;

use crate::model::Table;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while loading a dataset from a source.
pub enum SourceError {
    /// File extension matches neither supported format.
    #[error("Unsupported format: {0} (expected .csv or .xlsx)")]
    UnsupportedFormat(String),
    /// A required column is absent from the source.
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    /// A row carries an absent or unparseable value.
    #[error("Row {row}: {message}")]
    MalformedRow {
        /// 1-based data-row number within the source.
        row: usize,
        /// What went wrong with the row.
        message: String,
    },
    /// Reading the source file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The delimited-text parser rejected the source.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
    /// The spreadsheet container could not be read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// Trait for backends that produce a normalized table.
///
/// Loading is a pure parse: sources hold no state beyond what identifies
/// them, and the same source loads the same table every time.
pub trait DatasetSource: Send + Sync {
    /// Human-readable label for where the data comes from.
    fn describe(&self) -> &str;

    /// Parse the source into a table with the canonical schema.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source cannot be read, its format
    /// is unsupported, a required column is missing, or a row is malformed.
    fn load(&self) -> Result<Table, SourceError>;
}
