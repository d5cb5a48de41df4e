//! CSV output encoding.

pub mod csv;

pub use csv::{csv_filename, encode_table, post_row, CSV_HEADER};

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Encoded bytes were not valid UTF-8
    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
