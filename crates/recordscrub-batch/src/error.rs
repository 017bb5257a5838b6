//! Error types for batch processing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid row at line {line}: {message}")]
    Row { line: usize, message: String },

    #[error("Redactor error: {0}")]
    Pii(#[from] recordscrub_pii::Error),
}

impl BatchError {
    /// Whether reading can continue past this error with the next row
    pub fn is_row_level(&self) -> bool {
        match self {
            BatchError::Row { .. } => true,
            BatchError::Csv(e) => !e.is_io_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
