//! Error types for the redaction engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid masking pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid redactor configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
