use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoexpError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Invalid value on line {line}, column {column}: {value:?}")]
    InvalidValue {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Type alias for Result with CoexpError
pub type Result<T> = std::result::Result<T, CoexpError>;

impl CoexpError {
    /// Create a new InvalidFileFormat error tagged with a 1-based line number
    pub fn invalid_line(line: usize, message: impl Into<String>) -> Self {
        CoexpError::InvalidFileFormat(format!("line {}: {}", line, message.into()))
    }

    /// Create a new InvalidValue error
    pub fn invalid_value(line: usize, column: usize, value: impl Into<String>) -> Self {
        CoexpError::InvalidValue {
            line,
            column,
            value: value.into(),
        }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        CoexpError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
