//! Error types for songplay-etl
//!
//! This module defines the error hierarchy for the whole job.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every error is fatal: the job never retries and aborts on the first one.

use thiserror::Error;

/// The main error type for songplay-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Invalid location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error("Invalid glob regex: {0}")]
    GlobRegex(#[from] regex::Error),

    #[error("No input files match '{pattern}'")]
    NoInputFiles { pattern: String },

    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("Column '{column}' has type {actual}, expected {expected}")]
    ColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Frame error: {message}")]
    Frame { message: String },

    #[error("Query error: {0}")]
    Query(#[from] datafusion::error::DataFusionError),

    // ============================================================================
    // Storage / Output Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Invalid object path: {0}")]
    ObjectPath(#[from] object_store::path::Error),

    #[error("Output path already exists: {path}")]
    OutputExists { path: String },

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid location error
    pub fn location(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a column not found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a frame error
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Result type alias for songplay-etl
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("aws.access_key_id");
        assert_eq!(
            err.to_string(),
            "Missing required config field: aws.access_key_id"
        );

        let err = Error::NoInputFiles {
            pattern: "data/song_data/*.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No input files match 'data/song_data/*.json'"
        );

        let err = Error::column_not_found("userId");
        assert_eq!(err.to_string(), "Column 'userId' not found");
    }

    #[test]
    fn test_decode_error_names_path() {
        let err = Error::decode("log_data/2018-11-12-events.json", "line 3: expected value");
        assert!(err.to_string().contains("2018-11-12-events.json"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let wrapped = result.context("outer");
        assert!(wrapped
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let result: std::result::Result<(), std::io::Error> = Err(io);
        let err = result.context("reading config/etl.yaml");
        assert!(err
            .unwrap_err()
            .to_string()
            .starts_with("reading config/etl.yaml: IO error"));
    }
}
