//! Error types for the shelter pipeline.
//!
//! Every fallible operation in the library returns [`PipelineError`]. Nothing
//! here is recovered locally; errors travel up to the binary unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required SQL file is not present in the SQL directory.
    #[error("Missing SQL file: {name}")]
    MissingSqlFile { name: String, path: PathBuf },

    /// Filesystem failures (reading SQL text, creating the artifacts directory)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The engine rejected a script or query, or the database could not be opened.
    #[error(transparent)]
    Database(#[from] duckdb::Error),

    /// Configuration sources could not be built or deserialized.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingSqlFile { .. } => "Missing Resource",
            Self::Io(_) => "Filesystem Error",
            Self::Database(_) => "Execution Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using PipelineError.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sql_file_names_the_file() {
        let err = PipelineError::MissingSqlFile {
            name: "brandon_shelter_clean.sql".to_string(),
            path: PathBuf::from("sql/duckdb/brandon_shelter_clean.sql"),
        };
        assert_eq!(err.to_string(), "Missing SQL file: brandon_shelter_clean.sql");
        assert_eq!(err.category(), "Missing Resource");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PipelineError::from(io);
        assert_eq!(err.to_string(), "denied");
        assert_eq!(err.category(), "Filesystem Error");
    }

    #[test]
    fn test_config_error_display() {
        let err = PipelineError::config("invalid type for key 'db_name'");
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid type for key 'db_name'"
        );
    }
}
