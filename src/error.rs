//! Error types for Locke.
//!
//! This module defines all error types used throughout the crate,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for Locke operations.
#[derive(Debug, Error)]
pub enum LockeError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or decrypting a zip archive.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error accessing the substitution-table database.
    #[error("substitution-table database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The selected zip entry does not exist.
    #[error("entry {index} is out of bounds: archive has {count} entries")]
    ZipEntryOutOfRange { index: usize, count: usize },

    /// The archive contains no entries to read.
    #[error("archive \"{path}\" contains no entries")]
    EmptyArchive { path: PathBuf },

    /// The operator's entry selection could not be parsed.
    #[error("invalid entry selection: {input:?}")]
    InvalidEntrySelection { input: String },

    /// None of the requested transform family names matched.
    #[error("no transform families found for: {names:?}")]
    NoFamiliesMatched { names: Vec<String> },

    /// The operator declined to continue after unknown family names.
    #[error("selection aborted by the operator")]
    SelectionAborted,

    /// A level outside the valid 1-3 range was requested.
    #[error("there is no such level as {level}")]
    InvalidLevel { level: i8 },

    /// `--password` was given without marking the input as a zip.
    #[error("password field is set without zip enabled")]
    PasswordWithoutZip,

    /// The substitution-table database has not been generated yet.
    #[error("substitution-table database \"{path}\" not found; run `locke transforms --generate` first")]
    MissingCache { path: PathBuf },

    /// A stored translation table is not exactly 256 bytes.
    #[error("cache row {id} has an invalid table length {len}, expected 256")]
    CorruptCache { id: i64, len: usize },

    /// A built-in pattern failed validation at registry build.
    #[error("invalid pattern \"{description}\": {message}")]
    InvalidPattern {
        description: String,
        message: String,
    },

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for Locke operations.
pub type Result<T> = std::result::Result<T, LockeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LockeError::ZipEntryOutOfRange { index: 9, count: 3 };
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_missing_cache_names_path() {
        let err = LockeError::MissingCache {
            path: PathBuf::from("transforms.db"),
        };
        assert!(err.to_string().contains("transforms.db"));
        assert!(err.to_string().contains("--generate"));
    }

    #[test]
    fn test_invalid_level() {
        let err = LockeError::InvalidLevel { level: 7 };
        assert!(err.to_string().contains('7'));
    }
}
