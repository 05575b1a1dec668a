//! Error types for the dtedb library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or opening a DTED database.
///
/// Query methods never return these: a point without data is `None`.
#[derive(Error, Debug)]
pub enum DtedError {
    /// IO error when reading files or directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The DTED cell file does not exist.
    #[error("DTED file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file is shorter than the DTED header records.
    #[error("File too small for a DTED cell: {path} ({size} bytes)")]
    FileTooSmall { path: PathBuf, size: usize },

    /// A DTED header record could not be decoded.
    #[error("Invalid DTED header in {path}: {reason}")]
    InvalidHeader { path: PathBuf, reason: String },

    /// The connection string does not name a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// No extension was configured and the directory scan found no readable cell.
    #[error("Could not detect a DTED file extension under {path}")]
    ExtensionNotDetected { path: PathBuf },

    /// The configuration has no connection string.
    #[error("No connection string configured")]
    MissingConnectionString,

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Result type alias using [`DtedError`].
pub type Result<T> = std::result::Result<T, DtedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DtedError::FileTooSmall {
            path: PathBuf::from("w122/n47.dt2"),
            size: 1000,
        };
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("n47.dt2"));

        let err = DtedError::NotADirectory {
            path: PathBuf::from("/data/dted"),
        };
        assert!(err.to_string().contains("/data/dted"));

        let err = DtedError::InvalidValue {
            key: "upcase".into(),
            value: "maybe".into(),
        };
        assert!(err.to_string().contains("upcase"));
        assert!(err.to_string().contains("maybe"));
    }
}
