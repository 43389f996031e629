//! Error types for noderec.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoderecError {
    #[error("nothing matches {pattern}. Check the serial number.")]
    NotFound { pattern: String },

    #[error("file {0} does not exist or is empty")]
    InvalidFile(String),

    #[error("malformed content in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("navigation table {0} does not exist or is empty")]
    NavigationUnavailable(String),

    #[error("no navigation entry for node code {0}, even after raw file name fallback")]
    Unresolved(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NoderecError {
    /// Parse failure for `path` with a free-form reason.
    pub fn parse(path: &std::path::Path, message: impl Into<String>) -> Self {
        NoderecError::Parse {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}
