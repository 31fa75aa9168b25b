//! Error types for webstatslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while gathering access-log statistics
#[derive(Error, Debug)]
pub enum WebstatsError {
    /// Failed to open or read a log file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A numeric field could not be parsed (strict mode only)
    #[error("{path}:{line}: invalid {field} field '{value}'")]
    Parse {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A file worker panicked before returning
    #[error("worker for '{0}' panicked")]
    WorkerPanicked(PathBuf),

    /// No log files were given
    #[error("no access log files given")]
    NoInputs,
}

impl WebstatsError {
    /// Path of the file this error concerns, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileRead { path, .. }
            | Self::Parse { path, .. }
            | Self::WorkerPanicked(path) => Some(path),
            _ => None,
        }
    }
}
