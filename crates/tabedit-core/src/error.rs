//! Error types for tabedit-core

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a failure, used to report what stage of a run gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The script or the input table is malformed; nothing was mutated
    Parse,
    /// A selection could not be turned into coordinates mid-run
    Resolution,
    /// The table could not grow
    Allocation,
    /// Reading or writing a file failed
    Io,
}

/// Errors that can occur in tabedit-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV exporter
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A double quote in the input was never closed
    #[error("unbalanced quotes in '{0}'")]
    UnbalancedQuotes(PathBuf),

    /// Delimiter that cannot be written unambiguously
    #[error("invalid delimiter {0:?}: must be one ASCII character other than '\"', '\\' or a line break")]
    InvalidDelimiter(String),

    /// Script contained nothing to do
    #[error("no commands given")]
    EmptyScript,

    /// Fragment that is neither a selection nor a known command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Bracketed fragment that does not describe a selection
    #[error("invalid selection '{0}'")]
    InvalidSelection(String),

    /// Numeric argument that is not a positive integer
    #[error("invalid argument in '{fragment}': {reason}")]
    InvalidArgument { fragment: String, reason: String },

    /// Dynamic selection matched no cell
    #[error("no match for selection {0}")]
    NoMatch(String),

    /// `[_]` used before any `[set]`
    #[error("no selection has been stored with [set]")]
    NoStoredSelection,

    /// Command that reads one cell was given a wider selection
    #[error("'{command}' needs a single cell selection, got {selection}")]
    NotSingleCell { command: String, selection: String },

    /// Cell access outside the table
    #[error("cell [{row},{col}] is outside the table")]
    OutOfRange { row: usize, col: usize },

    /// The table could not grow
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyScript
            | Error::UnknownCommand(_)
            | Error::InvalidSelection(_)
            | Error::InvalidArgument { .. }
            | Error::UnbalancedQuotes(_)
            | Error::InvalidDelimiter(_) => ErrorKind::Parse,
            Error::NoMatch(_)
            | Error::NoStoredSelection
            | Error::NotSingleCell { .. }
            | Error::OutOfRange { .. } => ErrorKind::Resolution,
            Error::Allocation(_) => ErrorKind::Allocation,
            Error::FileRead { .. }
            | Error::FileWrite { .. }
            | Error::Csv(_)
            | Error::Io(_)
            | Error::Json(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_argument(fragment: &str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            fragment: fragment.to_string(),
            reason: reason.into(),
        }
    }
}
