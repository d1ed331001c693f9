//! Error types for reviewscope
//!
//! Load-time failures (missing file, bad rows, nothing to chart) are the only
//! recoverable errors. Interaction errors only surface when an external caller
//! (the HTTP API) names an element that does not exist.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single row that failed to convert into a review
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RowError {
    /// 1-based line number in the source text (the header is line 1)
    pub line: usize,
    pub column: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: column `{}` value {:?}: {}",
            self.line, self.column, self.value, self.reason
        )
    }
}

/// Main error type for reviewscope
#[derive(Error, Debug)]
pub enum Error {
    /// Data file missing or unreadable
    #[error("Failed to read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input holds no records at all
    #[error("Input is empty: no header row")]
    NoHeader,

    /// Header row lacks a required column
    #[error("Missing column `{0}` in header")]
    MissingColumn(&'static str),

    /// A field failed to convert or repeated an id (strict mode only)
    #[error("Parse error at {0}")]
    Parse(RowError),

    /// Nothing survived filtering
    #[error("No artist has at least {min_albums} reviews; nothing to chart")]
    EmptyResult { min_albums: usize },

    #[error("Unknown artist index {0}")]
    UnknownArtist(usize),

    #[error("Unknown review id {0}")]
    UnknownReview(i64),

    /// Event not valid in the current view
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;
