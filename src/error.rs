//! Error handling for the gnuplot pipe driver
//!
//! This module defines the crate-wide error type and a Result alias used
//! throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gnuplot driver operations
#[derive(Error, Debug)]
pub enum GnuplotError {
    /// The gnuplot executable could not be located or spawned
    #[error("launch error: {0}")]
    Launch(String),

    /// Input data rejected before any side effect occurred
    #[error("validation error: {0}")]
    Validation(String),

    /// The per-session temporary file ceiling was reached
    #[error("maximum number of temporary files reached ({limit}): cannot open more files")]
    ResourceExhausted {
        /// Platform ceiling that was hit
        limit: usize,
    },

    /// Errors related to configuration loading/saving
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors (pipe write/flush, temp file create/write)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Temporary file deletion failure
    #[error("cannot remove temporary file {path:?} ({failed} of {attempted} deletions failed)")]
    Cleanup {
        /// First path that could not be deleted
        path: PathBuf,
        /// Number of deletions that failed
        failed: usize,
        /// Number of deletions attempted
        attempted: usize,
    },

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GnuplotError>,
    },
}

impl GnuplotError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GnuplotError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for gnuplot driver operations
pub type Result<T> = std::result::Result<T, GnuplotError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
