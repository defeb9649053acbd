//! Error types for Wikipath operations.
//!
//! ## Error Philosophy
//!
//! Wikipath follows a "best effort" approach toward the upstream API:
//! - A failed or truncated link fetch degrades the search, it doesn't abort it
//! - Network errors are logged and recovered locally with partial results
//! - Only storage failures cause early termination, because skipping a write
//!   would break the "expanded flag means the link list is complete" invariant
//!
//! "No path found" and "frontier exhausted" are normal outcomes, reported
//! through [`crate::SearchOutcome`], never through `Error`.

use thiserror::Error;

/// Result type for Wikipath operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Wikipath operations.
///
/// These errors represent infrastructure failures that prevent
/// the operation from completing.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violated (mutex poisoning, missing rows)
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = Error::Config("unknown strategy: dfs".to_string());
        assert_eq!(err.to_string(), "configuration error: unknown strategy: dfs");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
