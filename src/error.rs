//! Error type shared by problem construction, configuration and I/O.

use std::path::PathBuf;

/// Errors raised by `u-moea`.
///
/// Constraint violation is never reported through this type: an infeasible
/// solution is an ordinary evaluation outcome carried in its constraint values.
#[derive(Debug, thiserror::Error)]
pub enum MoeaError {
    /// File-backed instance construction was requested without a filename.
    #[error("instance filename must be provided when loading from file")]
    MissingInstance,

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A text file could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Instance data is inconsistent (e.g. weights and profits differ in length).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Algorithm configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operator parameters are out of range.
    #[error("invalid operator: {0}")]
    InvalidOperator(String),
}

impl MoeaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MoeaError::Io {
            path: path.into(),
            source,
        }
    }
}
