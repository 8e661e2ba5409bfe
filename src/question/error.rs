//! Error types for question file loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading question records.
#[derive(Debug, Error)]
pub enum InputError {
    /// The question file could not be read.
    #[error("cannot read question file '{path}': {source}")]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// A delimited line did not have the `text --- date --- code` shape.
    #[error(
        "malformed question on line {line}: {reason}\n  Suggestion: Use the form 'text --- YYYY-MM-DD --- code'"
    )]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// JSON input did not match the expected record array.
    #[error("invalid JSON question list: {0}\n  Suggestion: Provide an array of {{text, date, label}} objects")]
    Json(#[from] serde_json::Error),
}

impl InputError {
    /// Creates a `MalformedLine` error.
    #[must_use]
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            reason: reason.into(),
        }
    }
}
