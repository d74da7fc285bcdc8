//! Error types for castools.

use thiserror::Error;

/// Result type alias for castools operations
pub type Result<T> = std::result::Result<T, CasError>;

/// Error type for castools operations
#[derive(Error, Debug)]
pub enum CasError {
    /// A CAS table line could not be turned into a record
    #[error("Malformed CAS record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number, 0 when the line was parsed on its own
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// An external job could not be started
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        /// The command line that was being launched
        command: String,
        /// The underlying spawn error
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CasError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CasError::MalformedRecord {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a line number to a malformed record error.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            CasError::MalformedRecord { reason, .. } => CasError::MalformedRecord { line, reason },
            other => other,
        }
    }
}
