use thiserror::Error;

/// Canonical result for the composition core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural problem detected while building a pipeline. Never recovered.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An operator's validation hook rejected its inputs.
    #[error("validation failed in {operator}: {message}")]
    Validation { operator: String, message: String },

    #[error("{operator}: index {index} out of range for {len} input(s)")]
    IndexOutOfRange {
        operator: String,
        index: usize,
        len: usize,
    },

    /// A child produced a different number of outputs than the composite needs.
    #[error("{operator}: expected {expected} output(s) from child, got {got}")]
    Arity {
        operator: String,
        expected: usize,
        got: usize,
    },

    /// A job dispatched to the worker pool panicked or lost its channel.
    #[error("worker call failed: {0}")]
    Worker(String),

    /// Failure raised by a leaf operator's processing function.
    #[error("operator {operator} failed: {message}")]
    Exec { operator: String, message: String },

    #[error("hashing error: {0}")]
    Hash(String),
}

impl Error {
    pub fn validation(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            operator: operator.into(),
            message: message.into(),
        }
    }

    pub fn exec(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Exec {
            operator: operator.into(),
            message: message.into(),
        }
    }

    pub fn index_out_of_range(operator: impl Into<String>, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            operator: operator.into(),
            index,
            len,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
