//! Error types shared across the crate.

use thiserror::Error;

/// Error variants reported by the bit sequence, index, and sparse array
/// operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was outside the bounds of the structure it was applied to.
    #[error("index {index} is out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// The length it was checked against.
        len: usize,
    },

    /// An argument violated an operation's preconditions.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisted bytes did not match the expected layout.
    #[error("malformed data: {0}")]
    Format(String),

    /// An I/O error occurred during save or load.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal invariant was violated. Reaching this is a bug.
    #[error("internal invariant violated: {0}")]
    Internal(String),

    /// A persisted container length cannot be applied to a fixed-capacity
    /// destination.
    #[error("cannot resize container: persisted length {expected}, capacity {actual}")]
    ResizeRequired {
        /// The length recorded in the persisted bytes.
        expected: usize,
        /// The capacity of the destination.
        actual: usize,
    },
}

impl Error {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// A specialized [`Result`](std::result::Result) type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
