use thiserror::Error;

/// Failure modes shared by every container in this crate.
///
/// All errors are reported to the caller; nothing is retried internally.
/// Queries that are legitimately empty (e.g. `find_nearest` on an empty
/// index) return an empty sequence rather than an error — see the
/// individual operations for which accessors require a non-empty container.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An operand's dimension differs from the container's dimension.
    #[error("dimension mismatch: container has {expected} dimensions, operand has {actual}")]
    DimensionMismatch {
        /// dimension of the container
        expected: usize,
        /// dimension of the offending operand
        actual: usize,
    },

    /// `lookup` of a point that is not present in the container.
    #[error("point not found")]
    NotFound,

    /// a reference-point or extremum accessor was called on an empty container.
    #[error("operation requires a non-empty container")]
    EmptyContainer,

    /// an unrecognized direction string was supplied.
    #[error("unrecognized direction {0:?}, expected one of min/minimization/max/maximization")]
    BadDirection(String),

    /// an archive was constructed (or resized) with a non-positive capacity.
    #[error("invalid capacity {0}, must be strictly positive")]
    InvalidCapacity(i64),

    /// a malformed argument was supplied (e.g. k < 1 for `find_nearest`).
    #[error("invalid argument: {0}")]
    BadArgument(String),
}

/// crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
