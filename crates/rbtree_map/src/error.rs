use thiserror::Error;

/// Result type alias for map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`RbTree`](crate::RbTree) and
/// [`RedBlackTree`](crate::RedBlackTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node could not be constructed.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Lookup of a key that is not in the map.
    #[error("key not found")]
    NotFound,
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}
