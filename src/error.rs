//! Error types for the cache engine
//!
//! Only construction can fail; every operation on a built cache resolves to a
//! well-defined "not found" or zero result instead.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A constructor argument is outside its allowed range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = CacheError::invalid("capacity must be positive");
        assert_eq!(err.to_string(), "Invalid argument: capacity must be positive");
    }
}
