//! Loader error types.

use thiserror::Error;

/// Error raised while resolving a loader.
///
/// Failed fetches are not errors here; they are reported through the
/// aggregate's `is_error` and `error` fields. This type covers inputs that
/// break the query provider's contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The aggregate is successful but one of its inputs holds no data.
    #[error("query {position} of {len} reported success without data")]
    MissingData { position: usize, len: usize },
}

impl LoaderError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingData { position, len } => format!(
                "Query #{} (of {}) finished without returning data, so the loader has nothing to show.",
                position + 1,
                len
            ),
        }
    }
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_is_one_based() {
        let error = LoaderError::MissingData {
            position: 0,
            len: 2,
        };
        assert_eq!(error.to_string(), "query 0 of 2 reported success without data");
        assert!(error.user_message().starts_with("Query #1 (of 2)"));
    }
}
