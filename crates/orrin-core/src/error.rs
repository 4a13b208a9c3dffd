use orrin_models::{MediaCategory, ParseError};
use thiserror::Error;

/// Errors returned by [`crate::ListStore`] operations.
///
/// None of these are I/O failures: every store operation is an in-memory
/// state transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{category} already holds the maximum of {limit} custom lists")]
    CapacityExceeded { category: MediaCategory, limit: usize },

    /// Only raised under [`crate::ListNamePolicy::Unique`]
    #[error("a custom list named {name:?} already exists in {category}")]
    DuplicateName { category: MediaCategory, name: String },
}

impl From<ParseError> for ListError {
    fn from(err: ParseError) -> Self {
        ListError::InvalidArgument(err.to_string())
    }
}
