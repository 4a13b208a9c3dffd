use thiserror::Error;

/// Failure to parse a user-supplied category or status identifier
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown media category: {0:?} (expected films, shows, anime or documentaries)")]
    UnknownCategory(String),
    #[error("unknown watch status: {0:?} (expected Want to Watch, Currently Watching, Watched or Did Not Finish)")]
    UnknownStatus(String),
    #[error("unknown media type: {0:?}")]
    UnknownMediaType(String),
}
