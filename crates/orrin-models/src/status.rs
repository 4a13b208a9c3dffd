use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The four mutually exclusive watch statuses a category is partitioned into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusLabel {
    /// Planned, not started
    WantToWatch,
    /// Started, not finished
    CurrentlyWatching,
    /// Finished
    Watched,
    /// Started and abandoned
    DidNotFinish,
}

impl StatusLabel {
    /// All statuses in display order
    pub const ALL: [StatusLabel; 4] = [
        StatusLabel::WantToWatch,
        StatusLabel::CurrentlyWatching,
        StatusLabel::Watched,
        StatusLabel::DidNotFinish,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatusLabel::WantToWatch => "Want to Watch",
            StatusLabel::CurrentlyWatching => "Currently Watching",
            StatusLabel::Watched => "Watched",
            StatusLabel::DidNotFinish => "Did Not Finish",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StatusLabel {
    type Err = ParseError;

    /// Accepts the display label ("Want to Watch"), the variant name
    /// ("WantToWatch") and kebab/snake forms ("want-to-watch"), ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match compact.as_str() {
            "wanttowatch" | "watchlist" => Ok(StatusLabel::WantToWatch),
            "currentlywatching" | "watching" => Ok(StatusLabel::CurrentlyWatching),
            "watched" | "completed" => Ok(StatusLabel::Watched),
            "didnotfinish" | "dnf" | "dropped" => Ok(StatusLabel::DidNotFinish),
            _ => Err(ParseError::UnknownStatus(s.to_string())),
        }
    }
}
