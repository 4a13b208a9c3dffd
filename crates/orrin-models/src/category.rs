use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Top-level partition key for status buckets and custom lists.
///
/// The set is fixed: every store holds exactly these four categories for its
/// whole lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Films,
    Shows,
    Anime,
    Documentaries,
}

impl MediaCategory {
    /// All categories in tab order
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::Films,
        MediaCategory::Shows,
        MediaCategory::Anime,
        MediaCategory::Documentaries,
    ];

    /// Stable lowercase key used in paths, resource ids and config
    pub fn key(&self) -> &'static str {
        match self {
            MediaCategory::Films => "films",
            MediaCategory::Shows => "shows",
            MediaCategory::Anime => "anime",
            MediaCategory::Documentaries => "documentaries",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaCategory::Films => "Films",
            MediaCategory::Shows => "Shows",
            MediaCategory::Anime => "Anime",
            MediaCategory::Documentaries => "Documentaries",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MediaCategory {
    type Err = ParseError;

    /// Accepts the plural key, the display label, or the singular media type name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "films" | "film" | "movies" | "movie" => Ok(MediaCategory::Films),
            "shows" | "show" | "series" | "tv" => Ok(MediaCategory::Shows),
            "anime" => Ok(MediaCategory::Anime),
            "documentaries" | "documentary" => Ok(MediaCategory::Documentaries),
            _ => Err(ParseError::UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_aliases() {
        assert_eq!("films".parse::<MediaCategory>().unwrap(), MediaCategory::Films);
        assert_eq!("Movie".parse::<MediaCategory>().unwrap(), MediaCategory::Films);
        assert_eq!(" Series ".parse::<MediaCategory>().unwrap(), MediaCategory::Shows);
        assert_eq!("Documentaries".parse::<MediaCategory>().unwrap(), MediaCategory::Documentaries);
        assert_eq!("anime".parse::<MediaCategory>().unwrap(), MediaCategory::Anime);
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "music".parse::<MediaCategory>().unwrap_err();
        assert_eq!(err, ParseError::UnknownCategory("music".to_string()));
    }

    #[test]
    fn test_key_round_trips_through_parse() {
        for category in MediaCategory::ALL {
            assert_eq!(category.key().parse::<MediaCategory>().unwrap(), category);
            assert_eq!(category.label().parse::<MediaCategory>().unwrap(), category);
        }
    }
}
