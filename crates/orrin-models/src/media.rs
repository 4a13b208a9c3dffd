use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::MediaCategory;
use crate::error::ParseError;

/// A catalog record as held by lists.
///
/// Lists keep a value copy taken when the item was added, so later catalog
/// edits do not reach items already stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Free-form runtime such as "2h 10m" or "45m / ep"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Episode count for shows and anime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MediaItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            media_type,
            poster: None,
            year: None,
            genres: Vec::new(),
            runtime: None,
            episodes: None,
            description: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = Some(episodes);
        self
    }

    /// Category this item is filed under by default
    pub fn category(&self) -> MediaCategory {
        self.media_type.category()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Film,
    Show,
    Anime,
    Documentary,
}

impl MediaType {
    pub fn category(&self) -> MediaCategory {
        match self {
            MediaType::Film => MediaCategory::Films,
            MediaType::Show => MediaCategory::Shows,
            MediaType::Anime => MediaCategory::Anime,
            MediaType::Documentary => MediaCategory::Documentaries,
        }
    }

    /// Shows and anime are watched per episode
    pub fn is_episodic(&self) -> bool {
        matches!(self, MediaType::Show | MediaType::Anime)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Film => "film",
            MediaType::Show => "show",
            MediaType::Anime => "anime",
            MediaType::Documentary => "documentary",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MediaType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "film" | "movie" | "films" | "movies" => Ok(MediaType::Film),
            "show" | "series" | "shows" | "tv" => Ok(MediaType::Show),
            "anime" => Ok(MediaType::Anime),
            "documentary" | "documentaries" => Ok(MediaType::Documentary),
            _ => Err(ParseError::UnknownMediaType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_category() {
        assert_eq!(MediaType::Film.category(), MediaCategory::Films);
        assert_eq!(MediaType::Show.category(), MediaCategory::Shows);
        assert_eq!(MediaType::Anime.category(), MediaCategory::Anime);
        assert_eq!(MediaType::Documentary.category(), MediaCategory::Documentaries);
    }

    #[test]
    fn test_media_item_wire_format() {
        let item = MediaItem::new("m1", "Heat", MediaType::Film)
            .with_year(1995)
            .with_genres(["Crime", "Thriller"]);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "film");
        assert_eq!(json["year"], 1995);
        assert!(json.get("poster").is_none());

        let parsed: MediaItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_media_item_missing_optional_fields() {
        let parsed: MediaItem =
            serde_json::from_str(r#"{"id":"s1","title":"Dark","type":"show"}"#).unwrap();
        assert!(parsed.genres.is_empty());
        assert_eq!(parsed.episodes, None);
        assert!(parsed.media_type.is_episodic());
    }
}
