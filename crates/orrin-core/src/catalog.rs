use anyhow::{Context, Result};
use orrin_models::{MediaCategory, MediaItem, MediaType};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Read-only source of media records
pub trait MediaCatalog {
    fn list_all(&self) -> &[MediaItem];

    fn find(&self, id: &str) -> Option<&MediaItem> {
        self.list_all().iter().find(|item| item.id == id)
    }

    /// Items whose type belongs to `category`
    fn in_category(&self, category: MediaCategory) -> Vec<&MediaItem> {
        self.list_all()
            .iter()
            .filter(|item| item.category() == category)
            .collect()
    }

    /// Sorted distinct genres among the items of `category`
    fn genres_for(&self, category: MediaCategory) -> Vec<String> {
        let mut genres: Vec<String> = self
            .in_category(category)
            .into_iter()
            .flat_map(|item| item.genres.iter().cloned())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }
}

/// Catalog record as found in seed data: ids may be numbers, the type has
/// several spellings and genres come from up to three fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMediaRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub genres: Option<Vec<Value>>,
    /// Comma separated genre string
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Value>>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawMediaRecord {
    /// Normalize into a [`MediaItem`]; `None` when id, title or type is unusable
    pub fn normalize(self) -> Option<MediaItem> {
        let id = self.id.as_ref().and_then(value_to_string)?;
        let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
        let media_type: MediaType = self.media_type.as_deref()?.parse().ok()?;

        let year = self.year.as_ref().and_then(|value| match value {
            Value::Number(n) => n.as_u64().and_then(|y| u32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

        let mut genres: Vec<String> = Vec::new();
        let array_genres = self
            .genres
            .iter()
            .chain(self.tags.iter())
            .flatten()
            .filter_map(value_to_string);
        let string_genres = self
            .genre
            .iter()
            .flat_map(|g| g.split(','))
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        for genre in array_genres.chain(string_genres) {
            if !genres.iter().any(|existing| existing.eq_ignore_ascii_case(&genre)) {
                genres.push(genre);
            }
        }

        Some(MediaItem {
            id,
            title,
            media_type,
            poster: self.poster.filter(|p| !p.trim().is_empty()),
            year,
            genres,
            runtime: self.runtime.filter(|r| !r.trim().is_empty()),
            episodes: self.episodes,
            description: self.description,
        })
    }
}

/// Catalog held fully in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<MediaItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    /// Normalize raw records, skipping unusable ones and repeated ids
    pub fn from_records(records: Vec<RawMediaRecord>) -> Self {
        let total = records.len();
        let mut items: Vec<MediaItem> = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            match record.normalize() {
                Some(item) if items.iter().any(|existing| existing.id == item.id) => {
                    warn!("Skipping catalog record {}: duplicate id {}", index, item.id);
                }
                Some(item) => items.push(item),
                None => warn!("Skipping catalog record {}: missing id, title or known type", index),
            }
        }

        if items.len() != total {
            info!("Catalog normalized {} of {} records", items.len(), total);
        }
        Self { items }
    }

    /// Load a JSON array of records. A missing file yields an empty catalog.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Catalog file {} does not exist, using an empty catalog", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let records: Vec<RawMediaRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Catalog file {} is not a JSON array of media records", path.display()))?;

        let catalog = Self::from_records(records);
        info!("Loaded {} catalog items from {}", catalog.items.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl MediaCatalog for StaticCatalog {
    fn list_all(&self) -> &[MediaItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<RawMediaRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_type_spellings_and_ids() {
        let catalog = StaticCatalog::from_records(records(json!([
            {"id": 7, "title": "Heat", "type": "movie", "year": "1995"},
            {"id": "s1", "title": "Dark", "type": "Series"},
            {"id": "d1", "title": "Planet Earth", "type": "documentaries"}
        ])));

        assert_eq!(catalog.len(), 3);
        let heat = catalog.find("7").unwrap();
        assert_eq!(heat.media_type, MediaType::Film);
        assert_eq!(heat.year, Some(1995));
        assert_eq!(catalog.find("s1").unwrap().media_type, MediaType::Show);
        assert_eq!(catalog.find("d1").unwrap().category(), MediaCategory::Documentaries);
    }

    #[test]
    fn test_genres_merged_from_all_fields() {
        let catalog = StaticCatalog::from_records(records(json!([
            {
                "id": "a1",
                "title": "Mushishi",
                "type": "anime",
                "genres": ["Mystery", "Slice of Life"],
                "genre": "Supernatural, mystery ,",
                "tags": ["Iyashikei"]
            }
        ])));

        let item = catalog.find("a1").unwrap();
        assert_eq!(item.genres, vec!["Mystery", "Slice of Life", "Iyashikei", "Supernatural"]);
    }

    #[test]
    fn test_unusable_records_are_skipped() {
        let catalog = StaticCatalog::from_records(records(json!([
            {"title": "No id", "type": "film"},
            {"id": "m1", "type": "film"},
            {"id": "m2", "title": "Podcast", "type": "podcast"},
            {"id": "m3", "title": "Kept", "type": "film"},
            {"id": "m3", "title": "Duplicate", "type": "film"}
        ])));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("m3").unwrap().title, "Kept");
    }

    #[test]
    fn test_genres_for_category() {
        let catalog = StaticCatalog::from_records(records(json!([
            {"id": "m1", "title": "A", "type": "film", "genres": ["Drama", "Crime"]},
            {"id": "m2", "title": "B", "type": "film", "genres": ["Crime"]},
            {"id": "s1", "title": "C", "type": "show", "genres": ["Comedy"]}
        ])));

        assert_eq!(catalog.genres_for(MediaCategory::Films), vec!["Crime", "Drama"]);
        assert_eq!(catalog.genres_for(MediaCategory::Shows), vec!["Comedy"]);
        assert!(catalog.genres_for(MediaCategory::Anime).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": 1, "title": "Alien", "type": "film"}]"#).unwrap();

        let catalog = StaticCatalog::load_from_file(&path).unwrap();
        assert_eq!(catalog.list_all().len(), 1);

        let missing = StaticCatalog::load_from_file(&dir.path().join("nope.json")).unwrap();
        assert!(missing.is_empty());

        std::fs::write(&path, "{not json").unwrap();
        assert!(StaticCatalog::load_from_file(&path).is_err());
    }
}
