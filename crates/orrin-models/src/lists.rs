use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::media::MediaItem;
use crate::status::StatusLabel;

/// Ordered, id-unique item sequence shared by buckets and custom lists
fn insert_unique(items: &mut Vec<MediaItem>, item: MediaItem) -> bool {
    if items.iter().any(|existing| existing.id == item.id) {
        return false;
    }
    items.push(item);
    true
}

fn remove_by_id(items: &mut Vec<MediaItem>, id: &str) -> bool {
    let before = items.len();
    items.retain(|existing| existing.id != id);
    items.len() != before
}

/// One of the four watch-status buckets of a category.
///
/// `count` is always `items.len()`; it is written out for consumers of the
/// serialized form and ignored on the way back in.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatusBucket {
    label: StatusLabel,
    #[serde(default)]
    items: Vec<MediaItem>,
}

impl StatusBucket {
    pub fn new(label: StatusLabel) -> Self {
        Self { label, items: Vec::new() }
    }

    pub fn label(&self) -> StatusLabel {
        self.label
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Append the item unless an item with the same id is present
    pub fn insert(&mut self, item: MediaItem) -> bool {
        insert_unique(&mut self.items, item)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.items, id)
    }
}

impl Serialize for StatusBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("StatusBucket", 3)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

/// A user-named list. Items here are not exclusive with any other list or bucket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CustomList {
    name: String,
    #[serde(default)]
    items: Vec<MediaItem>,
}

impl CustomList {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), items: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn insert(&mut self, item: MediaItem) -> bool {
        insert_unique(&mut self.items, item)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.items, id)
    }
}

impl Serialize for CustomList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CustomList", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;

    fn film(id: &str) -> MediaItem {
        MediaItem::new(id, format!("Film {}", id), MediaType::Film)
    }

    #[test]
    fn test_bucket_insert_is_unique_by_id() {
        let mut bucket = StatusBucket::new(StatusLabel::Watched);
        assert!(bucket.insert(film("m1")));
        assert!(!bucket.insert(film("m1")));
        assert_eq!(bucket.count(), 1);
    }

    #[test]
    fn test_bucket_remove_absent_is_noop() {
        let mut bucket = StatusBucket::new(StatusLabel::Watched);
        bucket.insert(film("m1"));
        assert!(!bucket.remove("m2"));
        assert_eq!(bucket.count(), 1);
        assert!(bucket.remove("m1"));
        assert_eq!(bucket.count(), 0);
    }

    #[test]
    fn test_count_is_serialized_but_not_trusted() {
        let mut list = CustomList::new("Favourites");
        list.insert(film("m1"));
        list.insert(film("m2"));

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["count"], 2);

        let tampered = serde_json::json!({
            "name": "Favourites",
            "count": 99,
            "items": json["items"].clone(),
        });
        let parsed: CustomList = serde_json::from_value(tampered).unwrap();
        assert_eq!(parsed.count(), 2);
    }

    #[test]
    fn test_rename_preserves_items() {
        let mut list = CustomList::new("Old");
        list.insert(film("m1"));
        list.rename("New");
        assert_eq!(list.name(), "New");
        assert!(list.contains("m1"));
    }
}
