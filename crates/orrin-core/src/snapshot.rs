use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use orrin_models::MediaCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::store::{CategoryLists, ListNamePolicy, ListStore};

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of a [`ListStore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: BTreeMap<MediaCategory, CategoryLists>,
}

impl StoreSnapshot {
    pub fn capture(store: &ListStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            categories: store
                .categories()
                .map(|(category, lists)| (category, lists.clone()))
                .collect(),
        }
    }

    /// Rebuild a store by replaying the snapshot through the store operations.
    ///
    /// Invariants are re-established for hand-edited files: an id listed in
    /// several buckets ends up in the last one, repeated ids collapse, and
    /// lists past the cap (or rejected by `policy`) are dropped.
    pub fn restore(self, policy: ListNamePolicy) -> ListStore {
        let mut store = ListStore::new().with_name_policy(policy);

        for (category, lists) in self.categories {
            for bucket in lists.statuses() {
                for item in bucket.items() {
                    if let Err(e) = store.move_to_status(category, bucket.label(), item.clone()) {
                        warn!("Dropping snapshot item {} in {} {}: {}", item.id, category, bucket.label(), e);
                    }
                }
            }

            for list in lists.custom_lists() {
                if let Err(e) = store.create_custom_list(category, list.name()) {
                    warn!("Dropping snapshot list {:?} in {}: {}", list.name(), category, e);
                    continue;
                }
                store.restore_custom_list_items(category, list.items());
            }
        }

        store
    }
}

/// Reads and writes the store snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    path: PathBuf,
}

impl SnapshotManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the saved store.
    ///
    /// A missing file yields `None`. A file that does not parse is moved aside
    /// to `<name>.corrupt-<timestamp>` and also yields `None`, so the next save
    /// cannot overwrite it. Read failures are errors.
    pub fn load(&self, policy: ListNamePolicy) -> Result<Option<ListStore>> {
        if !self.path.exists() {
            debug!("Snapshot miss: {} does not exist", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| anyhow!("Failed to read snapshot file {}: {}", self.path.display(), e))?;

        let snapshot = match serde_json::from_str::<StoreSnapshot>(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let quarantine = self.quarantine_path();
                std::fs::rename(&self.path, &quarantine).map_err(|rename_err| {
                    anyhow!(
                        "Snapshot {} is corrupt ({}) and could not be moved aside: {}",
                        self.path.display(),
                        e,
                        rename_err
                    )
                })?;
                warn!(
                    "Snapshot corruption detected in {}: {}. Moved it to {}.",
                    self.path.display(),
                    e,
                    quarantine.display()
                );
                return Ok(None);
            }
        };

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(anyhow!(
                "Snapshot {} has version {}, newer than supported version {}",
                self.path.display(),
                snapshot.version,
                SNAPSHOT_VERSION
            ));
        }
        info!("Loaded list snapshot saved at {}", snapshot.saved_at);
        Ok(Some(snapshot.restore(policy)))
    }

    /// Sibling path a corrupt snapshot is moved to
    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
        PathBuf::from(name)
    }

    /// Load the saved store or start empty
    pub fn load_or_new(&self, policy: ListNamePolicy) -> Result<ListStore> {
        Ok(self
            .load(policy)?
            .unwrap_or_else(|| ListStore::new().with_name_policy(policy)))
    }

    pub fn save(&self, store: &ListStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = StoreSnapshot::capture(store);
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| anyhow!("Failed to serialize snapshot: {}", e))?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| anyhow!("Failed to write snapshot {}: {}", tmp.display(), e))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| anyhow!("Failed to replace snapshot {}: {}", self.path.display(), e))?;

        debug!("Snapshot saved: {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Cleared list snapshot: {}", self.path.display());
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrin_models::{MediaItem, MediaType, StatusLabel};
    use serde_json::json;

    fn film(id: &str) -> MediaItem {
        MediaItem::new(id, format!("Film {}", id), MediaType::Film)
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("data").join("lists.json"));

        let mut store = ListStore::new();
        store.move_to_status(MediaCategory::Films, StatusLabel::Watched, film("m1")).unwrap();
        store.create_custom_list(MediaCategory::Films, "Noir").unwrap();
        store.add_to_custom_list(MediaCategory::Films, "Noir", film("m2")).unwrap();
        // A second list with the same name keeps its own (empty) membership
        store.create_custom_list(MediaCategory::Films, "Noir").unwrap();
        manager.save(&store).unwrap();

        let loaded = manager.load(ListNamePolicy::AllowDuplicates).unwrap().unwrap();
        assert_eq!(loaded, store);
        let lists = loaded.custom_lists(MediaCategory::Films);
        assert_eq!(lists[0].count(), 1);
        assert_eq!(lists[1].count(), 0);
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("lists.json"));
        assert!(manager.load(ListNamePolicy::AllowDuplicates).unwrap().is_none());
        assert_eq!(manager.load_or_new(ListNamePolicy::Unique).unwrap().name_policy(), ListNamePolicy::Unique);
        assert!(!manager.clear().unwrap());
    }

    fn corrupt_copies(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().contains("lists.json.corrupt-"))
            .collect()
    }

    #[test]
    fn test_corrupt_snapshot_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        // One unknown bucket label makes the whole document unreadable
        let content = json!({
            "version": 1,
            "savedAt": "2026-01-01T00:00:00Z",
            "categories": {
                "films": {
                    "statuses": [
                        {"label": "Watched", "items": [{"id": "m1", "title": "Heat", "type": "film"}]},
                        {"label": "Rewatching", "items": []}
                    ],
                    "custom_lists": [{"name": "Noir", "items": []}]
                }
            }
        })
        .to_string();
        std::fs::write(&path, &content).unwrap();

        let manager = SnapshotManager::new(&path);
        assert!(manager.load(ListNamePolicy::AllowDuplicates).unwrap().is_none());
        assert!(!path.exists());

        let copies = corrupt_copies(dir.path());
        assert_eq!(copies.len(), 1);
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), content);

        // Saving afterwards leaves the moved copy alone
        manager.save(&ListStore::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), content);
    }

    #[test]
    fn test_unreadable_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let manager = SnapshotManager::new(&path);
        assert!(manager.load(ListNamePolicy::AllowDuplicates).is_err());
        assert!(manager.load_or_new(ListNamePolicy::AllowDuplicates).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xfe, 0x00, 0x7b]);
        assert!(corrupt_copies(dir.path()).is_empty());
    }

    #[test]
    fn test_restore_repairs_broken_invariants() {
        let item = json!({"id": "m1", "title": "Heat", "type": "film"});
        let lists: Vec<_> = (1..=14)
            .map(|n| json!({"name": format!("L{}", n), "count": 0, "items": []}))
            .collect();
        let raw = json!({
            "version": 1,
            "savedAt": "2026-01-01T00:00:00Z",
            "categories": {
                "films": {
                    "statuses": [
                        {"label": "WantToWatch", "count": 5, "items": [item.clone(), item.clone()]},
                        {"label": "Watched", "items": [item.clone()]}
                    ],
                    "custom_lists": lists
                }
            }
        });

        let snapshot: StoreSnapshot = serde_json::from_value(raw).unwrap();
        let store = snapshot.restore(ListNamePolicy::AllowDuplicates);

        assert_eq!(store.status_of(MediaCategory::Films, "m1"), Some(StatusLabel::Watched));
        assert_eq!(store.bucket(MediaCategory::Films, StatusLabel::WantToWatch).unwrap().count(), 0);
        assert_eq!(store.custom_lists(MediaCategory::Films).len(), 12);
        // Categories absent from the file still get their buckets
        assert_eq!(store.status_buckets(MediaCategory::Anime).len(), 4);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists.json");
        std::fs::write(&path, r#"{"version": 99, "savedAt": "2026-01-01T00:00:00Z", "categories": {}}"#).unwrap();

        let manager = SnapshotManager::new(&path);
        assert!(manager.load(ListNamePolicy::AllowDuplicates).is_err());
        assert!(path.exists());
    }
}
