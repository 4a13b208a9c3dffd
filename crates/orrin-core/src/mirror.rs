use chrono::Utc;
use orrin_models::MediaCategory;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::resource::{ResourceError, ResourceService};
use crate::stats::WatchStats;
use crate::store::ListStore;

const LISTS_RESOURCE: &str = "lists";
const STATS_RESOURCE: &str = "profileStats";

/// Pushes local list state to a [`ResourceService`].
///
/// Local state is authoritative: the caller mutates and saves the store
/// first, then publishes. A failed publish leaves the store as it is.
pub struct ListMirror<S: ResourceService> {
    service: S,
    user_id: String,
}

impl<S: ResourceService> ListMirror<S> {
    pub fn new(service: S, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: user_id.into(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Record id of a category document, e.g. `"1-films"`
    pub fn document_id(&self, category: MediaCategory) -> String {
        format!("{}-{}", self.user_id, category.key())
    }

    fn category_document(&self, store: &ListStore, category: MediaCategory) -> Value {
        json!({
            "id": self.document_id(category),
            "userId": self.user_id,
            "category": category,
            "statuses": store.status_buckets(category),
            "customLists": store.custom_lists(category),
            "updatedAt": Utc::now().to_rfc3339(),
        })
    }

    /// PATCH the record, creating it when the backend does not have it yet
    async fn upsert(&self, resource: &str, id: &str, patch: Value, create: Value) -> Result<Value, ResourceError> {
        match self.service.update(resource, id, patch).await {
            Err(ResourceError::NotFound { .. }) => {
                debug!("{}/{} missing, creating it", resource, id);
                self.service.create(resource, create).await
            }
            other => other,
        }
    }

    /// Write one category's buckets and custom lists as a single document
    pub async fn publish_category(&self, store: &ListStore, category: MediaCategory) -> Result<(), ResourceError> {
        let id = self.document_id(category);
        let document = self.category_document(store, category);
        self.upsert(LISTS_RESOURCE, &id, document.clone(), document).await?;
        info!("Mirrored {} lists to {}/{}", category, LISTS_RESOURCE, id);
        Ok(())
    }

    pub async fn publish_stats(&self, stats: &WatchStats) -> Result<(), ResourceError> {
        let mut stats_body = serde_json::to_value(stats)
            .map_err(|e| ResourceError::InvalidBody(e.to_string()))?;
        if let Value::Object(fields) = &mut stats_body {
            fields.insert("tvTime".to_string(), Value::String(stats.tv_time()));
            fields.insert("lastActive".to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        let patch = json!({ "stats": stats_body });
        let create = json!({
            "id": self.user_id,
            "social": { "followers": 0, "following": 0, "comments": 0 },
            "stats": stats_body,
        });
        self.upsert(STATS_RESOURCE, &self.user_id, patch, create).await?;
        info!("Mirrored watch stats to {}/{}", STATS_RESOURCE, self.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResourceService;
    use async_trait::async_trait;
    use orrin_models::{MediaItem, MediaType, StatusLabel};

    fn store_with_items() -> ListStore {
        let mut store = ListStore::new();
        store
            .move_to_status(MediaCategory::Films, StatusLabel::Watched, MediaItem::new("m1", "Heat", MediaType::Film))
            .unwrap();
        store.create_custom_list(MediaCategory::Films, "Noir").unwrap();
        store
    }

    #[tokio::test]
    async fn test_publish_category_creates_then_updates() {
        let mirror = ListMirror::new(MemoryResourceService::new(), "7");
        let mut store = store_with_items();

        mirror.publish_category(&store, MediaCategory::Films).await.unwrap();
        assert_eq!(mirror.service().len("lists"), 1);

        store
            .add_to_custom_list(MediaCategory::Films, "Noir", MediaItem::new("m2", "Laura", MediaType::Film))
            .unwrap();
        mirror.publish_category(&store, MediaCategory::Films).await.unwrap();
        assert_eq!(mirror.service().len("lists"), 1);

        let doc = mirror.service().get("lists", "7-films").await.unwrap();
        assert_eq!(doc["userId"], "7");
        assert_eq!(doc["category"], "films");
        assert_eq!(doc["statuses"][2]["label"], "Watched");
        assert_eq!(doc["statuses"][2]["count"], 1);
        assert_eq!(doc["customLists"][0]["name"], "Noir");
        assert_eq!(doc["customLists"][0]["count"], 1);
    }

    #[tokio::test]
    async fn test_publish_stats_creates_profile_with_social_defaults() {
        let mirror = ListMirror::new(MemoryResourceService::new(), "7");
        let stats = WatchStats::from_store(&store_with_items());

        mirror.publish_stats(&stats).await.unwrap();
        let profile = mirror.service().get("profileStats", "7").await.unwrap();
        assert_eq!(profile["social"]["followers"], 0);
        assert_eq!(profile["stats"]["films"], 1);
        assert_eq!(profile["stats"]["tvTime"], "0h 0m");

        // A second publish patches stats and leaves social alone
        mirror
            .service()
            .update("profileStats", "7", json!({"social": {"followers": 4}}))
            .await
            .unwrap();
        mirror.publish_stats(&WatchStats::default()).await.unwrap();
        let profile = mirror.service().get("profileStats", "7").await.unwrap();
        assert_eq!(profile["social"]["followers"], 4);
        assert_eq!(profile["stats"]["films"], 0);
    }

    struct UnavailableService;

    #[async_trait]
    impl ResourceService for UnavailableService {
        async fn get(&self, _resource: &str, _id: &str) -> Result<Value, ResourceError> {
            Err(ResourceError::Status { status: 503, body: String::new() })
        }
        async fn list(&self, _resource: &str, _query: &[(&str, &str)]) -> Result<Vec<Value>, ResourceError> {
            Err(ResourceError::Status { status: 503, body: String::new() })
        }
        async fn create(&self, _resource: &str, _body: Value) -> Result<Value, ResourceError> {
            Err(ResourceError::Status { status: 503, body: String::new() })
        }
        async fn update(&self, _resource: &str, _id: &str, _patch: Value) -> Result<Value, ResourceError> {
            Err(ResourceError::Status { status: 503, body: String::new() })
        }
        async fn delete(&self, _resource: &str, _id: &str) -> Result<(), ResourceError> {
            Err(ResourceError::Status { status: 503, body: String::new() })
        }
    }

    #[tokio::test]
    async fn test_failed_publish_leaves_store_untouched() {
        let mirror = ListMirror::new(UnavailableService, "7");
        let store = store_with_items();
        let before = store.clone();

        let err = mirror.publish_category(&store, MediaCategory::Films).await.unwrap_err();
        assert!(matches!(err, ResourceError::Status { status: 503, .. }));
        assert_eq!(store, before);
    }
}
