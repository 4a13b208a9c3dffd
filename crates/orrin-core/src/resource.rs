//! Resource-per-collection persistence with json-server semantics: records
//! are JSON objects addressed by `id`, lists are filtered by field equality,
//! and updates are shallow merges.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{resource}/{id} not found")]
    NotFound { resource: String, id: String },

    #[error("{resource}/{id} already exists")]
    Conflict { resource: String, id: String },

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid resource body: {0}")]
    InvalidBody(String),

    #[error("invalid resource url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ResourceService: Send + Sync {
    async fn get(&self, resource: &str, id: &str) -> Result<Value, ResourceError>;

    /// Records whose fields equal every `(field, value)` pair of the query
    async fn list(&self, resource: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, ResourceError>;

    async fn create(&self, resource: &str, body: Value) -> Result<Value, ResourceError>;

    /// Merge the top-level fields of `patch` into the record
    async fn update(&self, resource: &str, id: &str, patch: Value) -> Result<Value, ResourceError>;

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ResourceError>;
}

/// String form used for id and query comparisons
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(scalar_to_string)
}

fn matches_query(record: &Value, query: &[(&str, &str)]) -> bool {
    query.iter().all(|(field, expected)| {
        record
            .get(*field)
            .and_then(scalar_to_string)
            .map(|actual| actual == *expected)
            .unwrap_or(false)
    })
}

fn into_object(body: Value) -> Result<Map<String, Value>, ResourceError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ResourceError::InvalidBody(format!("expected a JSON object, got {}", other))),
    }
}

/// In-process resource store
#[derive(Debug, Default)]
pub struct MemoryResourceService {
    collections: Mutex<BTreeMap<String, Vec<Value>>>,
    next_id: Mutex<u64>,
}

impl MemoryResourceService {
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Value>>> {
        self.collections.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *next += 1;
        next.to_string()
    }

    /// Number of records in a collection
    pub fn len(&self, resource: &str) -> usize {
        self.collections().get(resource).map(|records| records.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ResourceService for MemoryResourceService {
    async fn get(&self, resource: &str, id: &str) -> Result<Value, ResourceError> {
        self.collections()
            .get(resource)
            .and_then(|records| records.iter().find(|r| record_id(r).as_deref() == Some(id)))
            .cloned()
            .ok_or_else(|| ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() })
    }

    async fn list(&self, resource: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, ResourceError> {
        Ok(self
            .collections()
            .get(resource)
            .map(|records| records.iter().filter(|r| matches_query(r, query)).cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value, ResourceError> {
        let mut object = into_object(body)?;
        let id = match object.get("id").and_then(scalar_to_string) {
            Some(id) => id,
            None => {
                let id = self.allocate_id();
                object.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut collections = self.collections();
        let records = collections.entry(resource.to_string()).or_default();
        if records.iter().any(|r| record_id(r).as_deref() == Some(id.as_str())) {
            return Err(ResourceError::Conflict { resource: resource.to_string(), id });
        }

        let record = Value::Object(object);
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, resource: &str, id: &str, patch: Value) -> Result<Value, ResourceError> {
        let patch = into_object(patch)?;
        let mut collections = self.collections();
        let record = collections
            .get_mut(resource)
            .and_then(|records| records.iter_mut().find(|r| record_id(r).as_deref() == Some(id)))
            .ok_or_else(|| ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() })?;

        if let Value::Object(existing) = &mut *record {
            for (key, value) in patch {
                // The id is the address, never rewritten by a patch
                if key != "id" {
                    existing.insert(key, value);
                }
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ResourceError> {
        let mut collections = self.collections();
        let records = collections
            .get_mut(resource)
            .ok_or_else(|| ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() })?;
        let before = records.len();
        records.retain(|r| record_id(r).as_deref() != Some(id));
        if records.len() == before {
            return Err(ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() });
        }
        Ok(())
    }
}

/// HTTP client for a json-server style REST backend
#[derive(Debug, Clone)]
pub struct RestResourceService {
    client: Client,
    base_url: Url,
}

impl RestResourceService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ResourceError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| ResourceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ResourceError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `{base}/{segments...}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, ResourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json(response: reqwest::Response, resource: &str, id: &str) -> Result<Value, ResourceError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResourceError::Status { status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ResourceService for RestResourceService {
    async fn get(&self, resource: &str, id: &str) -> Result<Value, ResourceError> {
        let url = self.url(&[resource, id])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response, resource, id).await
    }

    async fn list(&self, resource: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, ResourceError> {
        let url = self.url(&[resource])?;
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;
        match Self::read_json(response, resource, "").await? {
            Value::Array(records) => Ok(records),
            // Some backends answer a single match with a bare object
            Value::Object(record) => Ok(vec![Value::Object(record)]),
            other => Err(ResourceError::InvalidBody(format!("expected a JSON array, got {}", other))),
        }
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value, ResourceError> {
        let url = self.url(&[resource])?;
        let id = record_id(&body).unwrap_or_default();
        debug!("POST {}", url);
        let response = self.client.post(url).json(&body).send().await?;
        Self::read_json(response, resource, &id).await
    }

    async fn update(&self, resource: &str, id: &str, patch: Value) -> Result<Value, ResourceError> {
        let url = self.url(&[resource, id])?;
        debug!("PATCH {}", url);
        let response = self.client.patch(url).json(&patch).send().await?;
        Self::read_json(response, resource, id).await
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ResourceError> {
        let url = self.url(&[resource, id])?;
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound { resource: resource.to_string(), id: id.to_string() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResourceError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }
}
