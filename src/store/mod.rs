//! Config Store Adapter.
//!
//! A [`KvNamespace`] is an external key-value namespace (in memory or in
//! Postgres). [`ConfigStore`] binds one namespace and one fixed key and
//! exposes whole-document reads and overwrites. There is no locking or
//! versioning: concurrent publishes are last-writer-wins.

pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryNamespace;

/// Text returned for a document that was never published.
pub const EMPTY_DOCUMENT: &str = "{}";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value backend error: {0}")]
    Backend(String),

    #[error("failed to encode document: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[async_trait]
pub trait KvNamespace: Send + Sync {
    /// Stored value for `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value for `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct ConfigStore {
    kv: Arc<dyn KvNamespace>,
    key: String,
}

impl ConfigStore {
    pub fn new(kv: Arc<dyn KvNamespace>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw document text, or `{}` when nothing has been published yet.
    pub async fn read(&self) -> Result<String, StoreError> {
        Ok(self
            .kv
            .get(&self.key)
            .await?
            .unwrap_or_else(|| EMPTY_DOCUMENT.to_string()))
    }

    /// Replace the stored document text wholesale.
    pub async fn write(&self, text: &str) -> Result<(), StoreError> {
        self.kv.put(&self.key, text).await
    }

    /// Serialize `document` with two-space indentation and overwrite the stored text.
    pub async fn publish(&self, document: &Map<String, Value>) -> Result<String, StoreError> {
        let text = serde_json::to_string_pretty(document)?;
        self.write(&text).await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(MemoryNamespace::new()), "settings")
    }

    #[tokio::test]
    async fn absent_key_reads_as_empty_object() {
        assert_eq!(store().read().await.expect("read"), "{}");
    }

    #[tokio::test]
    async fn write_then_read_returns_exact_text() {
        let store = store();
        store.write("{\"a\":1}").await.expect("write");
        assert_eq!(store.read().await.expect("read"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn write_overwrites_wholesale() {
        let store = store();
        store.write("{\"a\":1,\"b\":2}").await.expect("write");
        store.write("{\"c\":3}").await.expect("write");
        assert_eq!(store.read().await.expect("read"), "{\"c\":3}");
    }

    #[tokio::test]
    async fn publish_pretty_prints_with_two_spaces() {
        let store = store();
        let document = json!({"x": true, "y": 5}).as_object().cloned().expect("object");
        let text = store.publish(&document).await.expect("publish");
        assert_eq!(text, "{\n  \"x\": true,\n  \"y\": 5\n}");
        assert_eq!(store.read().await.expect("read"), text);
    }

    #[tokio::test]
    async fn stores_with_different_keys_are_independent() {
        let kv: Arc<dyn KvNamespace> = Arc::new(MemoryNamespace::new());
        let a = ConfigStore::new(kv.clone(), "a");
        let b = ConfigStore::new(kv, "b");
        a.write("{\"only\":\"a\"}").await.expect("write");
        assert_eq!(b.read().await.expect("read"), "{}");
    }
}
