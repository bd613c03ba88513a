use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{KvNamespace, StoreError};

/// Process-local namespace; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryNamespace {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvNamespace for MemoryNamespace {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
