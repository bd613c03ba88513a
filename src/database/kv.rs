use async_trait::async_trait;
use sqlx::PgPool;

use super::{is_valid_namespace, DatabaseError};
use crate::store::{KvNamespace, StoreError};

/// A namespace stored as rows of the `kv_entries` table.
#[derive(Clone)]
pub struct PgNamespace {
    pool: PgPool,
    namespace: String,
}

impl PgNamespace {
    pub fn new(pool: PgPool, namespace: &str) -> Result<Self, DatabaseError> {
        if !is_valid_namespace(namespace) {
            return Err(DatabaseError::InvalidNamespace(namespace.to_string()));
        }
        Ok(Self {
            pool,
            namespace: namespace.to_string(),
        })
    }
}

#[async_trait]
impl KvNamespace for PgNamespace {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM kv_entries WHERE namespace = $1 AND key = $2",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_entries (namespace, key, value, updated_at)
             VALUES ($1, $2, $3, now())
             ON CONFLICT (namespace, key)
             DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
