use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::{normalize_email, User, UserStore, UserStoreError};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn upsert_by_email(&self, email: &str) -> Result<User, UserStoreError> {
        let email = normalize_email(email)?;
        // The no-op update makes RETURNING yield the existing id on conflict.
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .fetch_one(&self.pool)
        .await?;
        Ok(User { id, email })
    }
}
