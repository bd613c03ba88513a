//! User store collaborator: resolves an email to a stable user id,
//! creating the record on first login.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("user store error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for UserStoreError {
    fn from(err: sqlx::Error) -> Self {
        UserStoreError::Backend(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user with `email`, creating one if none exists.
    async fn upsert_by_email(&self, email: &str) -> Result<User, UserStoreError>;
}

/// Trim and lowercase an email, rejecting values without a local part and domain.
pub fn normalize_email(email: &str) -> Result<String, UserStoreError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(UserStoreError::InvalidEmail),
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, Uuid>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn upsert_by_email(&self, email: &str) -> Result<User, UserStoreError> {
        let email = normalize_email(email)?;
        let mut users = self.users.write().await;
        let id = *users.entry(email.clone()).or_insert_with(Uuid::new_v4);
        Ok(User { id, email })
    }
}
