//! Postgres-backed collaborators: the key-value namespace and the user store.

pub mod kv;
pub mod users;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

pub use kv::PgNamespace;
pub use users::PgUserStore;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid namespace name: {0}")]
    InvalidNamespace(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS kv_entries (
        namespace TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (namespace, key)
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

/// Open a pool against `url` and create the tables this service uses.
pub async fn connect(url: &str) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
    ensure_schema(&pool).await?;
    info!("Connected to Postgres and verified schema");
    Ok(pool)
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Namespace names are stored as data, but keep them to a plain charset so
/// they read cleanly in logs and admin queries.
pub fn is_valid_namespace(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
