#![allow(dead_code)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, redirect, Client, Response};
use std::sync::Arc;

use config_editor::auth::{issue, session_ttl};
use config_editor::config::StoreBackend;
use config_editor::issuer::PasswordAccount;
use config_editor::store::{ConfigStore, KvNamespace, StoreError};
use config_editor::users::MemoryUserStore;
use config_editor::{app, AppConfig, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const EMAIL: &str = "editor@example.com";
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A session credential for `subject` signed with the server's secret.
    pub fn token_for(&self, subject: &str) -> Result<String> {
        Ok(issue(subject, SECRET, session_ttl())?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(header::COOKIE, format!("token={token}"))
            .send()
            .await?)
    }

    pub async fn publish(&self, token: &str, body: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/publish"))
            .header(header::COOKIE, format!("token={token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/password/authorize"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?)
    }
}

/// A namespace whose backend is always down.
pub struct FailingNamespace;

#[async_trait]
impl KvNamespace for FailingNamespace {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("down".to_string()))
    }
}

pub fn test_config() -> AppConfig {
    let account = PasswordAccount::with_password(EMAIL, PASSWORD).expect("hash test password");
    AppConfig::for_memory(SECRET, vec![account])
}

/// Start the app on a free local port with in-memory backends.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_with(test_config()).await
}

/// Start the app with no key-value namespace bound.
pub async fn spawn_unbound_server() -> Result<TestServer> {
    let mut config = test_config();
    config.store.backend = StoreBackend::Unbound;
    spawn_with(config).await
}

/// Start the app with a store whose every read and write fails.
pub async fn spawn_failing_store_server() -> Result<TestServer> {
    let config = test_config();
    let store = ConfigStore::new(Arc::new(FailingNamespace), config.store.key.clone());
    let state = AppState::new(config, Some(store), Arc::new(MemoryUserStore::new()));
    spawn_state(state).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    spawn_state(AppState::from_config(config).await?).await
}

pub async fn spawn_state(state: AppState) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let router = app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let client = Client::builder().redirect(redirect::Policy::none()).build()?;

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client,
        state,
    })
}

pub fn header_value(res: &Response, name: header::HeaderName) -> Option<String> {
    res.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

/// The `token` value from a `Set-Cookie` header.
pub fn session_cookie_value(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    pair.trim().strip_prefix("token=").map(str::to_string)
}
