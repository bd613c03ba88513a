use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::CookieOptions;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{self, DatabaseError, PgNamespace, PgUserStore};
use crate::error::AppError;
use crate::handlers;
use crate::issuer;
use crate::middleware::{session_gate, SessionGate};
use crate::store::{ConfigStore, KvNamespace, MemoryNamespace};
use crate::users::{MemoryUserStore, UserStore};

/// Shared, read-only handler context. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Option<ConfigStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Option<ConfigStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            users,
        }
    }

    /// Wire up the backends named by `config.store.backend`.
    pub async fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let key = config.store.key.clone();
        let memory_users = || -> Arc<dyn UserStore> { Arc::new(MemoryUserStore::new()) };
        let (store, users) = match &config.store.backend {
            StoreBackend::Unbound => (None, memory_users()),
            StoreBackend::Memory => {
                let kv: Arc<dyn KvNamespace> = Arc::new(MemoryNamespace::new());
                (Some(ConfigStore::new(kv, key)), memory_users())
            }
            StoreBackend::Postgres { url } => {
                let pool = database::connect(url).await?;
                let kv: Arc<dyn KvNamespace> = Arc::new(PgNamespace::new(pool.clone(), &config.store.namespace)?);
                let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
                (Some(ConfigStore::new(kv, key)), users)
            }
        };
        Ok(Self::new(config, store, users))
    }

    pub fn config_store(&self) -> Result<&ConfigStore, AppError> {
        self.store
            .as_ref()
            .ok_or_else(|| AppError::missing_store_binding(&self.config.store.namespace))
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.config.session.secure_cookie,
        }
    }
}

/// Full application: editor routes behind the session gate, login flow for
/// everything the gate rejects.
pub fn app(state: AppState) -> Router {
    let login = issuer::routes().with_state(state.clone());
    let gate = SessionGate::new(&state.config.session.secret, login);

    editor_routes()
        .layer(middleware::from_fn_with_state(gate, session_gate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn editor_routes() -> Router<AppState> {
    use handlers::{config, editor, publish, session};

    Router::new()
        .route("/", get(editor::show))
        .route("/publish", post(publish::publish))
        .route("/api/config", get(config::fetch))
        .route("/logout", get(session::logout))
        .fallback(handlers::not_found)
}
