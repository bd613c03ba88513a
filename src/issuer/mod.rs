//! Login flow for unauthenticated requests.
//!
//! Every request without a valid session lands here. The flow owns its own
//! sub-paths: `/authorize` shows the password form, `/password/authorize`
//! checks it, and anything else is sent to `/authorize`. A successful check
//! calls [`crate::handlers::session::complete_login`] with the email.

pub mod page;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::AppState;
use crate::handlers::{self, redirect_found};

pub const AUTHORIZE_PATH: &str = "/authorize";
pub const PASSWORD_PATH: &str = "/password/authorize";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Accounts accepted by the password provider.
    pub providers: Vec<PasswordAccount>,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub title: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "Config Editor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordAccount {
    pub email: String,
    /// Argon2 PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl PasswordAccount {
    pub fn new(email: &str, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password_hash: password_hash.into(),
        }
    }

    /// Account whose stored hash is a freshly salted hash of `password`.
    pub fn with_password(email: &str, password: &str) -> Result<Self, HashError> {
        Ok(Self::new(email, hash_password(password)?))
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email.trim().to_lowercase() && verify_password(&self.password_hash, password)
    }
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("No randomness for salt: {0}")]
    Salt(getrandom::Error),

    #[error("Password hashing failed: {0}")]
    Hash(password_hash::Error),
}

/// Argon2id hash of `password` with a random salt, in PHC string form.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(HashError::Salt)?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(HashError::Hash)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(HashError::Hash)?;
    Ok(hash.to_string())
}

/// True when `hash` parses as a PHC hash string.
pub fn is_password_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}

/// Check `password` against a PHC hash string. Unparsable hashes never match.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

impl IssuerConfig {
    /// The account matching the credentials, if any.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&PasswordAccount> {
        self.providers.iter().find(|account| account.matches(email, password))
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub email: String,
    pub password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(AUTHORIZE_PATH, get(authorize))
        .route(PASSWORD_PATH, post(password_authorize))
        .fallback(|| async { redirect_found(AUTHORIZE_PATH) })
}

/// GET /authorize - show the login form
async fn authorize(State(state): State<AppState>) -> Html<String> {
    Html(page::login_page(&state.config.issuer.theme, None, None))
}

/// POST /password/authorize - check credentials and hand off to the success callback
async fn password_authorize(State(state): State<AppState>, Form(form): Form<PasswordForm>) -> Response {
    let issuer = &state.config.issuer;
    match issuer.authenticate(&form.email, &form.password) {
        Some(account) => {
            let email = account.email.clone();
            match handlers::session::complete_login(&state, &email).await {
                Ok(response) => response,
                Err(err) => err.into_response(),
            }
        }
        None => {
            tracing::info!("Login rejected for {}", form.email.trim());
            (
                StatusCode::UNAUTHORIZED,
                Html(page::login_page(
                    &issuer.theme,
                    Some(&form.email),
                    Some("Invalid email or password"),
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_hashes_differently_per_account() {
        let a = PasswordAccount::with_password("a@example.com", "hunter2").expect("hash");
        let b = PasswordAccount::with_password("b@example.com", "hunter2").expect("hash");
        assert_ne!(a.password_hash, b.password_hash);
        assert!(a.password_hash.starts_with("$argon2id$"));
        assert!(verify_password(&a.password_hash, "hunter2"));
        assert!(verify_password(&b.password_hash, "hunter2"));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8", "password"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn authenticates_matching_account_only() {
        let config = IssuerConfig {
            providers: vec![
                PasswordAccount::with_password("admin@example.com", "hunter2").expect("hash"),
                PasswordAccount::with_password("ops@example.com", "correct horse").expect("hash"),
            ],
            theme: Theme::default(),
        };

        let account = config.authenticate(" Admin@Example.com", "hunter2").expect("account");
        assert_eq!(account.email, "admin@example.com");
        assert!(config.authenticate("admin@example.com", "wrong").is_none());
        assert!(config.authenticate("ops@example.com", "hunter2").is_none());
        assert!(config.authenticate("nobody@example.com", "hunter2").is_none());
    }

    #[test]
    fn no_accounts_means_no_logins() {
        let config = IssuerConfig {
            providers: Vec::new(),
            theme: Theme::default(),
        };
        assert!(config.authenticate("admin@example.com", "").is_none());
    }
}
