use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of a session credential and of the cookie carrying it.
pub const SESSION_TTL_HOURS: i64 = 24;

pub fn session_ttl() -> Duration {
    Duration::hours(SESSION_TTL_HOURS)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid session credential")]
    InvalidCredential,

    #[error("session credential expired")]
    ExpiredCredential,

    #[error("failed to sign session credential: {0}")]
    Signing(String),
}

/// Mint a credential for `subject` valid for `ttl` from now.
pub fn issue(subject: &str, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    issue_at(subject, secret, ttl, Utc::now())
}

/// Mint a credential as if the clock read `now`.
pub fn issue_at(subject: &str, secret: &str, ttl: Duration, now: DateTime<Utc>) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Signing("empty secret".to_string()));
    }

    let claims = Claims::new(subject, now, ttl);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Check a credential against the current time and return its subject.
pub fn verify(token: &str, secret: &str) -> Result<String, AuthError> {
    verify_at(token, secret, Utc::now())
}

/// Check a credential against `now`. Valid only while `now < exp`.
pub fn verify_at(token: &str, secret: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidCredential);
    }

    // Expiry is compared against the caller's clock below.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|_| AuthError::InvalidCredential)?;
    let claims = data.claims;

    if claims.sub.is_empty() {
        return Err(AuthError::InvalidCredential);
    }
    if now.timestamp() >= claims.exp {
        return Err(AuthError::ExpiredCredential);
    }

    Ok(claims.sub)
}
