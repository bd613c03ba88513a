use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::issuer::{is_password_hash, IssuerConfig, PasswordAccount, Theme};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub store: StoreConfig,
    pub issuer: IssuerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    /// Mark the session cookie `Secure`; browsers drop it on plain http.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    /// No namespace bound; store-backed routes answer with a diagnostic page.
    Unbound,
    Memory,
    Postgres { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub namespace: String,
    pub key: String,
}

impl StoreConfig {
    /// Backend label safe for logs (no connection string).
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StoreBackend::Unbound => "unbound",
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres { .. } => "postgres",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("EDITOR_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("EDITOR_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "EDITOR_PORT", value: v })?;
        }

        // Session overrides
        match env::var("SESSION_SECRET") {
            Ok(v) if !v.is_empty() => self.session.secret = v,
            _ if self.environment == Environment::Development => {
                tracing::warn!("SESSION_SECRET not set; using a random secret for this process");
            }
            _ => return Err(ConfigError::Missing("SESSION_SECRET")),
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = parse_bool("SESSION_SECURE_COOKIE", &v)?;
        }

        // Store overrides
        self.store.backend = match env::var("EDITOR_STORE").as_deref() {
            Err(_) | Ok("") | Ok("none") => StoreBackend::Unbound,
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") => {
                let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
                StoreBackend::Postgres { url }
            }
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "EDITOR_STORE",
                    value: other.to_string(),
                })
            }
        };
        if let Ok(v) = env::var("EDITOR_KV_NAMESPACE") {
            self.store.namespace = v;
        }
        if let Ok(v) = env::var("EDITOR_KV_KEY") {
            self.store.key = v;
        }

        // Issuer overrides
        if let Ok(v) = env::var("EDITOR_ACCOUNTS") {
            self.issuer.providers = parse_accounts(&v)?;
        }
        if let Ok(v) = env::var("EDITOR_THEME_TITLE") {
            self.issuer.theme.title = v;
        }

        Ok(self)
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            session: SessionConfig {
                secret: String::new(),
                secure_cookie: false,
            },
            store: StoreConfig {
                backend: StoreBackend::Unbound,
                namespace: "config".to_string(),
                key: "settings".to_string(),
            },
            issuer: IssuerConfig {
                providers: Vec::new(),
                theme: Theme::default(),
            },
        }
    }

    fn development() -> Self {
        let mut config = Self::base(Environment::Development);
        config.session.secret = uuid::Uuid::new_v4().simple().to_string();
        config
    }

    fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.session.secure_cookie = true;
        config
    }

    fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.session.secure_cookie = true;
        config
    }

    /// Configuration for in-process use (tests, embedding) with an in-memory store.
    pub fn for_memory(secret: impl Into<String>, providers: Vec<PasswordAccount>) -> Self {
        let mut config = Self::base(Environment::Development);
        config.session.secret = secret.into();
        config.store.backend = StoreBackend::Memory;
        config.issuer.providers = providers;
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse `email=<argon2 PHC hash>` entries separated by `;` or whitespace.
///
/// PHC strings contain `,` and `=`, so only the first `=` splits an entry.
pub fn parse_accounts(raw: &str) -> Result<Vec<PasswordAccount>, ConfigError> {
    raw.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || ConfigError::Invalid {
                name: "EDITOR_ACCOUNTS",
                value: entry.to_string(),
            };
            let (email, hash) = entry.split_once('=').ok_or_else(invalid)?;
            if email.is_empty() || !is_password_hash(hash) {
                return Err(invalid());
            }
            Ok(PasswordAccount::new(email, hash))
        })
        .collect()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::hash_password;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.session.secret.is_empty());
        assert!(!config.session.secure_cookie);
        assert_eq!(config.store.backend, StoreBackend::Unbound);
        assert_eq!(config.store.namespace, "config");
        assert_eq!(config.store.key, "settings");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.session.secret.is_empty());
        assert!(config.session.secure_cookie);
    }

    #[test]
    fn test_parse_accounts() {
        let admin = hash_password("hunter2").expect("hash");
        let ops = hash_password("correct horse").expect("hash");
        let accounts = parse_accounts(&format!(" Admin@Example.com={admin};\nops@example.com={ops}; ")).expect("valid accounts");
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].email, "admin@example.com");
        assert_eq!(accounts[1].password_hash, ops);
        assert!(accounts[0].matches("admin@example.com", "hunter2"));
        assert!(!accounts[1].matches("ops@example.com", "hunter2"));
    }

    #[test]
    fn test_parse_accounts_rejects_bad_hash() {
        let hash = hash_password("hunter2").expect("hash");
        // Unsalted hex digests are not accepted.
        assert!(parse_accounts("admin@example.com=5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8").is_err());
        assert!(parse_accounts("admin@example.com").is_err());
        assert!(parse_accounts(&format!("={hash}")).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("SESSION_SECURE_COOKIE", "true").expect("bool"));
        assert!(parse_bool("SESSION_SECURE_COOKIE", " ON ").expect("bool"));
        assert!(!parse_bool("SESSION_SECURE_COOKIE", "0").expect("bool"));
        let err = parse_bool("SESSION_SECURE_COOKIE", "ture").expect_err("typo rejected");
        assert!(matches!(err, ConfigError::Invalid { name: "SESSION_SECURE_COOKIE", .. }));
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig::for_memory("secret", Vec::new());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }
}
