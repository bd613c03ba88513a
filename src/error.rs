// HTTP error types
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::store::StoreError;
use crate::users::UserStoreError;

/// Failures surfaced to the client. Authentication failures never reach this
/// type; the session gate hands those requests to the login flow instead.
#[derive(Debug)]
pub enum AppError {
    // 500, rendered as a diagnostic page
    MissingStoreBinding { namespace: String },

    // 500 with message (malformed publish body)
    BadRequest(String),

    // 500 with message
    Store(String),

    // 404
    NotFound(String),

    // 500
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingStoreBinding { .. }
            | AppError::BadRequest(_)
            | AppError::Store(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::MissingStoreBinding { namespace } => {
                format!("Key-value namespace '{namespace}' is not bound")
            }
            AppError::BadRequest(msg) => format!("Bad request: {msg}"),
            AppError::Store(msg) => format!("Store error: {msg}"),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(msg) => format!("Internal error: {msg}"),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingStoreBinding { .. } => "MISSING_STORE_BINDING",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Store(_) => "STORE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl AppError {
    pub fn missing_store_binding(namespace: impl Into<String>) -> Self {
        AppError::MissingStoreBinding {
            namespace: namespace.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<UserStoreError> for AppError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::InvalidEmail => AppError::bad_request("invalid email address"),
            UserStoreError::Backend(msg) => {
                tracing::error!("User store error: {}", msg);
                AppError::internal("user store unavailable")
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::MissingStoreBinding { namespace } => {
                tracing::error!("No key-value store bound for namespace '{}'", namespace);
                (status, Html(missing_binding_page(namespace))).into_response()
            }
            _ => {
                if status.is_server_error() {
                    tracing::error!("Request failed with {}: {}", self.error_code(), self.message());
                }
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    self.message(),
                )
                    .into_response()
            }
        }
    }
}

fn missing_binding_page(namespace: &str) -> String {
    let namespace = crate::render::escape_html(namespace);
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>Configuration error</title></head>\n\
         <body><h1>Configuration error</h1>\n\
         <p>The key-value namespace <code>{namespace}</code> is not bound to this service.</p>\n\
         <p>Set <code>EDITOR_STORE</code> to <code>memory</code> or <code>postgres</code> and restart.</p>\n\
         </body></html>\n"
    )
}
