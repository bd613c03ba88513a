//! Handlers for the authenticated editor surface and the login success callback.

pub mod config;
pub mod editor;
pub mod publish;
pub mod session;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// 302 Found to `location`.
pub fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Fallback for authenticated requests that match no route.
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

/// Parse stored document text; anything but a JSON object is a store fault.
pub fn parse_document(text: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(AppError::Store("stored document is not a JSON object".to_string())),
        Err(e) => Err(AppError::Store(format!("stored document is not valid JSON: {e}"))),
    }
}
