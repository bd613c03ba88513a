use axum::{body::Bytes, extract::State, Extension, Json};
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::error::AppError;
use crate::middleware::Session;

/// Largest integer the browser editor holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Validate a publish body: `{ "data": { key: string | number | boolean | null } }`.
pub fn parse_publish_body(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("body is not valid JSON: {e}")))?;

    let Value::Object(mut payload) = payload else {
        return Err(AppError::bad_request("body must be a JSON object"));
    };
    let Some(Value::Object(data)) = payload.remove("data") else {
        return Err(AppError::bad_request("field 'data' must be a JSON object"));
    };

    for (key, value) in &data {
        if key.trim().is_empty() {
            return Err(AppError::bad_request("keys must not be empty"));
        }
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(AppError::bad_request(format!(
                "value for '{key}' must be a string, number or boolean"
            )));
        }
        if let Value::Number(n) = value {
            if !is_safe_number(n) {
                return Err(AppError::bad_request(format!(
                    "value for '{key}' is outside the exact integer range of the editor"
                )));
            }
        }
    }

    Ok(data)
}

fn is_safe_number(n: &serde_json::Number) -> bool {
    if let Some(i) = n.as_i64() {
        i.unsigned_abs() <= MAX_SAFE_INTEGER
    } else if let Some(u) = n.as_u64() {
        u <= MAX_SAFE_INTEGER
    } else {
        true
    }
}

/// POST /publish - overwrite the document with the posted data
pub async fn publish(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let store = state.config_store()?;
    let document = parse_publish_body(&body)?;
    store.publish(&document).await?;

    tracing::info!(
        "User {} published {} keys to '{}'",
        session.subject,
        document.len(),
        store.key()
    );
    Ok(Json(json!({
        "success": true,
        "data": { "keys": document.len() }
    })))
}
