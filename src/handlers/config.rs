use axum::{extract::State, http::header, response::IntoResponse};

use crate::app::AppState;
use crate::error::AppError;

/// GET /api/config - the stored document text, byte for byte
pub async fn fetch(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.config_store()?;
    let text = store.read().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store, must-revalidate"),
        ],
        text,
    ))
}
