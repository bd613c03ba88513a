use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use super::parse_document;
use crate::app::AppState;
use crate::error::AppError;
use crate::render::render;

/// GET / - editor page for the current document
pub async fn show(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.config_store()?;
    let document = parse_document(&store.read().await?)?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(render(&document)),
    ))
}
