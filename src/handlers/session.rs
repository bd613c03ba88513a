use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::redirect_found;
use crate::app::AppState;
use crate::auth::{build_clear_cookie, build_session_cookie, issue, session_ttl};
use crate::error::AppError;

/// Login success callback: resolve the user, mint a session, set the cookie
/// and send the browser back to the editor.
pub async fn complete_login(state: &AppState, email: &str) -> Result<Response, AppError> {
    let user = state.users.upsert_by_email(email).await?;
    let ttl = session_ttl();
    let token = issue(&user.id.to_string(), &state.config.session.secret, ttl)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!("User {} signed in", user.id);

    let cookie = build_session_cookie(&token, ttl.num_seconds(), state.cookie_options());
    let mut response = redirect_found("/");
    response.headers_mut().insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| AppError::internal("session cookie is not a valid header value"))?,
    );
    Ok(response)
}

/// GET /logout - clear the session cookie and go back to /
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, build_clear_cookie(state.cookie_options()))],
        redirect_found("/"),
    )
}
