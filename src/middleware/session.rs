use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use crate::auth::{session_token, verify, AuthError};

/// Authenticated session context extracted from the session cookie
#[derive(Clone, Debug)]
pub struct Session {
    pub subject: String,
}

/// State for [`session_gate`]: the signing secret and the login flow that
/// receives every request without a valid credential.
#[derive(Clone)]
pub struct SessionGate {
    secret: Arc<str>,
    login: Router,
}

impl SessionGate {
    pub fn new(secret: &str, login: Router) -> Self {
        Self {
            secret: Arc::from(secret),
            login,
        }
    }

    fn authenticate(&self, request: &Request) -> Result<Session, AuthError> {
        let token = session_token(request.headers()).ok_or(AuthError::InvalidCredential)?;
        let subject = verify(&token, &self.secret)?;
        Ok(Session { subject })
    }
}

/// Session middleware: valid credentials continue to the editor routes with a
/// [`Session`] extension; anything else is answered by the login flow.
pub async fn session_gate(State(gate): State<SessionGate>, mut request: Request, next: Next) -> Response {
    match gate.authenticate(&request) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!("Unauthenticated {} {}: {}", request.method(), request.uri().path(), err);
            match gate.login.oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            }
        }
    }
}
