use crate::auth::models::CurrentActor;
use crate::auth::tokens::TokenRegistry;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vidlink_core::AppError;

#[derive(Clone, Debug)]
pub struct AuthState {
    pub tokens: TokenRegistry,
}

fn unauthorized(message: &str) -> Response {
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Resolve the `Authorization: Bearer` token to an actor and store it on the request.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            tracing::debug!(path = %request.uri().path(), "Missing authorization header");
            return unauthorized("Missing authorization header");
        }
    };

    let Some(token) = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("Token "))
    else {
        return unauthorized("Invalid authorization header format");
    };

    match auth_state.tokens.resolve(token.trim()) {
        Some(actor) => {
            tracing::debug!(actor = %actor.name, "Request authenticated");
            request.extensions_mut().insert(CurrentActor(actor));
            next.run(request).await
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Rejected unknown API token");
            unauthorized("Invalid API token")
        }
    }
}
