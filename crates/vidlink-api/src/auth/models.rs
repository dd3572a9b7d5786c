use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vidlink_core::{Actor, AppError};

/// The authenticated actor, placed in request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

// Read from parts rather than `Extension` so it composes with body extractors like `Multipart`.
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentActor>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Not authenticated".to_string())))
    }
}
