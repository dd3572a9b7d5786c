//! Link API: list, detail, create, update and delete video links of an event.

use crate::auth::CurrentActor;
use crate::constants::{links_url, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::authorized_event;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidlink_core::models::{
    CreateLinkRequest, LinkWriteResponse, PaginatedLinks, UpdateLinkRequest, VideoLinkResponse,
};
use vidlink_core::{AppError, Permission, Recording};

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

fn page_url(base: &str, limit: i64, offset: i64) -> String {
    format!("{}?limit={}&offset={}", base, limit, offset)
}

/// Next/previous page URLs for a page starting at `offset`.
fn page_links(base: &str, count: i64, limit: i64, offset: i64) -> (Option<String>, Option<String>) {
    let next = (offset + limit < count).then(|| page_url(base, limit, offset + limit));
    let previous = (offset > 0).then(|| page_url(base, limit, (offset - limit).max(0)));
    (next, previous)
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/p/youtube/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Video links of the event", body = PaginatedLinks),
        (status = 401, description = "Missing credentials", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, actor, pagination), fields(actor = %actor.0.name))]
pub async fn list_links(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ViewSchedule).await?;

    let limit = pagination.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = pagination.offset.max(0);

    let (links, count) = state.link_service.list(&event, limit, offset).await?;
    let (next, previous) = page_links(&links_url(&event.slug), count, limit, offset);

    Ok(Json(PaginatedLinks {
        count,
        next,
        previous,
        results: links.iter().map(VideoLinkResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/p/youtube/{code}/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("code" = String, Path, description = "Submission code")
    ),
    responses(
        (status = 200, description = "Video link found", body = VideoLinkResponse),
        (status = 404, description = "No link for this submission", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, actor), fields(actor = %actor.0.name))]
pub async fn get_link(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ViewSchedule).await?;
    let link = state.link_service.get(&event, &code).await?;
    Ok(Json(VideoLinkResponse::from(&link)))
}

#[utoipa::path(
    post,
    path = "/api/events/{event}/p/youtube/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug")
    ),
    request_body = CreateLinkRequest,
    responses(
        (status = 201, description = "Video link created or replaced", body = LinkWriteResponse),
        (status = 400, description = "Unknown submission or invalid video id", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, actor, request),
    fields(actor = %actor.0.name, submission = %request.submission)
)]
pub async fn create_link(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateLinkRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ChangeSettings).await?;
    let talk = state
        .link_service
        .talk_for_write(&event, &request.submission)
        .await?;

    let outcome = state
        .link_service
        .create_or_update(&talk, &request.video_id)
        .await?;
    let link = outcome
        .link
        .ok_or_else(|| AppError::Internal("Upsert returned no link".to_string()))?;

    Ok((StatusCode::CREATED, Json(LinkWriteResponse::from(&link))))
}

#[utoipa::path(
    patch,
    path = "/api/events/{event}/p/youtube/{code}/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("code" = String, Path, description = "Submission code")
    ),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, description = "Video link updated", body = VideoLinkResponse),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "No link for this submission", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, actor, request), fields(actor = %actor.0.name))]
pub async fn update_link(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<UpdateLinkRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ChangeSettings).await?;
    let link = state
        .link_service
        .update_existing(&event, &code, &request.video_id)
        .await?;
    Ok(Json(VideoLinkResponse::from(&link)))
}

#[utoipa::path(
    delete,
    path = "/api/events/{event}/p/youtube/{code}/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("code" = String, Path, description = "Submission code")
    ),
    responses(
        (status = 204, description = "Video link deleted"),
        (status = 404, description = "No link for this submission", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, actor), fields(actor = %actor.0.name))]
pub async fn delete_link(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ChangeSettings).await?;
    state.link_service.delete(&event, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/p/youtube/{code}/recording/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("code" = String, Path, description = "Submission code")
    ),
    responses(
        (status = 200, description = "Embeddable recording", body = Recording),
        (status = 404, description = "No recording for this submission", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recording(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ViewSchedule).await?;
    let recording = state
        .link_service
        .recording(&event, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No recording for submission '{}'", code)))?;
    Ok(Json(recording))
}
