//! Bulk import endpoint.
//!
//! Accepts a JSON array body, a multipart upload with exactly one `file`
//! field, or a raw CSV/JSON body whose format is sniffed from its content.

use crate::auth::CurrentActor;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::authorized_event;
use crate::state::AppState;
use crate::utils::{extract_multipart_upload, validate_file_size};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use vidlink_core::models::ImportSummary;
use vidlink_core::{
    parse_import_payload, AppError, FormatDetection, ImportRecord, Permission,
};

/// Body and format hints of an import request.
struct ImportPayload {
    data: Vec<u8>,
    content_type: Option<String>,
    filename: Option<String>,
}

async fn read_payload(request: Request, max_size: usize) -> Result<ImportPayload, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?;
        let form = extract_multipart_upload(multipart).await?;
        let file = form
            .file
            .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
        validate_file_size(file.data.len(), max_size)?;
        return Ok(ImportPayload {
            data: file.data,
            content_type: file.content_type,
            filename: Some(file.filename).filter(|f| !f.is_empty()),
        });
    }

    let body = Bytes::from_request(request, &()).await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(format!("Failed to read request body: {}", e.body_text()))
        }
    })?;
    validate_file_size(body.len(), max_size)?;
    Ok(ImportPayload {
        data: body.to_vec(),
        content_type,
        filename: None,
    })
}

#[utoipa::path(
    post,
    path = "/api/events/{event}/p/youtube/import/",
    tag = "links",
    params(
        ("event" = String, Path, description = "Event slug")
    ),
    request_body(content = Vec<ImportRecord>, description = "JSON array, CSV file or multipart upload"),
    responses(
        (status = 201, description = "All records imported", body = ImportSummary),
        (status = 400, description = "Malformed payload or invalid record", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse),
        (status = 413, description = "Payload too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, actor, request), fields(actor = %actor.0.name))]
pub async fn import_links(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = authorized_event(&state, &actor.0, &event, Permission::ChangeSettings).await?;

    let payload = read_payload(request, state.config.max_import_size_bytes).await?;
    let records = parse_import_payload(
        &payload.data,
        payload.content_type.as_deref(),
        payload.filename.as_deref(),
        FormatDetection::Sniff,
    )
    .map_err(AppError::from)?;

    let outcomes = state.link_service.import(&event, records).await?;
    Ok((StatusCode::CREATED, Json(ImportSummary::from_outcomes(&outcomes))))
}
