//! Organiser settings pages.
//!
//! Both pages always answer `200` with HTML; validation and import failures
//! are reported as flash messages. Actors without the settings permission
//! get a 404, as if the page did not exist.

use crate::auth::CurrentActor;
use crate::constants::messages;
use crate::error::HttpAppError;
use crate::handlers::authorized_event;
use crate::html::{render_settings_page, render_single_talk_page, Flash};
use crate::plugin::settings_nav_entry;
use crate::services::settings_form::{build_fields, field_name, validate_submission, with_errors};
use crate::state::AppState;
use crate::utils::{extract_multipart_upload, validate_file_size, UploadForm};
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    Form,
};
use std::collections::HashMap;
use std::sync::Arc;
use vidlink_core::models::{Event, Talk};
use vidlink_core::{
    parse_import_payload, Actor, AppError, ErrorMetadata, FormatDetection, Permission,
};

async fn settings_event(state: &AppState, actor: &Actor, slug: &str) -> Result<Event, AppError> {
    authorized_event(state, actor, slug, Permission::ChangeSettings)
        .await
        .map_err(|e| match e {
            AppError::Forbidden(_) => AppError::NotFound(format!("Event '{}' not found", slug)),
            other => other,
        })
}

async fn schedule_talks(state: &AppState, event: &Event) -> Result<Vec<Talk>, AppError> {
    if !event.has_schedule {
        return Ok(Vec::new());
    }
    state.link_service.scheduled_talks(event).await
}

/// Render the bulk page from stored values, with optional per-field errors.
async fn render_bulk(
    state: &AppState,
    actor: &Actor,
    event: &Event,
    flashes: &[Flash],
    errors: &HashMap<String, String>,
) -> Result<Html<String>, AppError> {
    let talks = schedule_talks(state, event).await?;
    let links = state.link_service.all_links(event).await?;
    let fields = with_errors(build_fields(&talks, &links), errors);
    let nav = settings_nav_entry(state.authorizer.as_ref(), actor, event, true).await?;
    Ok(Html(render_settings_page(event, &fields, flashes, nav.as_ref())))
}

#[tracing::instrument(skip(state, actor), fields(actor = %actor.0.name))]
pub async fn show_settings(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = settings_event(&state, &actor.0, &event).await?;
    Ok(render_bulk(&state, &actor.0, &event, &[], &HashMap::new()).await?)
}

#[tracing::instrument(skip(state, actor, request), fields(actor = %actor.0.name))]
pub async fn submit_settings(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path(event): Path<String>,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = settings_event(&state, &actor.0, &event).await?;
    let no_errors = HashMap::new();

    if !event.has_schedule {
        let flashes = [Flash::Error(messages::NO_SCHEDULE.to_string())];
        return Ok(render_bulk(&state, &actor.0, &event, &flashes, &no_errors).await?);
    }

    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let flash = match Multipart::from_request(request, &()).await {
            Ok(multipart) => match extract_multipart_upload(multipart).await {
                Ok(form) => handle_upload(&state, &event, form).await?,
                Err(e) => Flash::Error(e.client_message()),
            },
            Err(e) => Flash::Error(format!("Invalid upload: {}", e.body_text())),
        };
        return Ok(render_bulk(&state, &actor.0, &event, &[flash], &no_errors).await?);
    }

    let Form(data) = Form::<HashMap<String, String>>::from_request(request, &())
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {}", e.body_text())))?;

    let talks = schedule_talks(&state, &event).await?;
    let links = state.link_service.all_links(&event).await?;
    match validate_submission(&talks, &links, &data) {
        Ok(changes) => {
            let outcomes = state.link_service.apply_changes(changes).await?;
            tracing::info!(changed = outcomes.len(), "Settings saved");
            let flashes = [Flash::Success(messages::LINKS_UPDATED.to_string())];
            Ok(render_bulk(&state, &actor.0, &event, &flashes, &no_errors).await?)
        }
        Err(errors) => {
            tracing::debug!(invalid_fields = errors.len(), "Settings form rejected");
            let flashes = [Flash::Error(messages::FIX_ERRORS.to_string())];
            Ok(render_bulk(&state, &actor.0, &event, &flashes, &errors).await?)
        }
    }
}

/// Run a file import from the settings page and describe the result.
/// Storage failures propagate; everything else becomes an error flash.
async fn handle_upload(state: &AppState, event: &Event, form: UploadForm) -> Result<Flash, AppError> {
    if form.fields.get("action").map(String::as_str) != Some("upload") {
        return Ok(Flash::Error("Unknown form action.".to_string()));
    }
    let Some(file) = form.file else {
        return Ok(Flash::Error(messages::NO_FILE.to_string()));
    };
    if let Err(e) = validate_file_size(file.data.len(), state.config.max_import_size_bytes) {
        return Ok(Flash::Error(e.client_message()));
    }

    let records = match parse_import_payload(
        &file.data,
        file.content_type.as_deref(),
        Some(file.filename.as_str()),
        FormatDetection::Declared,
    ) {
        Ok(records) => records,
        Err(e) => return Ok(Flash::Error(e.to_string())),
    };

    match state.link_service.import(event, records).await {
        Ok(outcomes) => Ok(Flash::Success(format!(
            "Imported {} YouTube links.",
            outcomes.len()
        ))),
        Err(e @ AppError::Database(_)) => Err(e),
        Err(e) => Ok(Flash::Error(e.client_message())),
    }
}

#[tracing::instrument(skip(state, actor), fields(actor = %actor.0.name))]
pub async fn show_talk_settings(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = settings_event(&state, &actor.0, &event).await?;
    let talk = state.link_service.find_talk(&event, &code).await?;
    Ok(render_talk(&state, &actor.0, &event, &talk, &[], None).await?)
}

#[tracing::instrument(skip(state, actor, data), fields(actor = %actor.0.name))]
pub async fn submit_talk_settings(
    actor: CurrentActor,
    State(state): State<Arc<AppState>>,
    Path((event, code)): Path<(String, String)>,
    Form(data): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = settings_event(&state, &actor.0, &event).await?;
    let talk = state.link_service.find_talk(&event, &code).await?;

    let raw = data
        .get(&field_name(&talk.code))
        .map(String::as_str)
        .unwrap_or_default();

    match state.link_service.set_from_form(&talk, raw).await {
        Ok(_) => {
            let flashes = [Flash::Success(messages::LINKS_UPDATED.to_string())];
            Ok(render_talk(&state, &actor.0, &event, &talk, &flashes, None).await?)
        }
        Err(AppError::InvalidInput(message)) => {
            let flashes = [Flash::Error(messages::FIX_ERRORS.to_string())];
            Ok(render_talk(&state, &actor.0, &event, &talk, &flashes, Some(message)).await?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn render_talk(
    state: &AppState,
    actor: &Actor,
    event: &Event,
    talk: &Talk,
    flashes: &[Flash],
    error: Option<String>,
) -> Result<Html<String>, AppError> {
    let links = state
        .link_service
        .get(event, &talk.code)
        .await
        .map(|link| vec![link])
        .or_else(|e| match e {
            AppError::NotFound(_) => Ok(Vec::new()),
            other => Err(other),
        })?;
    let mut field = build_fields(std::slice::from_ref(talk), &links)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("No settings field for talk".to_string()))?;
    field.error = error;
    let nav = settings_nav_entry(state.authorizer.as_ref(), actor, event, true).await?;
    Ok(Html(render_single_talk_page(event, &field, flashes, nav.as_ref())))
}
