//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::plugin;
use vidlink_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "YouTube integration API",
        description = "Link conference talks to YouTube videos. Links can be listed, created, updated, deleted and bulk imported from JSON or CSV."
    ),
    paths(
        handlers::links::list_links,
        handlers::links::get_link,
        handlers::links::create_link,
        handlers::links::update_link,
        handlers::links::delete_link,
        handlers::links::get_recording,
        handlers::import::import_links,
        handlers::plugin::plugin_meta,
    ),
    components(
        schemas(
            models::VideoLinkResponse,
            models::LinkWriteResponse,
            models::PaginatedLinks,
            models::CreateLinkRequest,
            models::UpdateLinkRequest,
            models::ImportSummary,
            models::LinkAction,
            vidlink_core::ImportRecord,
            vidlink_core::Recording,
            plugin::PluginMeta,
            handlers::links::PaginationQuery,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "links", description = "Talk to video links of an event"),
        (name = "plugin", description = "Plugin metadata")
    )
)]
pub struct ApiDoc;
