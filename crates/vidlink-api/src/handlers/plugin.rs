use crate::plugin::{PluginMeta, PLUGIN_META};
use axum::{response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/plugin/",
    tag = "plugin",
    responses(
        (status = 200, description = "Plugin metadata", body = PluginMeta)
    )
)]
pub async fn plugin_meta() -> impl IntoResponse {
    Json(PLUGIN_META)
}
