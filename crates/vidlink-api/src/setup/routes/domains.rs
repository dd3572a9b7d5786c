//! Domain route groups (link API, settings pages).

use crate::constants::{LINKS_PREFIX, SETTINGS_PREFIX};
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn link_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/", LINKS_PREFIX),
            get(handlers::links::list_links).post(handlers::links::create_link),
        )
        .route(
            &format!("{}/import/", LINKS_PREFIX),
            post(handlers::import::import_links),
        )
        .route(
            &format!("{}/{{code}}/", LINKS_PREFIX),
            get(handlers::links::get_link)
                .patch(handlers::links::update_link)
                .put(handlers::links::update_link)
                .delete(handlers::links::delete_link),
        )
        .route(
            &format!("{}/{{code}}/recording/", LINKS_PREFIX),
            get(handlers::links::get_recording),
        )
}

pub fn settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/", SETTINGS_PREFIX),
            get(handlers::settings::show_settings).post(handlers::settings::submit_settings),
        )
        .route(
            &format!("{}/{{code}}/", SETTINGS_PREFIX),
            get(handlers::settings::show_talk_settings)
                .post(handlers::settings::submit_talk_settings),
        )
}
