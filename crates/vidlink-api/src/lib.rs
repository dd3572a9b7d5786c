//! YouTube integration API
//!
//! HTTP handlers, the organiser settings pages and application setup for
//! linking conference talks to YouTube videos.

mod api_doc;
mod telemetry;
mod utils;

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod html;
pub mod plugin;
pub mod services;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::ErrorResponse;
pub use plugin::{settings_nav_entry, NavEntry, PluginMeta, PLUGIN_META};
