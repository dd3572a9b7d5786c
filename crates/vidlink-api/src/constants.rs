//! API constants
//!
//! Route prefixes follow the host application's plugin URL layout: API routes
//! live under the event's `/p/youtube` namespace and the organiser page under
//! the event settings.

/// Prefix of the link API for one event.
pub const LINKS_PREFIX: &str = "/api/events/{event}/p/youtube";

/// Prefix of the organiser settings page for one event.
pub const SETTINGS_PREFIX: &str = "/orga/event/{event}/settings/p/youtube";

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

pub mod messages {
    pub const NO_SCHEDULE: &str = "Please create a schedule first!";
    pub const FIX_ERRORS: &str = "Please fix the errors below.";
    pub const LINKS_UPDATED: &str = "The YouTube URLs were updated.";
    pub const NO_FILE: &str = "Please select a file to upload.";
}

/// Settings URL of an event, for links and redirects.
pub fn settings_url(event_slug: &str) -> String {
    SETTINGS_PREFIX.replace("{event}", event_slug) + "/"
}

/// Link API URL of an event.
pub fn links_url(event_slug: &str) -> String {
    LINKS_PREFIX.replace("{event}", event_slug) + "/"
}
