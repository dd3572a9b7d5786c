//! Test helpers: build AppState and router for integration tests.
//!
//! Uses the in-memory link store and talk directory, so no database is needed.

#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use vidlink_api::setup::routes;
use vidlink_api::state::AppState;
use vidlink_core::models::{Event, Talk};
use vidlink_core::{Config, LinkStoreBackend, LogFormat, RoleAuthorizer};
use vidlink_db::{InMemoryLinkRepository, InMemoryTalkDirectory};

pub const ORGANIZER_TOKEN: &str = "test-organizer-token-at-least-32-characters";
pub const REVIEWER_TOKEN: &str = "test-reviewer-token-at-least-32-characters-";
pub const VIEWER_TOKEN: &str = "test-viewer-token-at-least-32-characters-long";

pub const EVENT: &str = "democon";
pub const UNSCHEDULED_EVENT: &str = "draftcon";

pub fn links_path(path: &str) -> String {
    format!("/api/events/{}/p/youtube/{}", EVENT, path)
}

pub fn settings_path(event: &str, path: &str) -> String {
    format!("/orga/event/{}/settings/p/youtube/{}", event, path)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        database_url: String::new(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        link_store_backend: LinkStoreBackend::Memory,
        organizer_api_token: ORGANIZER_TOKEN.to_string(),
        viewer_api_token: Some(VIEWER_TOKEN.to_string()),
        reviewer_api_token: Some(REVIEWER_TOKEN.to_string()),
        max_import_size_bytes: 64 * 1024,
        log_format: LogFormat::Compact,
    }
}

/// Test application: server plus direct handles on the stores.
pub struct TestApp {
    pub server: TestServer,
    pub links: InMemoryLinkRepository,
    pub event: Event,
    pub keynote: Talk,
    pub workshop: Talk,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Seeds "democon" (schedule released, talks ABC123 and DEF456) and
/// "draftcon" (no schedule).
pub fn setup_test_app() -> TestApp {
    let config = test_config();
    let directory = InMemoryTalkDirectory::new();
    let event = directory.add_event(EVENT, "DemoCon 2025", true);
    let keynote = directory.add_talk(&event, "ABC123", "Keynote", true);
    let workshop = directory.add_talk(&event, "DEF456", "Workshop", true);
    let draft = directory.add_event(UNSCHEDULED_EVENT, "DraftCon", false);
    directory.add_talk(&draft, "GHI789", "Draft talk", false);

    let links = InMemoryLinkRepository::new();
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(links.clone()),
        Arc::new(directory),
        Arc::new(RoleAuthorizer),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        links,
        event,
        keynote,
        workshop,
    }
}
