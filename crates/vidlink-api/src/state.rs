//! Application state shared by all handlers.

use crate::services::LinkService;
use std::sync::Arc;
use vidlink_core::{Authorizer, Config};
use vidlink_db::{LinkRepository, TalkDirectory};

#[derive(Clone)]
pub struct AppState {
    pub links: Arc<dyn LinkRepository>,
    pub authorizer: Arc<dyn Authorizer>,
    pub link_service: LinkService,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        links: Arc<dyn LinkRepository>,
        talks: Arc<dyn TalkDirectory>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        let link_service = LinkService::new(links.clone(), talks);
        Self {
            links,
            authorizer,
            link_service,
            config,
        }
    }
}
