//! Link store and talk directory selection

use anyhow::Result;
use std::sync::Arc;
use vidlink_core::{Config, LinkStoreBackend};
use vidlink_db::{
    InMemoryLinkRepository, InMemoryTalkDirectory, LinkRepository, PgLinkRepository,
    PgTalkDirectory, TalkDirectory,
};

pub async fn setup_stores(
    config: &Config,
) -> Result<(Arc<dyn LinkRepository>, Arc<dyn TalkDirectory>)> {
    match config.link_store_backend {
        LinkStoreBackend::Postgres => {
            let pool = super::database::setup_database(config).await?;
            Ok((
                Arc::new(PgLinkRepository::new(pool.clone())),
                Arc::new(PgTalkDirectory::new(pool)),
            ))
        }
        LinkStoreBackend::Memory => {
            tracing::warn!("Using in-memory link store; links are lost on restart");
            Ok((
                Arc::new(InMemoryLinkRepository::new()),
                Arc::new(InMemoryTalkDirectory::new()),
            ))
        }
    }
}
