pub mod import;
pub mod links;
pub mod plugin;
pub mod settings;

use crate::state::AppState;
use vidlink_core::models::Event;
use vidlink_core::{Actor, AppError, Permission};

/// Resolve the event addressed by the URL and check `permission` on it.
pub(crate) async fn authorized_event(
    state: &AppState,
    actor: &Actor,
    slug: &str,
    permission: Permission,
) -> Result<Event, AppError> {
    let event = state.link_service.find_event(slug).await?;
    state.authorizer.require(actor, &event, permission).await?;
    Ok(event)
}
