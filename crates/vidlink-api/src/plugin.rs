//! Plugin metadata and the settings navigation entry.

use crate::constants::settings_url;
use serde::Serialize;
use utoipa::ToSchema;
use vidlink_core::models::Event;
use vidlink_core::{Actor, AppError, Authorizer, Permission};

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PluginMeta {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub category: &'static str,
}

pub const PLUGIN_META: PluginMeta = PluginMeta {
    name: "YouTube integration",
    author: "vidlink",
    description: "Embed YouTube videos as session recordings",
    version: env!("CARGO_PKG_VERSION"),
    category: "RECORDING",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavEntry {
    pub label: String,
    pub url: String,
    pub active: bool,
}

/// Navigation entry for the event settings menu; only offered to actors who
/// may change settings.
pub async fn settings_nav_entry(
    authorizer: &dyn Authorizer,
    actor: &Actor,
    event: &Event,
    active: bool,
) -> Result<Option<NavEntry>, AppError> {
    if !authorizer
        .has_permission(actor, event, Permission::ChangeSettings)
        .await?
    {
        return Ok(None);
    }
    Ok(Some(NavEntry {
        label: "YouTube".to_string(),
        url: settings_url(&event.slug),
        active,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vidlink_core::{ActorRole, RoleAuthorizer};

    fn event() -> Event {
        Event {
            id: Uuid::nil(),
            slug: "democon".to_string(),
            name: "DemoCon".to_string(),
            has_schedule: true,
        }
    }

    #[tokio::test]
    async fn test_nav_entry_for_organizer() {
        let actor = Actor::new("orga", ActorRole::Organizer);
        let entry = settings_nav_entry(&RoleAuthorizer, &actor, &event(), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.label, "YouTube");
        assert_eq!(entry.url, "/orga/event/democon/settings/p/youtube/");
        assert!(!entry.active);
    }

    #[tokio::test]
    async fn test_no_nav_entry_for_viewer() {
        let actor = Actor::new("viewer", ActorRole::Viewer);
        assert!(settings_nav_entry(&RoleAuthorizer, &actor, &event(), true)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_plugin_meta() {
        assert_eq!(PLUGIN_META.name, "YouTube integration");
        assert_eq!(PLUGIN_META.version, "1.2.0");
    }
}
