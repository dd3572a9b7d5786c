//! Permissions and the authorization capability.
//!
//! The host application decides who may do what; this service only asks.
//! Handlers receive the acting [`Actor`] explicitly and pass it to an
//! [`Authorizer`] together with the event being touched.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read the schedule, and with it the video links.
    ViewSchedule,
    /// Change event settings, including video links.
    ChangeSettings,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewSchedule => "agenda.view_schedule",
            Permission::ChangeSettings => "orga.change_settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Organizer,
    Reviewer,
    Viewer,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: ActorRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn has_permission(
        &self,
        actor: &Actor,
        event: &Event,
        permission: Permission,
    ) -> Result<bool, AppError>;

    /// Fail with `Forbidden` unless `actor` holds `permission` on `event`.
    async fn require(
        &self,
        actor: &Actor,
        event: &Event,
        permission: Permission,
    ) -> Result<(), AppError> {
        if self.has_permission(actor, event, permission).await? {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing permission {}",
                permission.as_str()
            )))
        }
    }
}

/// Grants permissions by role alone: organizers may do everything, reviewers
/// and viewers may only read.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

#[async_trait]
impl Authorizer for RoleAuthorizer {
    async fn has_permission(
        &self,
        actor: &Actor,
        _event: &Event,
        permission: Permission,
    ) -> Result<bool, AppError> {
        Ok(match (actor.role, permission) {
            (ActorRole::Organizer, _) => true,
            (ActorRole::Reviewer | ActorRole::Viewer, Permission::ViewSchedule) => true,
            (ActorRole::Reviewer | ActorRole::Viewer, Permission::ChangeSettings) => false,
        })
    }
}
