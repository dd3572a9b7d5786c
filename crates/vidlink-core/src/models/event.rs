use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use uuid::Uuid;

/// A conference event, owned by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    /// Whether a current schedule has been released.
    pub has_schedule: bool,
}

/// An accepted talk ("submission") of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Talk {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Public talk code, unique within the event.
    pub code: String,
    pub title: String,
    /// Whether the talk appears in the current schedule.
    pub scheduled: bool,
}
