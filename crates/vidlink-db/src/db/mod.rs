//! Database repositories for data access layer
//!
//! Each store is a trait with a Postgres implementation and an in-memory one.
//! The API holds them as `Arc<dyn ...>` so tests and the memory backend can
//! swap the database out.
//
// Video link store
pub mod links;
//
// Host events and talks (read-only)
pub mod talks;
//
// In-memory implementations
pub mod memory;
//
// Transaction utilities
pub mod transaction;

pub use links::{LinkRepository, PgLinkRepository};
pub use memory::{InMemoryLinkRepository, InMemoryTalkDirectory};
pub use talks::{PgTalkDirectory, TalkDirectory};
