//! Core types for the video link service.
//!
//! Holds the domain models, the video identifier extractor, import payload
//! parsing, permissions and the shared error type. Nothing in here touches
//! the network or the database.

pub mod config;
pub mod error;
pub mod extract;
pub mod import;
pub mod models;
pub mod permissions;
pub mod recording;

pub use config::{Config, LinkStoreBackend, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use extract::{extract_video_id, ExtractError, ExtractMode, MAX_VIDEO_ID_LENGTH};
pub use import::{parse_import_payload, FormatDetection, ImportError, ImportFormat, ImportRecord};
pub use permissions::{Actor, ActorRole, Authorizer, Permission, RoleAuthorizer};
pub use recording::{Recording, VideoRecordingProvider, PLAYER_CSP_SOURCE};
