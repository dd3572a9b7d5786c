//! Token authentication.
//!
//! Requests carry a static bearer token from configuration. The middleware
//! turns it into a [`CurrentActor`]; permission checks happen per event in
//! the handlers through the configured `Authorizer`.

pub mod middleware;
pub mod models;
pub mod tokens;

pub use middleware::{auth_middleware, AuthState};
pub use models::CurrentActor;
pub use tokens::TokenRegistry;
