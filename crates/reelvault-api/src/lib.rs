//! Reelvault API Library
//!
//! HTTP handlers, services and application setup for the upload credential
//! issuer, account registration and video record endpoints.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
