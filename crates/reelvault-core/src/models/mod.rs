//! Data models for the application
//!
//! Organized by domain: upload credentials and progress (shared by the issuer and
//! the upload client), asset records, and accounts.

mod account;
mod asset;
mod credential;
mod progress;

pub use account::*;
pub use asset::*;
pub use credential::*;
pub use progress::*;
