//! Business logic behind the HTTP handlers.

pub mod accounts;
pub mod assets;
pub mod credentials;

pub use accounts::AccountService;
pub use assets::AssetService;
pub use credentials::{CredentialError, CredentialIssuer};
