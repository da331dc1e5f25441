//! Reelvault Database Layer
//!
//! Connection management and the stores behind asset records and accounts.
//!
// Module declarations
pub mod connection;
pub mod db;
pub mod traits;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-exports
pub use connection::{
    ConnectionError, ConnectionManager, ConnectionState, ConnectionStatus, Connector,
    PgConnectionManager, PgConnector,
};
pub use db::{AccountRepository, AssetRepository};
pub use traits::{AccountStore, AssetStore};
