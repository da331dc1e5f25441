//! Store traits
//!
//! Handlers and services depend on these instead of the concrete Postgres
//! repositories, so they can run against in-memory stores in tests.

use async_trait::async_trait;
use reelvault_core::models::{Account, Asset, AssetDraft, NewAccount};
use reelvault_core::AppError;
use uuid::Uuid;

/// Persistence for video asset records.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a prepared draft, assigning id and timestamps.
    async fn insert(&self, draft: AssetDraft) -> Result<Asset, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, AppError>;

    /// Newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError>;
}

/// Persistence for registered accounts. Emails are unique.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, account: NewAccount) -> Result<Account, AppError>;
}
