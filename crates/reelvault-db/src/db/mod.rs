//! Postgres-backed repositories
//!
//! Each repository asks the shared connection manager for the pool on every call,
//! so the first request after startup (or after a failed attempt) connects lazily.

pub mod account;
pub mod asset;

pub use account::AccountRepository;
pub use asset::AssetRepository;

/// Postgres SQLSTATE for `unique_violation`.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}
