use async_trait::async_trait;
use reelvault_core::models::{Account, NewAccount};
use reelvault_core::AppError;
use std::sync::Arc;

use super::is_unique_violation;
use crate::connection::PgConnectionManager;
use crate::traits::AccountStore;

/// Repository for registered accounts
#[derive(Clone)]
pub struct AccountRepository {
    connections: Arc<PgConnectionManager>,
}

impl AccountRepository {
    pub fn new(connections: Arc<PgConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let pool = self.connections.get().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&pool)
        .await?;

        Ok(account)
    }

    #[tracing::instrument(skip(self, account), fields(email = %account.email))]
    async fn insert(&self, account: NewAccount) -> Result<Account, AppError> {
        let pool = self.connections.get().await?;

        // The unique index on email settles registration races.
        let result = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&pool)
        .await;

        match result {
            Ok(stored) => Ok(stored),
            Err(err) if is_unique_violation(&err) => {
                Err(AppError::Conflict("User already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
