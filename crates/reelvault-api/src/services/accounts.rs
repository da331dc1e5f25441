//! Account registration

use reelvault_core::models::{Account, NewAccount, RegisterRequest};
use reelvault_core::{AppError, FieldViolation, ValidationError};
use reelvault_db::AccountStore;
use std::sync::Arc;

use crate::auth::hash_password;

const USER_EXISTS: &str = "User already exists";

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Validate, reject duplicates, hash, persist.
    ///
    /// The store's unique constraint still catches a duplicate that races past the lookup.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        let (email, password) = validate_registration(request)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(USER_EXISTS.to_string()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let account = self
            .store
            .insert(NewAccount {
                email,
                password_hash,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }
}

/// Both fields present and non-blank. Emails are trimmed and lowercased; passwords are kept as sent.
fn validate_registration(request: RegisterRequest) -> Result<(String, String), ValidationError> {
    let email = request
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let password = request.password.filter(|p| !p.trim().is_empty());

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        (email, password) => {
            let mut fields = Vec::new();
            if email.is_none() {
                fields.push(FieldViolation::new("email", "email is required"));
            }
            if password.is_none() {
                fields.push(FieldViolation::new("password", "password is required"));
            }
            Err(ValidationError::new(fields))
        }
    }
}
