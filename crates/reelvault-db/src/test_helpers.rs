//! In-memory stores for testing
//!
//! These mirror the Postgres repositories closely enough to exercise handlers and
//! services without a database.

use async_trait::async_trait;
use chrono::Utc;
use reelvault_core::models::{Account, Asset, AssetDraft, NewAccount};
use reelvault_core::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::connection::{ConnectionState, ConnectionStatus};
use crate::traits::{AccountStore, AssetStore};

/// Asset store backed by a map
#[derive(Clone, Default)]
pub struct InMemoryAssetStore {
    assets: Arc<Mutex<HashMap<Uuid, Asset>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn insert(&self, draft: AssetDraft) -> Result<Asset, AppError> {
        let asset = Asset::from_draft(draft, Utc::now());
        self.assets
            .lock()
            .unwrap()
            .insert(asset.id, asset.clone());
        Ok(asset)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        Ok(self.assets.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError> {
        let mut assets: Vec<Asset> = self.assets.lock().unwrap().values().cloned().collect();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(assets
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

/// Account store backed by a map keyed on email
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored hash for `email`, so tests can check what was persisted.
    pub fn password_hash(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.password_hash.clone())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.lock().unwrap().get(email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        let now = Utc::now();
        let stored = Account {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(stored.email.clone(), stored.clone());
        Ok(stored)
    }
}

/// Connection status that always reports the given state.
#[derive(Debug, Clone, Copy)]
pub struct FixedConnectionStatus(pub ConnectionState);

impl ConnectionStatus for FixedConnectionStatus {
    fn connection_state(&self) -> ConnectionState {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::models::Transformations;

    fn draft(title: &str) -> AssetDraft {
        AssetDraft {
            title: title.to_string(),
            description: None,
            video_url: "https://media.example.com/v.mp4".to_string(),
            thumbnail_url: "https://media.example.com/v.jpg".to_string(),
            controls: true,
            transformations: Transformations::default(),
        }
    }

    #[tokio::test]
    async fn test_asset_insert_and_get() {
        let store = InMemoryAssetStore::new();
        let asset = store.insert(draft("first")).await.unwrap();
        assert_eq!(asset.created_at, asset.updated_at);

        let fetched = store.get(asset.id).await.unwrap().unwrap();
        assert_eq!(fetched, asset);
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_asset_list_paginates() {
        let store = InMemoryAssetStore::new();
        for i in 0..3 {
            store.insert(draft(&format!("clip {}", i))).await.unwrap();
        }
        assert_eq!(store.list(2, 0).await.unwrap().len(), 2);
        assert_eq!(store.list(2, 2).await.unwrap().len(), 1);
        assert!(store.list(10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryAccountStore::new();
        let account = NewAccount {
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        store.insert(account.clone()).await.unwrap();
        let err = store.insert(account).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "User already exists"));
        assert_eq!(store.len(), 1);
    }
}
