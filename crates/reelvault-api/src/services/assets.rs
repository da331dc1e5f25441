//! Video asset records

use reelvault_core::models::{Asset, NewAsset};
use reelvault_core::AppError;
use reelvault_db::AssetStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AssetService {
    store: Arc<dyn AssetStore>,
}

impl AssetService {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Validate every field, apply defaults, then persist. Nothing is written on a validation failure.
    pub async fn create_record(&self, fields: NewAsset) -> Result<Asset, AppError> {
        let draft = fields.prepare()?;
        let asset = self.store.insert(draft).await?;
        tracing::info!(asset_id = %asset.id, "Video record created");
        Ok(asset)
    }

    pub async fn get_record(&self, id: Uuid) -> Result<Asset, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Newest first.
    pub async fn list_records(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError> {
        self.store.list(limit, offset).await
    }
}
