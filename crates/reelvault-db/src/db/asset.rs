use async_trait::async_trait;
use chrono::Utc;
use reelvault_core::models::{Asset, AssetDraft};
use reelvault_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::connection::PgConnectionManager;
use crate::traits::AssetStore;

const ASSET_COLUMNS: &str = "id, title, description, video_url, thumbnail_url, controls, \
     width, height, quality, created_at, updated_at";

/// Repository for video asset records
#[derive(Clone)]
pub struct AssetRepository {
    connections: Arc<PgConnectionManager>,
}

impl AssetRepository {
    pub fn new(connections: Arc<PgConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    async fn insert(&self, draft: AssetDraft) -> Result<Asset, AppError> {
        let pool = self.connections.get().await?;
        let asset = Asset::from_draft(draft, Utc::now());

        let query = format!(
            r#"
            INSERT INTO videos (
                id, title, description, video_url, thumbnail_url, controls,
                width, height, quality, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ASSET_COLUMNS
        );

        let stored = sqlx::query_as::<_, Asset>(&query)
            .bind(asset.id)
            .bind(&asset.title)
            .bind(&asset.description)
            .bind(&asset.video_url)
            .bind(&asset.thumbnail_url)
            .bind(asset.controls)
            .bind(asset.transformations.width)
            .bind(asset.transformations.height)
            .bind(asset.transformations.quality)
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .fetch_one(&pool)
            .await?;

        tracing::debug!(asset_id = %stored.id, "Video record created");
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        let pool = self.connections.get().await?;
        let query = format!("SELECT {} FROM videos WHERE id = $1", ASSET_COLUMNS);

        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await?;

        Ok(asset)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError> {
        let pool = self.connections.get().await?;
        let query = format!(
            "SELECT {} FROM videos ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            ASSET_COLUMNS
        );

        let assets = sqlx::query_as::<_, Asset>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&pool)
            .await?;

        Ok(assets)
    }
}
