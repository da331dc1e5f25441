//! HTTP client for the Reelvault API.
//!
//! Fetches upload credentials, registers accounts and records videos. Uploads go
//! straight to the media host through [`upload::Uploader`]; [`ApiClient::publish_video`]
//! runs the whole credential, upload and record sequence.

pub mod upload;

use anyhow::{Context, Result};
use reelvault_core::models::{
    Asset, NewAsset, RegisterResponse, TransformationsInput, UploadAuthResponse, UploadCredential,
    UploadProgress,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub use upload::{UploadError, UploadErrorKind, UploadFile, UploadResult, Uploader};

pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// API prefix shared by every route except health.
pub const API_PREFIX: &str = "/api";

/// Descriptive fields for a video; the URLs come from the upload.
#[derive(Debug, Clone, Default)]
pub struct VideoDetails {
    pub title: String,
    pub description: Option<String>,
    pub controls: Option<bool>,
    pub transformations: Option<TransformationsInput>,
}

impl VideoDetails {
    fn into_new_asset(self, uploaded: &UploadResult) -> NewAsset {
        NewAsset {
            title: self.title,
            description: self.description,
            video_url: uploaded.url.clone(),
            thumbnail_url: uploaded.thumbnail_or_default(),
            controls: self.controls,
            transformations: self.transformations,
        }
    }
}

/// HTTP client for the Reelvault API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        // No overall timeout: large uploads share this client.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create client from environment: REELVAULT_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("REELVAULT_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Underlying reqwest client, for building an [`Uploader`] that shares its pool.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        read_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.build_url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;
        read_json(response).await
    }

    /// Ask the server for a fresh single-use upload credential.
    pub async fn fetch_upload_credential(&self) -> Result<UploadCredential, UploadError> {
        let url = self.build_url(&format!("{}/auth", API_PREFIX));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UploadError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Auth(format!("Server error: {}", status.as_u16())));
        }

        let body: UploadAuthResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Auth(format!("unreadable credential response: {}", e)))?;
        UploadCredential::try_from(body).map_err(UploadError::Auth)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post_json(&format!("{}/register", API_PREFIX), &body)
            .await
    }

    pub async fn create_video(&self, fields: &NewAsset) -> Result<Asset> {
        self.post_json(&format!("{}/videos", API_PREFIX), fields)
            .await
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Asset> {
        self.get(&format!("{}/videos/{}", API_PREFIX, id), &[])
            .await
    }

    pub async fn list_videos(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Asset>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        self.get(&format!("{}/videos", API_PREFIX), &query).await
    }

    /// Fetch a credential, upload `file`, then record the video.
    ///
    /// Upload failures come back as [`UploadError`] inside the `anyhow::Error`, so callers
    /// can `downcast_ref` for the kind. Nothing is recorded unless the upload succeeds.
    pub async fn publish_video<F>(
        &self,
        uploader: &Uploader,
        file: UploadFile,
        details: VideoDetails,
        on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<Asset>
    where
        F: FnMut(UploadProgress),
    {
        if file.is_empty() {
            return Err(UploadError::InvalidRequest {
                status: None,
                message: "Please select a video file.".to_string(),
            }
            .into());
        }

        let credential = self.fetch_upload_credential().await?;
        let uploaded = uploader
            .start_upload(file, credential, on_progress, cancel)
            .await?;

        let asset = self
            .create_video(&details.into_new_asset(&uploaded))
            .await
            .context("Upload succeeded but recording the video failed")?;

        tracing::info!(asset_id = %asset.id, url = %asset.video_url, "Video published");
        Ok(asset)
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "API request failed with status {}: {}",
            status,
            error_text
        ));
    }

    response
        .json()
        .await
        .context("Failed to parse response as JSON")
}
