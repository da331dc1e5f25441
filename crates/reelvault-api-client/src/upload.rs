//! Direct uploads to the media host.
//!
//! The file is streamed as the `file` part of a multipart POST together with the signed
//! credential fields. Progress is reported as the transport pulls chunks, and the request
//! can be abandoned through a [`CancellationToken`].

use bytes::Bytes;
use futures::Stream;
use reelvault_core::models::{UploadCredential, UploadProgress};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// ImageKit-compatible upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

const CHUNK_SIZE: usize = 64 * 1024;

const NO_FILE_MESSAGE: &str = "Please select a video file.";

/// A file held in memory, ready to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk; the upload keeps its base name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();
        Ok(Self::new(name, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the host reports for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl UploadResult {
    /// Host-provided thumbnail, or the host's derived-thumbnail path for the video.
    pub fn thumbnail_or_default(&self) -> String {
        self.thumbnail_url
            .clone()
            .unwrap_or_else(|| format!("{}/ik-thumbnail.jpg", self.url.trim_end_matches('/')))
    }
}

/// Host response before checking for `url`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostResponse {
    url: Option<String>,
    thumbnail_url: Option<String>,
    file_id: Option<String>,
    name: Option<String>,
}

/// Error body the host sends with 4xx/5xx.
#[derive(Debug, Deserialize)]
struct HostError {
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    Auth,
    InvalidRequest,
    Network,
    Server,
    Aborted,
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Credential missing, expired, or could not be fetched.
    #[error("upload authentication failed: {0}")]
    Auth(String),

    /// The host refused the request (4xx), or a local precondition failed (`status` is `None`).
    #[error("upload rejected: {message}")]
    InvalidRequest {
        status: Option<u16>,
        message: String,
    },

    /// No response from the host.
    #[error("network error during upload: {0}")]
    Network(#[source] reqwest::Error),

    #[error("media host error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("upload aborted")]
    Aborted,

    #[error("unexpected upload failure: {0}")]
    Unknown(String),
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::Auth(_) => UploadErrorKind::Auth,
            UploadError::InvalidRequest { .. } => UploadErrorKind::InvalidRequest,
            UploadError::Network(_) => UploadErrorKind::Network,
            UploadError::Server { .. } => UploadErrorKind::Server,
            UploadError::Aborted => UploadErrorKind::Aborted,
            UploadError::Unknown(_) => UploadErrorKind::Unknown,
        }
    }

    /// Network and host-side failures may succeed on a later attempt with a fresh credential.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::Network(_) | UploadError::Server { .. })
    }

    /// Message to show the person who started the upload.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Auth(detail) => format!("Auth failed: {}", detail),
            UploadError::InvalidRequest { status: None, message } => message.clone(),
            UploadError::InvalidRequest { .. } => "Invalid request.".to_string(),
            UploadError::Network(_) => "Network error.".to_string(),
            UploadError::Server { .. } => "Server error.".to_string(),
            UploadError::Aborted => "Upload aborted.".to_string(),
            UploadError::Unknown(_) => "Unexpected error.".to_string(),
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_decode() {
            UploadError::Unknown(err.to_string())
        } else {
            UploadError::Network(err)
        }
    }
}

/// Uploads files straight to the media host.
#[derive(Clone, Debug)]
pub struct Uploader {
    client: Client,
    upload_url: String,
}

impl Uploader {
    pub fn new(client: Client, upload_url: impl Into<String>) -> Self {
        Self {
            client,
            upload_url: upload_url.into(),
        }
    }

    /// Upload URL from `MEDIA_HOST_UPLOAD_URL`, falling back to [`DEFAULT_UPLOAD_URL`].
    pub fn from_env(client: Client) -> Self {
        let upload_url = std::env::var("MEDIA_HOST_UPLOAD_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string());
        Self::new(client, upload_url)
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Upload `file` using `credential`, which this call consumes.
    ///
    /// `on_progress` sees non-decreasing byte counts and, on success, a final 100%.
    /// Once `cancel` fires the request is dropped and no further progress is reported.
    pub async fn start_upload<F>(
        &self,
        file: UploadFile,
        credential: UploadCredential,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<UploadResult, UploadError>
    where
        F: FnMut(UploadProgress),
    {
        if file.is_empty() {
            return Err(UploadError::InvalidRequest {
                status: None,
                message: NO_FILE_MESSAGE.to_string(),
            });
        }
        if credential.is_expired() {
            return Err(UploadError::Auth("upload credential has expired".to_string()));
        }
        if cancel.is_cancelled() {
            return Err(UploadError::Aborted);
        }

        let total = file.len() as u64;
        let (progress_tx, mut progress_rx) = watch::channel(0u64);
        let form = upload_form(&file, credential, progress_tx);

        tracing::info!(file_name = %file.name, bytes = total, "Starting upload");

        let request = self.client.post(&self.upload_url).multipart(form).send();
        tokio::pin!(request);

        let mut reported = 0u64;
        let mut progress_open = true;
        let sent = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(file_name = %file.name, bytes_sent = reported, "Upload aborted");
                    return Err(UploadError::Aborted);
                }
                changed = progress_rx.changed(), if progress_open => {
                    if changed.is_err() {
                        // Body stream finished and dropped its sender.
                        progress_open = false;
                        continue;
                    }
                    let bytes_sent = *progress_rx.borrow_and_update();
                    if bytes_sent > reported {
                        reported = bytes_sent;
                        on_progress(UploadProgress::new(bytes_sent, total));
                    }
                }
                result = &mut request => break result,
            }
        };

        let response = sent.map_err(UploadError::from_transport)?;
        let status = response.status();
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UploadError::Aborted),
            body = response.text() => body.map_err(|e| unreadable_body(status, &e.to_string()))?,
        };

        let result = classify_response(status, &body)?;
        if reported < total {
            on_progress(UploadProgress::new(total, total));
        }

        tracing::info!(file_name = %file.name, url = %result.url, "Upload complete");
        Ok(result)
    }
}

fn upload_form(file: &UploadFile, credential: UploadCredential, progress: watch::Sender<u64>) -> Form {
    let expire = credential.expire().to_string();
    let body = Body::wrap_stream(chunk_stream(file.data.clone(), progress));
    let part = Part::stream_with_length(body, file.len() as u64).file_name(file.name.clone());

    Form::new()
        .part("file", part)
        .text("fileName", file.name.clone())
        .text("publicKey", credential.public_key)
        .text("signature", credential.signature)
        .text("token", credential.token)
        .text("expire", expire)
}

/// Yield `data` in fixed-size chunks, publishing the running total as each chunk is pulled.
fn chunk_stream(
    data: Bytes,
    progress: watch::Sender<u64>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    futures::stream::unfold(
        (data, 0usize, progress),
        |(data, offset, progress)| async move {
            if offset >= data.len() {
                return None;
            }
            let end = (offset + CHUNK_SIZE).min(data.len());
            let chunk = data.slice(offset..end);
            progress.send_replace(end as u64);
            Some((Ok(chunk), (data, end, progress)))
        },
    )
}

/// The host answered, so a failed body read is not a network error.
fn unreadable_body(status: StatusCode, detail: &str) -> UploadError {
    tracing::warn!(status = status.as_u16(), error = %detail, "Failed to read upload response body");
    if status.is_server_error() {
        UploadError::Server {
            status: status.as_u16(),
            message: format!("unreadable response body: {}", detail),
        }
    } else {
        UploadError::Unknown(format!(
            "status {} with unreadable response body: {}",
            status, detail
        ))
    }
}

fn classify_response(status: StatusCode, body: &str) -> Result<UploadResult, UploadError> {
    if status.is_success() {
        let parsed: HostResponse = serde_json::from_str(body)
            .map_err(|e| UploadError::Unknown(format!("unreadable upload response: {}", e)))?;
        let url = parsed
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| UploadError::Unknown("upload response did not include a url".to_string()))?;
        return Ok(UploadResult {
            url,
            thumbnail_url: parsed.thumbnail_url,
            file_id: parsed.file_id,
            name: parsed.name,
        });
    }

    let message = serde_json::from_str::<HostError>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), message = %message, "Upload rejected by host");
        Err(UploadError::InvalidRequest {
            status: Some(status.as_u16()),
            message,
        })
    } else if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), message = %message, "Media host error");
        Err(UploadError::Server {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(UploadError::Unknown(format!(
            "unexpected status {}: {}",
            status, message
        )))
    }
}
