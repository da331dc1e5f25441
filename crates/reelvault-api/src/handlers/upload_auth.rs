use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use reelvault_core::models::UploadAuthResponse;
use reelvault_core::AppError;
use std::sync::Arc;

/// Issue a signed, single-use credential for one direct upload to the media host.
#[utoipa::path(
    get,
    path = "/api/auth",
    tag = "uploads",
    responses(
        (status = 200, description = "Upload credential issued", body = UploadAuthResponse),
        (status = 500, description = "Upload authentication failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "issue_upload_credential"))]
pub async fn get_upload_auth(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let credential = state.credentials.issue().map_err(AppError::from)?;

    tracing::info!(expire = credential.expire(), "Upload credential issued");

    // Single-use: must not be cached.
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(UploadAuthResponse::from(credential)),
    ))
}
