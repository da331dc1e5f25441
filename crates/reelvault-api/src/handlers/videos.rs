use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reelvault_core::models::{Asset, NewAsset};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListVideosQuery {
    /// Page size (default 50, max 100)
    pub limit: Option<i64>,
    /// Records to skip (default 0)
    pub offset: Option<i64>,
}

/// Record a video that finished uploading to the media host.
#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = NewAsset,
    responses(
        (status = 201, description = "Video record created", body = Asset),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, new_asset), fields(operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(new_asset): ValidatedJson<NewAsset>,
) -> Result<impl IntoResponse, HttpAppError> {
    let asset = state.assets.create_record(new_asset).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    params(ListVideosQuery),
    responses(
        (status = 200, description = "Video records, newest first", body = Vec<Asset>),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListVideosQuery>,
) -> Result<Json<Vec<Asset>>, HttpAppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let assets = state.assets.list_records(limit, offset).await?;
    Ok(Json(assets))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video record ID")),
    responses(
        (status = 200, description = "Video record", body = Asset),
        (status = 400, description = "Malformed video ID", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<Asset>, HttpAppError> {
    let asset = state.assets.get_record(id).await?;
    Ok(Json(asset))
}
