use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use reelvault_core::models::{AccountResponse, RegisterRequest, RegisterResponse};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "accounts",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing fields or user already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "register"))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpAppError> {
    let account = state.accounts.register(request).await?;

    Ok(Json(RegisterResponse {
        message: "User created successfully".to_string(),
        user: AccountResponse::from(account),
    }))
}
