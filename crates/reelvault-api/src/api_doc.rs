//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reelvault_core::models;
use reelvault_core::validation;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelvault API",
        version = "0.1.0",
        description = "Signed upload credentials for direct-to-host video uploads, account registration and video records"
    ),
    paths(
        handlers::upload_auth::get_upload_auth,
        handlers::register::register,
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::health::health_check,
    ),
    components(schemas(
        models::UploadAuthResponse,
        models::AuthenticationParameters,
        models::RegisterRequest,
        models::RegisterResponse,
        models::AccountResponse,
        models::NewAsset,
        models::TransformationsInput,
        models::Transformations,
        models::Asset,
        validation::FieldViolation,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "uploads", description = "Upload credentials for the media host"),
        (name = "accounts", description = "Account registration"),
        (name = "videos", description = "Video metadata records"),
        (name = "health", description = "Health checks"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
