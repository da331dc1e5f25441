//! API constants

/// Prefix for every versionless API route.
pub const API_PREFIX: &str = "/api";

/// Where the OpenAPI document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Upper bound on page size for list endpoints.
pub const MAX_PAGE_LIMIT: i64 = 100;
