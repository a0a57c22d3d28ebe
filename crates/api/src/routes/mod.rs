pub mod health;
pub mod index;
pub mod metrics;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for paths with no registered route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("not found: {}", uri.path()))
}
