use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{Method, Uri},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::app::dto::ApiResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "message": "spendbook backend is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Aggregate totals (expense total, balance total, record counts).
pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let summary = services.summary()?;
    Ok(Json(ApiResponse::ok(summary)).into_response())
}

pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("route {method} {} not found", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("method {method} not allowed on {}", uri.path()))
}
