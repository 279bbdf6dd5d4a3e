use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto::{self, ApiResponse};
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
}

pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let (accounts, total_balance) = services.accounts_list()?;
    Ok(Json(ApiResponse::ok(accounts).with_total_balance(total_balance)).into_response())
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = errors::parse_account_id(&id)?;
    let account = services.account_get(id)?;
    Ok(Json(ApiResponse::ok(account)).into_response())
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateAccountRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Json(body) = body?;
    let account = services.account_create(body.into_new_account()?)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(account).with_message("account created successfully")),
    )
        .into_response())
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateAccountRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let id = errors::parse_account_id(&id)?;
    let Json(body) = body?;
    let account = services.account_update(id, body.into_patch()?)?;
    Ok(Json(ApiResponse::ok(account).with_message("account updated successfully")).into_response())
}

pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = errors::parse_account_id(&id)?;
    services.account_delete(id)?;
    Ok(Json(ApiResponse::done("account deleted successfully")).into_response())
}
