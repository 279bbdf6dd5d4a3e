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
        .route(
            "/",
            get(list_expenses)
                .post(create_expense)
                .delete(clear_expenses),
        )
        .route("/account/:account_id", get(list_expenses_by_account))
        .route("/:id", get(get_expense).delete(delete_expense))
}

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let (expenses, total) = services.expenses_list()?;
    Ok(Json(ApiResponse::ok(expenses).with_total(total)).into_response())
}

pub async fn list_expenses_by_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(account_id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let account_id = errors::parse_account_id(&account_id)?;
    let (expenses, total) = services.expenses_by_account(account_id)?;
    Ok(Json(ApiResponse::ok(expenses).with_total(total)).into_response())
}

pub async fn get_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = errors::parse_expense_id(&id)?;
    let expense = services.expense_get(id)?;
    Ok(Json(ApiResponse::ok(expense)).into_response())
}

pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateExpenseRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Json(body) = body?;
    let expense = services.expense_create(body.into_new_expense()?)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(expense).with_message("expense created successfully")),
    )
        .into_response())
}

pub async fn delete_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = errors::parse_expense_id(&id)?;
    services.expense_delete(id)?;
    Ok(Json(ApiResponse::done("expense deleted successfully")).into_response())
}

pub async fn clear_expenses(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let cleared = services.expenses_clear()?;
    Ok(Json(
        ApiResponse::ok(dto::ClearedExpenses { cleared })
            .with_message("all expenses cleared successfully"),
    )
    .into_response())
}
