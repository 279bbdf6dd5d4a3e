use axum::{routing::get, Router};

pub mod accounts;
pub mod expenses;
pub mod system;

/// Router for the `/api` resource endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/summary", get(system::summary))
        .nest("/accounts", accounts::router())
        .nest("/expenses", expenses::router())
}
