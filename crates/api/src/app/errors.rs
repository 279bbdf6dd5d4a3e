use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use spendbook_core::{AccountId, DomainError, ExpenseId};

use crate::app::dto::ApiResponse;

/// Error surfaced to HTTP clients.
///
/// Every variant renders as the standard envelope with `success: false`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing or out-of-range input (400).
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    /// Unknown id on a direct lookup (404).
    #[error("{0}")]
    NotFound(String),

    /// Known path, unsupported method (405).
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Anything else (500). The detail is logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "validation_error",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::validation(msg),
            DomainError::InvalidId(msg) => ApiError::BadRequest {
                code: "invalid_id",
                message: msg,
            },
            DomainError::InvariantViolation(msg) => ApiError::BadRequest {
                code: "invariant_violation",
                message: msg,
            },
            err @ DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::BadRequest { code, message } => (code, message),
            ApiError::NotFound(message) => ("not_found", message),
            ApiError::MethodNotAllowed(message) => ("method_not_allowed", message),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed with internal error");
                ("internal_error", "internal server error".to_string())
            }
        };
        json_error(status, code, message)
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (status, axum::Json(ApiResponse::<()>::failure(code, message))).into_response()
}

pub fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    raw.parse().map_err(|_| ApiError::BadRequest {
        code: "invalid_id",
        message: "invalid account id".to_string(),
    })
}

pub fn parse_expense_id(raw: &str) -> Result<ExpenseId, ApiError> {
    raw.parse().map_err(|_| ApiError::BadRequest {
        code: "invalid_id",
        message: "invalid expense id".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_http_statuses() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_id("x"), StatusCode::BAD_REQUEST),
            (DomainError::invariant("x"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("account"), StatusCode::NOT_FOUND),
        ];
        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status(), status);
        }
    }

    #[test]
    fn id_parsing_rejects_non_numeric_and_zero() {
        assert!(parse_account_id("abc").is_err());
        assert!(parse_expense_id("0").is_err());
        assert_eq!(parse_account_id("3").unwrap(), AccountId::new(3));
    }

    #[test]
    fn method_not_allowed_is_405() {
        let err = ApiError::MethodNotAllowed("method PATCH not allowed on /api/summary".into());
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.into_response().status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn internal_error_hides_detail() {
        let resp = ApiError::internal("lock poisoned").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
