use serde::{Deserialize, Serialize};

use spendbook_accounting::{AccountPatch, DEFAULT_ACCOUNT_ID, NewAccount, NewExpense};
use spendbook_core::AccountId;

use crate::app::errors::ApiError;

// -------------------------
// Response envelope
// -------------------------

/// JSON envelope shared by every endpoint.
///
/// Absent fields are omitted rather than serialized as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            data: None,
            total: None,
            total_balance: None,
            message: None,
            error: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_total_balance(mut self, total_balance: f64) -> Self {
        self.total_balance = Some(total_balance);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload (e.g. deletes).
    pub fn done(message: impl Into<String>) -> Self {
        Self::empty(true).with_message(message)
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: Some(code.to_string()),
            ..Self::empty(false).with_message(message)
        }
    }
}

/// Payload of `DELETE /api/expenses`.
#[derive(Debug, Serialize)]
pub struct ClearedExpenses {
    pub cleared: usize,
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub description: Option<String>,
    pub initial_balance: Option<f64>,
}

impl CreateAccountRequest {
    pub fn into_new_account(self) -> Result<NewAccount, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation(
                "account name is required and must be a non-empty string",
            ));
        }
        if let Some(balance) = self.initial_balance {
            if !balance.is_finite() || balance < 0.0 {
                return Err(ApiError::validation(
                    "initial balance must be a non-negative number",
                ));
            }
        }
        Ok(NewAccount {
            name: self.name,
            description: self.description,
            initial_balance: self.initial_balance,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateAccountRequest {
    pub fn into_patch(self) -> Result<AccountPatch, ApiError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ApiError::validation("account name must be a non-empty string"));
            }
        }
        Ok(AccountPatch {
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount: f64,
    /// Expenses without an account land on the default account.
    pub account_id: Option<AccountId>,
}

impl CreateExpenseRequest {
    pub fn into_new_expense(self) -> Result<NewExpense, ApiError> {
        if self.description.trim().is_empty() {
            return Err(ApiError::validation(
                "description is required and must be a non-empty string",
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ApiError::validation(
                "amount is required and must be a positive number",
            ));
        }
        Ok(NewExpense {
            description: self.description,
            amount: self.amount,
            account_id: self.account_id.unwrap_or(DEFAULT_ACCOUNT_ID),
        })
    }
}
