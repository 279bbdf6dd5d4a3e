use std::sync::{Mutex, MutexGuard};

use spendbook_accounting::{
    Account, AccountPatch, Expense, Ledger, LedgerSummary, NewAccount, NewExpense,
};
use spendbook_core::{AccountId, DomainError, ExpenseId};

use crate::app::errors::ApiError;

/// Application services shared by every handler.
///
/// One mutex guards the whole ledger: expense writes touch both the expense
/// collection and an account balance, and must look atomic to other requests.
#[derive(Debug)]
pub struct AppServices {
    ledger: Mutex<Ledger>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self::with_ledger(Ledger::new())
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, ApiError> {
        self.ledger
            .lock()
            .map_err(|_| ApiError::internal("ledger mutex poisoned"))
    }

    // -------------------------
    // Accounts
    // -------------------------

    /// All accounts plus the balance total, read under one lock.
    pub fn accounts_list(&self) -> Result<(Vec<Account>, f64), ApiError> {
        let ledger = self.lock()?;
        Ok((ledger.list_accounts(), ledger.total_balance()))
    }

    pub fn account_get(&self, id: AccountId) -> Result<Account, ApiError> {
        self.lock()?
            .get_account(id)
            .ok_or_else(|| ApiError::not_found("account not found"))
    }

    pub fn account_create(&self, new: NewAccount) -> Result<Account, ApiError> {
        let account = self.lock()?.create_account(new)?;
        tracing::info!(
            account_id = %account.id_typed(),
            name = account.name(),
            balance = account.balance(),
            "account created"
        );
        Ok(account)
    }

    pub fn account_update(&self, id: AccountId, patch: AccountPatch) -> Result<Account, ApiError> {
        let account = self.lock()?.update_account(id, patch)?;
        tracing::info!(account_id = %id, "account updated");
        Ok(account)
    }

    pub fn account_delete(&self, id: AccountId) -> Result<Account, ApiError> {
        let account = self.lock()?.delete_account(id).inspect_err(|e| {
            if let DomainError::InvariantViolation(msg) = e {
                tracing::warn!(account_id = %id, %msg, "account delete refused");
            }
        })?;
        tracing::info!(account_id = %id, "account deleted");
        Ok(account)
    }

    // -------------------------
    // Expenses
    // -------------------------

    /// All expenses plus their total, read under one lock.
    pub fn expenses_list(&self) -> Result<(Vec<Expense>, f64), ApiError> {
        let ledger = self.lock()?;
        Ok((ledger.list_expenses(), ledger.total_expenses()))
    }

    pub fn expenses_by_account(&self, account_id: AccountId) -> Result<(Vec<Expense>, f64), ApiError> {
        let ledger = self.lock()?;
        Ok((
            ledger.list_expenses_by_account(account_id),
            ledger.total_expenses_by_account(account_id),
        ))
    }

    pub fn expense_get(&self, id: ExpenseId) -> Result<Expense, ApiError> {
        self.lock()?
            .get_expense(id)
            .ok_or_else(|| ApiError::not_found("expense not found"))
    }

    /// Record an expense. An unknown account is a bad request here, not a 404:
    /// the missing record is referenced by the body, not addressed by the URL.
    pub fn expense_create(&self, new: NewExpense) -> Result<Expense, ApiError> {
        let expense = self.lock()?.create_expense(new).map_err(|e| match e {
            DomainError::NotFound(_) => ApiError::validation("account not found"),
            other => other.into(),
        })?;
        tracing::info!(
            expense_id = %expense.id_typed(),
            account_id = %expense.account_id(),
            amount = expense.amount(),
            "expense recorded"
        );
        Ok(expense)
    }

    pub fn expense_delete(&self, id: ExpenseId) -> Result<Expense, ApiError> {
        let expense = self
            .lock()?
            .delete_expense(id)
            .ok_or_else(|| ApiError::not_found("expense not found"))?;
        tracing::info!(
            expense_id = %id,
            account_id = %expense.account_id(),
            amount = expense.amount(),
            "expense deleted"
        );
        Ok(expense)
    }

    /// Remove every expense and refund each amount to its account.
    pub fn expenses_clear(&self) -> Result<usize, ApiError> {
        let cleared = self.lock()?.clear_expenses();
        tracing::info!(cleared, "expenses cleared");
        Ok(cleared)
    }

    pub fn summary(&self) -> Result<LedgerSummary, ApiError> {
        Ok(self.lock()?.summary())
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendbook_accounting::DEFAULT_ACCOUNT_ID;

    #[test]
    fn unknown_account_on_expense_create_is_a_bad_request() {
        let services = AppServices::in_memory();
        let err = services
            .expense_create(NewExpense {
                description: "Ghost".to_string(),
                amount: 1.0,
                account_id: AccountId::new(404),
            })
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(services.summary().unwrap().expense_count, 0);
    }

    #[test]
    fn delete_then_lookup_is_not_found() {
        let services = AppServices::in_memory();
        let e = services
            .expense_create(NewExpense {
                description: "Lunch".to_string(),
                amount: 12.0,
                account_id: DEFAULT_ACCOUNT_ID,
            })
            .unwrap();

        services.expense_delete(e.id_typed()).unwrap();
        let err = services.expense_get(e.id_typed()).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(services.accounts_list().unwrap().1, 0.0);
    }

    #[test]
    fn clearing_expenses_refunds_balances() {
        let services = AppServices::in_memory();
        for amount in [3.0, 4.5] {
            services
                .expense_create(NewExpense {
                    description: "Snack".to_string(),
                    amount,
                    account_id: DEFAULT_ACCOUNT_ID,
                })
                .unwrap();
        }

        assert_eq!(services.expenses_clear().unwrap(), 2);
        let summary = services.summary().unwrap();
        assert_eq!(summary.expense_count, 0);
        assert_eq!(summary.total_balance, 0.0);
    }

    fn poison(services: &AppServices) {
        let _guard = services.ledger.lock().unwrap();
        panic!("poison the ledger lock");
    }

    #[test]
    fn poisoned_lock_surfaces_as_internal_error() {
        let services = std::sync::Arc::new(AppServices::in_memory());
        let poisoner = services.clone();
        let _ = std::thread::spawn(move || poison(&poisoner)).join();

        let err = services.summary().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
