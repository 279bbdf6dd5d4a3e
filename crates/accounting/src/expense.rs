use chrono::{DateTime, Utc};
use serde::Serialize;

use spendbook_core::{AccountId, DomainError, DomainResult, Entity, ExpenseId, IdSequence};

use crate::account::{Account, AccountStore};
use crate::repository::{InMemoryRepository, Repository};

/// An immutable record of money leaving one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: f64,
    account_id: AccountId,
    created_at: DateTime<Utc>,
}

impl Expense {
    pub fn id_typed(&self) -> ExpenseId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> ExpenseId {
        self.id
    }
}

/// Input for [`ExpenseStore::create_expense`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub account_id: AccountId,
}

/// Owns the expenses. Every operation that moves money borrows the
/// [`AccountStore`] so the debit/credit lands in the same call.
#[derive(Debug)]
pub struct ExpenseStore<R = InMemoryRepository<Expense>> {
    repo: R,
    ids: IdSequence<ExpenseId>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::with_repository(InMemoryRepository::new())
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ExpenseStore<R>
where
    R: Repository<Expense>,
{
    pub fn with_repository(repo: R) -> Self {
        let last = repo
            .iter()
            .map(|e| e.id.get())
            .max()
            .unwrap_or(0);
        Self {
            repo,
            ids: IdSequence::starting_after(last),
        }
    }

    /// Record an expense and debit its account.
    ///
    /// Validation and the account lookup happen before anything is written,
    /// so a failure leaves both stores untouched.
    pub fn create_expense<A>(
        &mut self,
        accounts: &mut AccountStore<A>,
        new: NewExpense,
    ) -> DomainResult<Expense>
    where
        A: Repository<Account>,
    {
        let description = new.description.trim();
        if description.is_empty() {
            return Err(DomainError::validation(
                "description must be a non-empty string",
            ));
        }
        if !new.amount.is_finite() || new.amount <= 0.0 {
            return Err(DomainError::validation("amount must be a positive number"));
        }
        if !accounts.contains(new.account_id) {
            return Err(DomainError::not_found("account"));
        }

        let expense = Expense {
            id: self.ids.next_id(),
            description: description.to_string(),
            amount: new.amount,
            account_id: new.account_id,
            created_at: Utc::now(),
        };
        self.repo.insert(expense.clone());
        accounts.adjust_balance(expense.account_id, -expense.amount);
        Ok(expense)
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<Expense> {
        self.repo.get(id)
    }

    /// All expenses in creation order.
    pub fn list_expenses(&self) -> Vec<Expense> {
        self.repo.list()
    }

    /// Expenses booked against `account_id`, in creation order.
    ///
    /// The account does not have to exist: expenses of a deleted account are
    /// still listed.
    pub fn list_expenses_by_account(&self, account_id: AccountId) -> Vec<Expense> {
        self.repo
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn total_expenses(&self) -> f64 {
        self.repo.iter().map(|e| e.amount).sum()
    }

    pub fn total_expenses_by_account(&self, account_id: AccountId) -> f64 {
        self.repo
            .iter()
            .filter(|e| e.account_id == account_id)
            .map(|e| e.amount)
            .sum()
    }

    /// Remove an expense and credit its amount back to the account.
    ///
    /// Returns `None` if no such expense exists. If the account has been
    /// deleted in the meantime the credit is dropped.
    pub fn delete_expense<A>(
        &mut self,
        accounts: &mut AccountStore<A>,
        id: ExpenseId,
    ) -> Option<Expense>
    where
        A: Repository<Account>,
    {
        let expense = self.repo.remove(id)?;
        accounts.adjust_balance(expense.account_id, expense.amount);
        Some(expense)
    }

    /// Remove every expense, crediting each amount back to its account.
    ///
    /// Returns the number of expenses removed. Credits for accounts that no
    /// longer exist are dropped, as in [`Self::delete_expense`].
    pub fn clear_expenses<A>(&mut self, accounts: &mut AccountStore<A>) -> usize
    where
        A: Repository<Account>,
    {
        let cleared = self.repo.clear();
        for expense in &cleared {
            accounts.adjust_balance(expense.account_id, expense.amount);
        }
        cleared.len()
    }

    pub fn len(&self) -> usize {
        self.repo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }
}
