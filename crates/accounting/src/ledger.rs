use serde::Serialize;

use spendbook_core::{AccountId, DomainResult, ExpenseId};

use crate::account::{Account, AccountPatch, AccountStore, NewAccount};
use crate::expense::{Expense, ExpenseStore, NewExpense};
use crate::repository::{InMemoryRepository, Repository};

/// Aggregate totals across the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_expenses: f64,
    pub total_balance: f64,
    pub account_count: usize,
    pub expense_count: usize,
}

/// Account and expense stores kept in step.
///
/// Holding both behind one owner means a caller that serialises access to the
/// `Ledger` (one mutex, one actor) gets the debit/credit and the expense
/// write as a single step.
#[derive(Debug)]
pub struct Ledger<A = InMemoryRepository<Account>, E = InMemoryRepository<Expense>> {
    accounts: AccountStore<A>,
    expenses: ExpenseStore<E>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: AccountStore::new(),
            expenses: ExpenseStore::new(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, E> Ledger<A, E>
where
    A: Repository<Account>,
    E: Repository<Expense>,
{
    pub fn from_stores(accounts: AccountStore<A>, expenses: ExpenseStore<E>) -> Self {
        Self { accounts, expenses }
    }

    pub fn accounts(&self) -> &AccountStore<A> {
        &self.accounts
    }

    pub fn expenses(&self) -> &ExpenseStore<E> {
        &self.expenses
    }

    // -------------------------
    // Accounts
    // -------------------------

    pub fn create_account(&mut self, new: NewAccount) -> DomainResult<Account> {
        self.accounts.create_account(new)
    }

    pub fn get_account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get_account(id)
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.list_accounts()
    }

    pub fn update_account(&mut self, id: AccountId, patch: AccountPatch) -> DomainResult<Account> {
        self.accounts.update_account(id, patch)
    }

    pub fn delete_account(&mut self, id: AccountId) -> DomainResult<Account> {
        self.accounts.delete_account(id)
    }

    pub fn total_balance(&self) -> f64 {
        self.accounts.total_balance()
    }

    // -------------------------
    // Expenses
    // -------------------------

    pub fn create_expense(&mut self, new: NewExpense) -> DomainResult<Expense> {
        self.expenses.create_expense(&mut self.accounts, new)
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<Expense> {
        self.expenses.get_expense(id)
    }

    pub fn list_expenses(&self) -> Vec<Expense> {
        self.expenses.list_expenses()
    }

    pub fn list_expenses_by_account(&self, account_id: AccountId) -> Vec<Expense> {
        self.expenses.list_expenses_by_account(account_id)
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.total_expenses()
    }

    pub fn total_expenses_by_account(&self, account_id: AccountId) -> f64 {
        self.expenses.total_expenses_by_account(account_id)
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        self.expenses.delete_expense(&mut self.accounts, id)
    }

    pub fn clear_expenses(&mut self) -> usize {
        self.expenses.clear_expenses(&mut self.accounts)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            total_expenses: self.expenses.total_expenses(),
            total_balance: self.accounts.total_balance(),
            account_count: self.accounts.len(),
            expense_count: self.expenses.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::DEFAULT_ACCOUNT_ID;
    use proptest::prelude::*;
    use spendbook_core::DomainError;

    fn expense(description: &str, amount: f64, account_id: AccountId) -> NewExpense {
        NewExpense {
            description: description.to_string(),
            amount,
            account_id,
        }
    }

    #[test]
    fn fresh_ledger_has_only_the_default_account() {
        let ledger = Ledger::new();
        let summary = ledger.summary();

        assert_eq!(summary.account_count, 1);
        assert_eq!(summary.expense_count, 0);
        assert_eq!(summary.total_balance, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert!(ledger.get_account(DEFAULT_ACCOUNT_ID).is_some());
    }

    #[test]
    fn default_account_survives_any_history() {
        let mut ledger = Ledger::new();
        let other = ledger.create_account(NewAccount::named("Other")).unwrap();
        ledger
            .create_expense(expense("x", 5.0, DEFAULT_ACCOUNT_ID))
            .unwrap();
        ledger.delete_account(other.id_typed()).unwrap();

        let err = ledger.delete_account(DEFAULT_ACCOUNT_ID).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(ledger.get_account(DEFAULT_ACCOUNT_ID).unwrap().balance(), -5.0);
    }

    #[test]
    fn summary_tracks_totals() {
        let mut ledger = Ledger::new();
        let savings = ledger
            .create_account(NewAccount {
                initial_balance: Some(100.0),
                ..NewAccount::named("Savings")
            })
            .unwrap();
        ledger
            .create_expense(expense("Books", 25.0, savings.id_typed()))
            .unwrap();

        assert_eq!(
            ledger.summary(),
            LedgerSummary {
                total_expenses: 25.0,
                total_balance: 75.0,
                account_count: 2,
                expense_count: 1,
            }
        );
        assert_eq!(ledger.total_expenses_by_account(savings.id_typed()), 25.0);
        assert_eq!(ledger.list_expenses_by_account(savings.id_typed()).len(), 1);
    }

    #[test]
    fn clearing_restores_initial_balances() {
        let mut ledger = Ledger::new();
        let savings = ledger
            .create_account(NewAccount {
                initial_balance: Some(100.0),
                ..NewAccount::named("Savings")
            })
            .unwrap();
        ledger
            .create_expense(expense("Books", 25.0, savings.id_typed()))
            .unwrap();
        ledger
            .create_expense(expense("Tea", 2.5, DEFAULT_ACCOUNT_ID))
            .unwrap();

        assert_eq!(ledger.clear_expenses(), 2);
        assert_eq!(
            ledger.summary(),
            LedgerSummary {
                total_expenses: 0.0,
                total_balance: 100.0,
                account_count: 2,
                expense_count: 0,
            }
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        CreateAccount(u32),
        CreateExpense { cents: u32, account_pick: usize },
        DeleteExpense { pick: usize },
        ClearExpenses,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0u32..100_000).prop_map(Op::CreateAccount),
            4 => (1u32..50_000, 0usize..8).prop_map(|(cents, account_pick)| Op::CreateExpense {
                cents,
                account_pick
            }),
            3 => (0usize..8).prop_map(|pick| Op::DeleteExpense { pick }),
            1 => Just(Op::ClearExpenses),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after every step, total balance equals the sum of initial
        /// balances minus the live expense total.
        #[test]
        fn total_balance_matches_initial_minus_expenses(ops in prop::collection::vec(op(), 1..40)) {
            let mut ledger = Ledger::new();
            let mut initial_total = 0.0_f64;
            let mut last_expense_id = 0u64;

            for op in ops {
                match op {
                    Op::CreateAccount(cents) => {
                        let initial = f64::from(cents) / 100.0;
                        ledger
                            .create_account(NewAccount {
                                initial_balance: Some(initial),
                                ..NewAccount::named("acct")
                            })
                            .unwrap();
                        initial_total += initial;
                    }
                    Op::CreateExpense { cents, account_pick } => {
                        let accounts = ledger.list_accounts();
                        let target = accounts[account_pick % accounts.len()].id_typed();
                        let created = ledger
                            .create_expense(expense("e", f64::from(cents) / 100.0, target))
                            .unwrap();
                        prop_assert!(created.id_typed().get() > last_expense_id);
                        last_expense_id = created.id_typed().get();
                    }
                    Op::DeleteExpense { pick } => {
                        let live = ledger.list_expenses();
                        if !live.is_empty() {
                            let id = live[pick % live.len()].id_typed();
                            prop_assert!(ledger.delete_expense(id).is_some());
                            prop_assert!(ledger.delete_expense(id).is_none());
                        }
                    }
                    Op::ClearExpenses => {
                        let live = ledger.list_expenses().len();
                        prop_assert_eq!(ledger.clear_expenses(), live);
                        prop_assert_eq!(ledger.summary().expense_count, 0);
                    }
                }

                let expected = initial_total - ledger.total_expenses();
                prop_assert!((ledger.total_balance() - expected).abs() < 1e-6);
            }
        }
    }
}
