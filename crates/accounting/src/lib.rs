//! Accounting module (accounts, expenses, balance bookkeeping).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod expense;
pub mod ledger;
pub mod repository;

pub use account::{Account, AccountPatch, AccountStore, DEFAULT_ACCOUNT_ID, NewAccount};
pub use expense::{Expense, ExpenseStore, NewExpense};
pub use ledger::{Ledger, LedgerSummary};
pub use repository::{InMemoryRepository, Repository};
