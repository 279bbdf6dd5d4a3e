use chrono::{DateTime, Utc};
use serde::Serialize;

use spendbook_core::{AccountId, DomainError, DomainResult, Entity, IdSequence};

use crate::repository::{InMemoryRepository, Repository};

/// The permanent account every store starts with.
pub const DEFAULT_ACCOUNT_ID: AccountId = AccountId::new(1);

const DEFAULT_ACCOUNT_NAME: &str = "Main Account";
const DEFAULT_ACCOUNT_DESCRIPTION: &str = "Default account for expenses";

/// A named bucket with a running balance.
///
/// The balance is only moved by the stores: expense creation debits it,
/// expense deletion credits it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    balance: f64,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_ACCOUNT_ID
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }
}

/// Input for [`AccountStore::create_account`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub description: Option<String>,
    /// Absent and `0.0` are treated the same.
    pub initial_balance: Option<f64>,
}

impl NewAccount {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for [`AccountStore::update_account`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    /// An empty (or all-whitespace) description clears it.
    pub description: Option<String>,
}

/// Owns the accounts and their balances.
#[derive(Debug)]
pub struct AccountStore<R = InMemoryRepository<Account>> {
    repo: R,
    ids: IdSequence<AccountId>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::with_repository(InMemoryRepository::new())
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AccountStore<R>
where
    R: Repository<Account>,
{
    /// Wrap an existing repository, seeding the default account if it is missing.
    pub fn with_repository(mut repo: R) -> Self {
        let last = repo
            .iter()
            .map(|a| a.id.get())
            .max()
            .unwrap_or(0);

        if repo.get(DEFAULT_ACCOUNT_ID).is_none() {
            repo.insert(Account {
                id: DEFAULT_ACCOUNT_ID,
                name: DEFAULT_ACCOUNT_NAME.to_string(),
                description: Some(DEFAULT_ACCOUNT_DESCRIPTION.to_string()),
                balance: 0.0,
                created_at: Utc::now(),
            });
        }

        Self {
            repo,
            ids: IdSequence::starting_after(last.max(DEFAULT_ACCOUNT_ID.get())),
        }
    }

    pub fn create_account(&mut self, new: NewAccount) -> DomainResult<Account> {
        let name = validate_name(&new.name)?;

        let balance = match new.initial_balance {
            None => 0.0,
            Some(b) if !b.is_finite() || b < 0.0 => {
                return Err(DomainError::validation(
                    "initial balance must be a non-negative number",
                ));
            }
            Some(b) => b,
        };

        let account = Account {
            id: self.ids.next_id(),
            name,
            description: normalize_description(new.description),
            balance,
            created_at: Utc::now(),
        };
        self.repo.insert(account.clone());
        Ok(account)
    }

    pub fn get_account(&self, id: AccountId) -> Option<Account> {
        self.repo.get(id)
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.repo.get(id).is_some()
    }

    /// All accounts in creation order.
    pub fn list_accounts(&self) -> Vec<Account> {
        self.repo.list()
    }

    pub fn update_account(&mut self, id: AccountId, patch: AccountPatch) -> DomainResult<Account> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let description = patch.description.map(|d| normalize_description(Some(d)));

        self.repo
            .update(id, |account| {
                if let Some(name) = name {
                    account.name = name;
                }
                if let Some(description) = description {
                    account.description = description;
                }
            })
            .cloned()
            .ok_or_else(|| DomainError::not_found("account"))
    }

    /// Remove an account. Its expenses are left in place.
    pub fn delete_account(&mut self, id: AccountId) -> DomainResult<Account> {
        if id == DEFAULT_ACCOUNT_ID {
            return Err(DomainError::invariant("cannot delete the default account"));
        }
        self.repo
            .remove(id)
            .ok_or_else(|| DomainError::not_found("account"))
    }

    /// Add `delta` to the account's balance. Returns `false` (and changes
    /// nothing) if the account does not exist.
    pub fn adjust_balance(&mut self, id: AccountId, delta: f64) -> bool {
        self.repo
            .update(id, |account| account.balance += delta)
            .is_some()
    }

    pub fn total_balance(&self) -> f64 {
        self.repo.iter().map(|a| a.balance).sum()
    }

    pub fn len(&self) -> usize {
        self.repo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("account name must be a non-empty string"));
    }
    Ok(name.to_string())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
