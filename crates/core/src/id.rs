//! Strongly-typed identifiers used across the domain.
//!
//! Ids are small positive integers handed out by an [`IdSequence`]. Each
//! record kind has its own sequence, so account 1 and expense 1 can coexist.

use core::marker::PhantomData;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of an account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

/// Identifier of an expense.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

/// Common surface of the integer-backed id newtypes.
pub trait SequentialId: Copy + Eq + core::fmt::Debug {
    fn from_raw(raw: u64) -> Self;
    fn get(self) -> u64;
}

macro_rules! impl_sequential_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl SequentialId for $t {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if raw == 0 {
                    return Err(DomainError::invalid_id(format!("{}: must be positive", $name)));
                }
                Ok(Self(raw))
            }
        }
    };
}

impl_sequential_id!(AccountId, "AccountId");
impl_sequential_id!(ExpenseId, "ExpenseId");

/// Monotonic id allocator, starting at 1.
///
/// Never hands out the same value twice, even if records are later removed.
#[derive(Debug, Clone)]
pub struct IdSequence<T> {
    next: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: SequentialId> IdSequence<T> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _marker: PhantomData,
        }
    }

    /// Resume a sequence whose highest allocated value is `last`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            next: last + 1,
            _marker: PhantomData,
        }
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> T {
        let id = T::from_raw(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`IdSequence::next_id`] will return.
    pub fn peek(&self) -> T {
        T::from_raw(self.next)
    }
}

impl<T: SequentialId> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequence_starts_at_one() {
        let mut seq: IdSequence<AccountId> = IdSequence::new();
        assert_eq!(seq.peek(), AccountId::new(1));
        assert_eq!(seq.next_id(), AccountId::new(1));
        assert_eq!(seq.next_id(), AccountId::new(2));
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!(matches!("0".parse::<ExpenseId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("abc".parse::<ExpenseId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("-3".parse::<AccountId>(), Err(DomainError::InvalidId(_))));
        assert_eq!("42".parse::<AccountId>().unwrap(), AccountId::new(42));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&AccountId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ExpenseId = serde_json::from_str("12").unwrap();
        assert_eq!(back, ExpenseId::new(12));
    }

    proptest! {
        /// Property: allocated ids are strictly increasing.
        #[test]
        fn ids_strictly_increase(n in 1usize..200) {
            let mut seq: IdSequence<ExpenseId> = IdSequence::new();
            let mut last = 0u64;
            for _ in 0..n {
                let id = seq.next_id().get();
                prop_assert!(id > last);
                last = id;
            }
        }
    }
}
