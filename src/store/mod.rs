use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountId},
    transaction::{NewTransaction, Transaction, TransactionId},
    user::{User, UserId},
};

pub mod in_memory_store;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Account {account} was modified concurrently")]
    Conflict { account: AccountId },
    #[error("IBAN {iban} is already taken")]
    DuplicateIban { iban: String },
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
}

/// Filter for the "outgoing today" aggregate. Built once and handed to the store as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySpendCriteria {
    pub account: AccountId,
    pub day: NaiveDate,
    pub exclude_same_owner: bool,
}

impl DaySpendCriteria {
    pub fn outgoing(account: AccountId, day: NaiveDate) -> Self {
        Self {
            account,
            day,
            exclude_same_owner: false,
        }
    }

    #[must_use]
    pub fn excluding_same_owner(self) -> Self {
        Self {
            exclude_same_owner: true,
            ..self
        }
    }
}

/// Durable storage for accounts, users and the append-only transaction ledger.
///
/// `commit` is the only write path: it persists the mutated accounts and appends the
/// transaction as one unit, or does nothing.
pub trait LedgerStore {
    fn account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    fn account_by_iban(&self, iban: &str) -> Result<Option<Account>, StoreError>;

    fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn transaction_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Sum of TRANSFER and WITHDRAWAL amounts sent by `criteria.account` on `criteria.day` (UTC).
    fn sum_outgoing(&self, criteria: &DaySpendCriteria) -> Result<Decimal, StoreError>;

    /// Fails with [`StoreError::Conflict`] if any of `accounts` changed since it was read.
    fn commit(
        &self,
        accounts: &[Account],
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError>;
}
