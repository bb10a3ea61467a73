use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountId,
    command::CommandError,
    store::StoreError,
    transaction::{TransactionId, TransactionRecord},
    user::{ActingUser, UserId},
    validator::ValidationError,
};

pub mod ledger_processor;

#[derive(Debug, Error)]
pub enum TransactionProcessError {
    #[error("Account {0} not found")]
    AccountNotFound(String),
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),
    #[error("The bank's house account cannot be used here")]
    UnauthorizedHouseAccess,
    #[error("User {user} is not a participant of transaction {transaction}")]
    NotParticipant {
        user: UserId,
        transaction: TransactionId,
    },
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
    #[error("Concurrent update on the same account, try again")]
    Contention,
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),
}

impl TransactionProcessError {
    /// Only write conflicts are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contention)
    }
}

impl From<StoreError> for TransactionProcessError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::Contention,
            StoreError::DuplicateIban { .. } | StoreError::Unavailable(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}

/// Entry points consumed by the API layer. The caller is always passed in explicitly.
pub trait TransactionProcessor {
    fn transfer(
        &self,
        sender_iban: &str,
        receiver_iban: &str,
        amount: Decimal,
        description: &str,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError>;

    fn atm_deposit(
        &self,
        account: AccountId,
        amount: Decimal,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError>;

    fn atm_withdraw(
        &self,
        account: AccountId,
        amount: Decimal,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError>;

    fn transaction(
        &self,
        id: TransactionId,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError>;
}
