use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{account::AccountId, user::UserId};

pub type TransactionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Transfer,
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Kinds that take money out of the sender and count against its owner's day limit.
    pub fn debits_sender(self) -> bool {
        matches!(self, Self::Transfer | Self::Withdrawal)
    }

    pub fn credits_receiver(self) -> bool {
        matches!(self, Self::Transfer | Self::Deposit)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transfer => "TRANSFER",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
        })
    }
}

/// Ledger entry that is about to be committed; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub sender: AccountId,
    pub receiver: AccountId,
    pub kind: TransactionKind,
    pub initiated_by: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: Decimal,
    pub sender: AccountId,
    pub receiver: AccountId,
    pub kind: TransactionKind,
    pub initiated_by: UserId,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn from_new(id: TransactionId, new: NewTransaction) -> Self {
        Self {
            id,
            description: new.description,
            amount: new.amount,
            sender: new.sender,
            receiver: new.receiver,
            kind: new.kind,
            initiated_by: new.initiated_by,
            timestamp: new.timestamp,
        }
    }
}

/// Immutable snapshot of a committed transaction handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub amount: Decimal,
    pub description: String,
    pub sender_iban: String,
    pub receiver_iban: String,
    pub acting_user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
}

impl TransactionRecord {
    pub fn project(transaction: &Transaction, sender_iban: &str, receiver_iban: &str) -> Self {
        Self {
            id: transaction.id,
            amount: transaction.amount,
            description: transaction.description.clone(),
            sender_iban: sender_iban.to_owned(),
            receiver_iban: receiver_iban.to_owned(),
            acting_user_id: transaction.initiated_by,
            timestamp: transaction.timestamp,
            kind: transaction.kind,
        }
    }
}
