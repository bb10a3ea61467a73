use rust_decimal::Decimal;
use thiserror::Error;

use crate::{account::AccountId, transaction::TransactionKind};

/// Amounts are accepted with at most cent precision.
pub const MONETARY_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmAction {
    Deposit,
    Withdraw,
}

impl AtmAction {
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Deposit => TransactionKind::Deposit,
            Self::Withdraw => TransactionKind::Withdrawal,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Deposit => "ATM deposit",
            Self::Withdraw => "ATM withdrawal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub sender_iban: String,
    pub receiver_iban: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct AtmCommand {
    pub account: AccountId,
    pub action: AtmAction,
    pub amount: Decimal,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Amount must be positive for {kind}, got {amount}")]
    NonPositiveAmount {
        kind: TransactionKind,
        amount: Decimal,
    },
    #[error("Amount {amount} has more than two decimal places")]
    ExcessivePrecision { amount: Decimal },
}

impl TransferCommand {
    pub fn parse(
        sender_iban: &str,
        receiver_iban: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            sender_iban: sender_iban.trim().to_owned(),
            receiver_iban: receiver_iban.trim().to_owned(),
            amount: parse_amount(amount, TransactionKind::Transfer)?,
            description: description.to_owned(),
        })
    }
}

impl AtmCommand {
    pub fn parse(
        account: AccountId,
        action: AtmAction,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            account,
            action,
            amount: parse_amount(amount, action.kind())?,
        })
    }
}

fn parse_amount(amount: Decimal, kind: TransactionKind) -> Result<Decimal, CommandError> {
    if amount <= Decimal::ZERO {
        return Err(CommandError::NonPositiveAmount { kind, amount });
    }
    let normalized = amount.normalize();
    if normalized.scale() > MONETARY_SCALE {
        return Err(CommandError::ExcessivePrecision { amount });
    }
    Ok(normalized)
}
