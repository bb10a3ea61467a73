use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::UserId;

pub type AccountId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Checking,
    Savings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEventKind {
    Credited,
    Debited,
}

/// Monetary effect of a committed transaction on a single account.
#[derive(Debug, Clone)]
pub struct BalanceEvent {
    pub account: AccountId,
    pub amount: Decimal,
    pub kind: BalanceEventKind,
}

#[derive(Debug, Error, PartialEq)]
#[error("Balance of {iban} would exceed the representable range")]
pub struct BalanceOverflow {
    pub iban: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub iban: String,
    pub kind: AccountType,
    pub owner: UserId,
    pub active: bool,
    pub absolute_limit: Decimal,
    pub created_at: DateTime<Utc>,
    balance: Decimal,
    version: u64,
}

impl Account {
    /// Opens an active account with zero balance.
    pub fn open(
        id: AccountId,
        iban: impl Into<String>,
        kind: AccountType,
        owner: UserId,
        absolute_limit: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            iban: iban.into(),
            kind,
            owner,
            active: true,
            absolute_limit,
            created_at,
            balance: Decimal::ZERO,
            version: 0,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Row version, bumped by the store on every committed write.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn debit(&self, amount: Decimal) -> BalanceEvent {
        BalanceEvent {
            account: self.id,
            amount,
            kind: BalanceEventKind::Debited,
        }
    }

    pub fn credit(&self, amount: Decimal) -> BalanceEvent {
        BalanceEvent {
            account: self.id,
            amount,
            kind: BalanceEventKind::Credited,
        }
    }

    /// Balance after `event`, or `None` if it does not fit in a [`Decimal`].
    pub fn balance_after(&self, event: &BalanceEvent) -> Option<Decimal> {
        match event.kind {
            BalanceEventKind::Credited => self.balance.checked_add(event.amount),
            BalanceEventKind::Debited => self.balance.checked_sub(event.amount),
        }
    }

    pub fn apply(&mut self, event: &BalanceEvent) -> Result<(), BalanceOverflow> {
        debug_assert_eq!(event.account, self.id);
        self.balance = self.balance_after(event).ok_or_else(|| BalanceOverflow {
            iban: self.iban.clone(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn checking() -> Account {
        Account::open(
            7,
            "NL01MAZE0000000007",
            AccountType::Checking,
            3,
            dec!(-100),
            Utc::now(),
        )
    }

    #[test]
    fn open_starts_empty_and_active() {
        let acc = checking();
        assert_eq!(acc.balance(), Decimal::ZERO);
        assert_eq!(acc.version(), 0);
        assert!(acc.active);
    }

    #[test]
    fn apply_events() {
        let mut acc = checking().with_balance(dec!(50));
        let credit = acc.credit(dec!(25.50));
        assert_eq!(credit.kind, BalanceEventKind::Credited);
        acc.apply(&credit).unwrap();
        assert_eq!(acc.balance(), dec!(75.50));

        let debit = acc.debit(dec!(100));
        assert_eq!(debit.account, 7);
        acc.apply(&debit).unwrap();
        assert_eq!(acc.balance(), dec!(-24.50));

        // event is the source of truth, limits are checked before it exists
        acc.apply(&acc.debit(dec!(1000))).unwrap();
        assert_eq!(acc.balance(), dec!(-1024.50));
    }

    #[test]
    fn overflowing_event_leaves_balance_alone() {
        let mut acc = checking().with_balance(Decimal::MAX - dec!(1));
        let credit = acc.credit(dec!(10));
        assert_eq!(acc.balance_after(&credit), None);
        assert_eq!(
            acc.apply(&credit),
            Err(BalanceOverflow {
                iban: "NL01MAZE0000000007".to_string()
            })
        );
        assert_eq!(acc.balance(), Decimal::MAX - dec!(1));

        let mut acc = checking().with_balance(Decimal::MIN + dec!(1));
        assert!(acc.apply(&acc.debit(dec!(10))).is_err());
        assert_eq!(acc.balance(), Decimal::MIN + dec!(1));
    }

    #[test]
    fn version_is_not_touched_by_events() {
        let mut acc = checking();
        acc.apply(&acc.credit(dec!(1))).unwrap();
        assert_eq!(acc.version(), 0);
        acc.bump_version();
        assert_eq!(acc.version(), 1);
    }
}
