//! Applies the monetary effect of a validated transaction to the accounts involved.

use rust_decimal::Decimal;

use crate::{
    account::{Account, BalanceEvent, BalanceOverflow},
    transaction::TransactionKind,
};

/// Balance events for a transaction. The house account never appears in an ATM action's
/// events: deposits mint money from the bank's point of view and withdrawals retire it.
pub fn balance_events(
    kind: TransactionKind,
    sender: &Account,
    receiver: &Account,
    amount: Decimal,
) -> Vec<BalanceEvent> {
    match kind {
        TransactionKind::Transfer => vec![sender.debit(amount), receiver.credit(amount)],
        TransactionKind::Deposit => vec![receiver.credit(amount)],
        TransactionKind::Withdrawal => vec![sender.debit(amount)],
    }
}

/// Returns updated copies of exactly the accounts touched by the transaction,
/// ready to be handed to the store for commit.
pub fn mutate(
    kind: TransactionKind,
    sender: &Account,
    receiver: &Account,
    amount: Decimal,
) -> Result<Vec<Account>, BalanceOverflow> {
    balance_events(kind, sender, receiver, amount)
        .iter()
        .map(|event| {
            let mut account = if event.account == sender.id {
                sender.clone()
            } else {
                receiver.clone()
            };
            account.apply(event)?;
            Ok(account)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::account::AccountType;

    use super::*;

    fn pair() -> (Account, Account) {
        let now = Utc::now();
        (
            Account::open(1, "A", AccountType::Checking, 1, dec!(0), now).with_balance(dec!(1000)),
            Account::open(2, "B", AccountType::Checking, 2, dec!(0), now).with_balance(dec!(50)),
        )
    }

    #[test]
    fn transfer_moves_money() {
        let (sender, receiver) = pair();
        let mutated = mutate(TransactionKind::Transfer, &sender, &receiver, dec!(1000)).unwrap();
        assert_eq!(mutated.len(), 2);
        assert_eq!(mutated[0].balance(), dec!(0));
        assert_eq!(mutated[1].balance(), dec!(1050));
        assert_eq!(
            mutated[0].balance() + mutated[1].balance(),
            sender.balance() + receiver.balance()
        );
    }

    #[test]
    fn deposit_leaves_house_untouched() {
        let (house, customer) = pair();
        let mutated = mutate(TransactionKind::Deposit, &house, &customer, dec!(25)).unwrap();
        assert_eq!(mutated.len(), 1);
        assert_eq!(mutated[0].id, 2);
        assert_eq!(mutated[0].balance(), dec!(75));
    }

    #[test]
    fn withdrawal_leaves_house_untouched() {
        let (customer, house) = pair();
        let mutated = mutate(TransactionKind::Withdrawal, &customer, &house, dec!(25)).unwrap();
        assert_eq!(mutated.len(), 1);
        assert_eq!(mutated[0].id, 1);
        assert_eq!(mutated[0].balance(), dec!(975));
    }

    #[test]
    fn overflowing_credit_is_an_error() {
        let (sender, receiver) = pair();
        let receiver = receiver.with_balance(Decimal::MAX);
        let err = mutate(TransactionKind::Transfer, &sender, &receiver, dec!(1)).unwrap_err();
        assert_eq!(err.iban, "B");
    }
}
