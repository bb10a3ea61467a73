//! Limit rules evaluated against a proposed transaction. Pure functions, no store access.

use rust_decimal::Decimal;

use crate::{account::Account, user::User};

/// `amount` is above what `user` may move in a single transaction.
pub fn exceeds_transaction_limit(amount: Decimal, user: &User) -> bool {
    amount > user.transaction_limit
}

/// `today_aggregate` is the sum already sent today by the account being debited,
/// counting only counterparties of a different owner. An aggregate too large to
/// represent is over any limit.
pub fn exceeds_day_limit(owner: &User, amount: Decimal, today_aggregate: Decimal) -> bool {
    today_aggregate
        .checked_add(amount)
        .is_none_or(|total| total > owner.day_limit)
}

/// Debiting `amount` would take `account` below its absolute limit.
pub fn breaches_absolute_limit(account: &Account, amount: Decimal) -> bool {
    account
        .balance()
        .checked_sub(amount)
        .is_none_or(|balance| balance < account.absolute_limit)
}

/// Crediting `amount` would push `account` past the largest representable balance.
pub fn overflows_balance(account: &Account, amount: Decimal) -> bool {
    account.balance().checked_add(amount).is_none()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::{account::AccountType, user::Role};

    use super::*;

    fn user() -> User {
        User {
            id: 1,
            role: Role::Customer,
            blocked: false,
            day_limit: dec!(2000),
            transaction_limit: dec!(500),
        }
    }

    fn account(balance: Decimal, absolute_limit: Decimal) -> Account {
        Account::open(1, "NL", AccountType::Checking, 1, absolute_limit, Utc::now())
            .with_balance(balance)
    }

    #[test]
    fn transaction_limit_is_inclusive() {
        assert!(!exceeds_transaction_limit(dec!(500), &user()));
        assert!(exceeds_transaction_limit(dec!(500.01), &user()));
    }

    #[test]
    fn day_limit() {
        assert!(!exceeds_day_limit(&user(), dec!(200), dec!(1800)));
        assert!(exceeds_day_limit(&user(), dec!(300), dec!(1800)));
        assert!(exceeds_day_limit(&user(), dec!(2000.01), Decimal::ZERO));
    }

    #[test]
    fn absolute_limit() {
        assert!(!breaches_absolute_limit(&account(dec!(1000), dec!(0)), dec!(1000)));
        assert!(breaches_absolute_limit(&account(dec!(1000), dec!(500)), dec!(600)));
        // overdraft allowed down to a negative limit
        assert!(!breaches_absolute_limit(&account(dec!(0), dec!(-250)), dec!(250)));
        assert!(breaches_absolute_limit(&account(dec!(0), dec!(-250)), dec!(250.01)));
    }

    #[test]
    fn overflow_counts_as_breach() {
        let mut rich = user();
        rich.day_limit = Decimal::MAX;
        assert!(!exceeds_day_limit(&rich, dec!(1), Decimal::MAX - dec!(1)));
        assert!(exceeds_day_limit(&rich, dec!(10), Decimal::MAX - dec!(1)));

        assert!(breaches_absolute_limit(
            &account(Decimal::MIN + dec!(1), Decimal::MIN),
            dec!(10)
        ));
        assert!(!overflows_balance(&account(Decimal::MAX - dec!(10), dec!(0)), dec!(10)));
        assert!(overflows_balance(&account(Decimal::MAX - dec!(1), dec!(0)), dec!(10)));
    }
}
