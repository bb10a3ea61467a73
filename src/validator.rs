use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountType, BalanceOverflow},
    limits,
    transaction::TransactionKind,
    user::{ActingUser, User, UserId},
};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Sender and receiver cannot be the same account")]
    SameAccount,
    #[error("Account {iban} is blocked")]
    AccountInactive { iban: String },
    #[error("User {user} is blocked")]
    UserBlocked { user: UserId },
    #[error("Amount {amount} exceeds the transaction limit of {limit}")]
    TransactionLimitExceeded { amount: Decimal, limit: Decimal },
    #[error("Day limit of {limit} exceeded: {spent_today} already sent today, {amount} requested")]
    DayLimitExceeded {
        spent_today: Decimal,
        amount: Decimal,
        limit: Decimal,
    },
    #[error("Balance of {iban} cannot become lower than its absolute limit of {absolute_limit}")]
    AbsoluteLimitBreached {
        iban: String,
        absolute_limit: Decimal,
    },
    #[error("Savings accounts can only exchange money with accounts of the same owner")]
    SavingsTransferRestricted,
    #[error("User {user} is not authorized to move money from this account")]
    UnauthorizedInitiator { user: UserId },
    #[error("Cannot deposit to or withdraw from savings account {iban} at an ATM")]
    InvalidAccountTypeForAtm { iban: String },
    #[error(transparent)]
    BalanceOverflow(#[from] BalanceOverflow),
}

/// Everything the pipeline looks at, resolved by the engine beforehand.
#[derive(Debug)]
pub struct TransactionContext<'a> {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub sender: &'a Account,
    pub sender_owner: &'a User,
    pub receiver: &'a Account,
    pub receiver_owner: &'a User,
    pub acting_user: &'a ActingUser,
    /// Amount the sender already sent today to other owners. Ignored for deposits.
    pub spent_today: Decimal,
}

impl TransactionContext<'_> {
    /// The non-house side of the transaction: the receiver of a deposit, the sender otherwise.
    fn customer_side(&self) -> (&Account, &User) {
        match self.kind {
            TransactionKind::Deposit => (self.receiver, self.receiver_owner),
            TransactionKind::Transfer | TransactionKind::Withdrawal => {
                (self.sender, self.sender_owner)
            }
        }
    }

    fn same_owner(&self) -> bool {
        self.sender.owner == self.receiver.owner
    }
}

pub fn validate_transfer(ctx: &TransactionContext<'_>) -> Result<(), ValidationError> {
    validate_common(ctx)?;

    let involves_savings =
        ctx.sender.kind == AccountType::Savings || ctx.receiver.kind == AccountType::Savings;
    if involves_savings && !ctx.same_owner() {
        return Err(ValidationError::SavingsTransferRestricted);
    }

    if !ctx.acting_user.is_employee() && ctx.acting_user.id != ctx.sender.owner {
        return Err(ValidationError::UnauthorizedInitiator {
            user: ctx.acting_user.id,
        });
    }
    Ok(())
}

pub fn validate_atm(ctx: &TransactionContext<'_>) -> Result<(), ValidationError> {
    validate_common(ctx)?;

    let (account, _) = ctx.customer_side();
    if account.kind != AccountType::Checking {
        return Err(ValidationError::InvalidAccountTypeForAtm {
            iban: account.iban.clone(),
        });
    }

    if !ctx.acting_user.is_employee() && ctx.acting_user.id != account.owner {
        return Err(ValidationError::UnauthorizedInitiator {
            user: ctx.acting_user.id,
        });
    }
    Ok(())
}

fn validate_common(ctx: &TransactionContext<'_>) -> Result<(), ValidationError> {
    if ctx.sender.id == ctx.receiver.id {
        return Err(ValidationError::SameAccount);
    }

    for account in [ctx.sender, ctx.receiver] {
        if !account.active {
            return Err(ValidationError::AccountInactive {
                iban: account.iban.clone(),
            });
        }
    }

    let (_, customer) = ctx.customer_side();
    if ctx.acting_user.blocked {
        return Err(ValidationError::UserBlocked {
            user: ctx.acting_user.id,
        });
    }
    if customer.blocked {
        return Err(ValidationError::UserBlocked { user: customer.id });
    }

    if limits::exceeds_transaction_limit(ctx.amount, customer) {
        return Err(ValidationError::TransactionLimitExceeded {
            amount: ctx.amount,
            limit: customer.transaction_limit,
        });
    }

    if ctx.kind.credits_receiver() && limits::overflows_balance(ctx.receiver, ctx.amount) {
        return Err(BalanceOverflow {
            iban: ctx.receiver.iban.clone(),
        }
        .into());
    }

    if !ctx.kind.debits_sender() {
        return Ok(());
    }

    if limits::breaches_absolute_limit(ctx.sender, ctx.amount) {
        return Err(ValidationError::AbsoluteLimitBreached {
            iban: ctx.sender.iban.clone(),
            absolute_limit: ctx.sender.absolute_limit,
        });
    }

    if limits::exceeds_day_limit(ctx.sender_owner, ctx.amount, ctx.spent_today) {
        return Err(ValidationError::DayLimitExceeded {
            spent_today: ctx.spent_today,
            amount: ctx.amount,
            limit: ctx.sender_owner.day_limit,
        });
    }
    Ok(())
}
