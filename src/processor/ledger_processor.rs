use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    account::{Account, AccountId},
    clock::{Clock, SystemClock},
    command::{AtmAction, AtmCommand, TransferCommand},
    config::EngineConfig,
    mutator,
    store::{DaySpendCriteria, LedgerStore},
    transaction::{NewTransaction, TransactionId, TransactionKind, TransactionRecord},
    user::{ActingUser, User, UserId},
    validator::{self, TransactionContext},
};

use super::{TransactionProcessError, TransactionProcessor};

/// Transaction engine on top of a [`LedgerStore`].
///
/// Every operation reads what it needs, validates, and commits the mutated accounts
/// together with the new ledger entry. A commit that loses a race against a concurrent
/// write is retried from scratch, up to `max_attempts` times in total.
pub struct LedgerProcessor<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S> LedgerProcessor<S>
where
    S: LedgerStore,
{
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S, C> LedgerProcessor<S, C>
where
    S: LedgerStore,
    C: Clock,
{
    pub fn with_clock(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn with_retries<F>(&self, mut operation: F) -> Result<TransactionRecord, TransactionProcessError>
    where
        F: FnMut() -> Result<TransactionRecord, TransactionProcessError>,
    {
        let mut attempt = 1;
        loop {
            match operation() {
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    warn!(attempt, "commit conflicted with a concurrent write, retrying");
                    attempt += 1;
                }
                Err(TransactionProcessError::StoreUnavailable(reason)) => {
                    error!(%reason, "ledger store unavailable");
                    return Err(TransactionProcessError::StoreUnavailable(reason));
                }
                result => return result,
            }
        }
    }

    fn is_house(&self, account: &Account) -> bool {
        account.id == self.config.house_account
    }

    fn account_by_iban(&self, iban: &str) -> Result<Account, TransactionProcessError> {
        self.store
            .account_by_iban(iban)?
            .ok_or_else(|| TransactionProcessError::AccountNotFound(iban.to_owned()))
    }

    fn account_by_id(&self, id: AccountId) -> Result<Account, TransactionProcessError> {
        self.store
            .account_by_id(id)?
            .ok_or_else(|| TransactionProcessError::AccountNotFound(id.to_string()))
    }

    fn user(&self, id: UserId) -> Result<User, TransactionProcessError> {
        self.store
            .user_by_id(id)?
            .ok_or(TransactionProcessError::UserNotFound(id))
    }

    fn try_transfer(
        &self,
        command: &TransferCommand,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let sender = self.account_by_iban(&command.sender_iban)?;
        let receiver = self.account_by_iban(&command.receiver_iban)?;
        if self.is_house(&sender) || self.is_house(&receiver) {
            return Err(TransactionProcessError::UnauthorizedHouseAccess);
        }

        self.execute(
            TransactionKind::Transfer,
            command.amount,
            &command.description,
            sender,
            receiver,
            acting_user,
        )
    }

    fn try_atm(
        &self,
        command: &AtmCommand,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let account = self.account_by_id(command.account)?;
        if self.is_house(&account) {
            return Err(TransactionProcessError::UnauthorizedHouseAccess);
        }
        let house = self.account_by_id(self.config.house_account)?;

        let (sender, receiver) = match command.action {
            AtmAction::Deposit => (house, account),
            AtmAction::Withdraw => (account, house),
        };
        self.execute(
            command.action.kind(),
            command.amount,
            command.action.description(),
            sender,
            receiver,
            acting_user,
        )
    }

    fn execute(
        &self,
        kind: TransactionKind,
        amount: Decimal,
        description: &str,
        sender: Account,
        receiver: Account,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let sender_owner = self.user(sender.owner)?;
        let receiver_owner = self.user(receiver.owner)?;
        let spent_today = if kind.debits_sender() {
            let criteria =
                DaySpendCriteria::outgoing(sender.id, self.clock.today()).excluding_same_owner();
            self.store.sum_outgoing(&criteria)?
        } else {
            Decimal::ZERO
        };

        let ctx = TransactionContext {
            kind,
            amount,
            sender: &sender,
            sender_owner: &sender_owner,
            receiver: &receiver,
            receiver_owner: &receiver_owner,
            acting_user,
            spent_today,
        };
        let validated = match kind {
            TransactionKind::Transfer => validator::validate_transfer(&ctx),
            TransactionKind::Deposit | TransactionKind::Withdrawal => validator::validate_atm(&ctx),
        };
        if let Err(err) = validated {
            debug!(%kind, %amount, %err, "transaction rejected");
            return Err(err.into());
        }

        let mutated = mutator::mutate(kind, &sender, &receiver, amount)
            .map_err(validator::ValidationError::from)?;
        let transaction = self.store.commit(
            &mutated,
            NewTransaction {
                description: description.to_owned(),
                amount,
                sender: sender.id,
                receiver: receiver.id,
                kind,
                initiated_by: acting_user.id,
                timestamp: self.clock.now(),
            },
        )?;

        info!(
            transaction = transaction.id,
            %kind,
            %amount,
            sender = %sender.iban,
            receiver = %receiver.iban,
            "transaction committed"
        );
        Ok(TransactionRecord::project(
            &transaction,
            &sender.iban,
            &receiver.iban,
        ))
    }
}

impl<S, C> TransactionProcessor for LedgerProcessor<S, C>
where
    S: LedgerStore,
    C: Clock,
{
    #[instrument(skip(self, acting_user), fields(user = acting_user.id))]
    fn transfer(
        &self,
        sender_iban: &str,
        receiver_iban: &str,
        amount: Decimal,
        description: &str,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let command = TransferCommand::parse(sender_iban, receiver_iban, amount, description)?;
        self.with_retries(|| self.try_transfer(&command, acting_user))
    }

    #[instrument(skip(self, acting_user), fields(user = acting_user.id))]
    fn atm_deposit(
        &self,
        account: AccountId,
        amount: Decimal,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let command = AtmCommand::parse(account, AtmAction::Deposit, amount)?;
        self.with_retries(|| self.try_atm(&command, acting_user))
    }

    #[instrument(skip(self, acting_user), fields(user = acting_user.id))]
    fn atm_withdraw(
        &self,
        account: AccountId,
        amount: Decimal,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let command = AtmCommand::parse(account, AtmAction::Withdraw, amount)?;
        self.with_retries(|| self.try_atm(&command, acting_user))
    }

    fn transaction(
        &self,
        id: TransactionId,
        acting_user: &ActingUser,
    ) -> Result<TransactionRecord, TransactionProcessError> {
        let transaction = self
            .store
            .transaction_by_id(id)?
            .ok_or(TransactionProcessError::TransactionNotFound(id))?;
        let sender = self.account_by_id(transaction.sender)?;
        let receiver = self.account_by_id(transaction.receiver)?;

        if !acting_user.is_employee() {
            if self.is_house(&sender) {
                return Err(TransactionProcessError::UnauthorizedHouseAccess);
            }
            if acting_user.id != sender.owner && acting_user.id != receiver.owner {
                return Err(TransactionProcessError::NotParticipant {
                    user: acting_user.id,
                    transaction: id,
                });
            }
        }
        Ok(TransactionRecord::project(
            &transaction,
            &sender.iban,
            &receiver.iban,
        ))
    }
}
