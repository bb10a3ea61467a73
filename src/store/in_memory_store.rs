use std::{
    collections::HashMap,
    sync::{
        RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use rust_decimal::Decimal;
use tracing::trace;

use crate::{
    account::{Account, AccountId},
    transaction::{NewTransaction, Transaction, TransactionId},
    user::{User, UserId},
};

use super::{DaySpendCriteria, LedgerStore, StoreError};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    ibans: HashMap<String, AccountId>,
    users: HashMap<UserId, User>,
    transactions: Vec<Transaction>,
}

/// Ledger store kept in process memory.
///
/// Reads clone rows out under a shared lock; `commit` takes the write lock only for the
/// version check and the write, so validation never runs while a lock is held.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
    offline: AtomicBool,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.write()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state
            .ibans
            .get(&account.iban)
            .is_some_and(|id| *id != account.id)
        {
            return Err(StoreError::DuplicateIban { iban: account.iban });
        }
        state.ibans.insert(account.iban.clone(), account.id);
        state.accounts.insert(account.id, account);
        Ok(())
    }

    /// All accounts, ordered by id.
    pub fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<_> = self.read()?.accounts.values().cloned().collect();
        accounts.sort_by_key(|acc| acc.id);
        Ok(accounts)
    }

    /// Committed ledger entries, oldest first.
    pub fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.read()?.transactions.clone())
    }

    /// Makes every call fail with [`StoreError::Unavailable`] until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.ensure_online()?;
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.ensure_online()?;
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".to_string()))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn account_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    fn account_by_iban(&self, iban: &str) -> Result<Option<Account>, StoreError> {
        let state = self.read()?;
        Ok(state
            .ibans
            .get(iban)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn transaction_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let state = self.read()?;
        // ids are handed out sequentially starting at 1
        let idx = usize::try_from(id).ok().and_then(|id| id.checked_sub(1));
        Ok(idx.and_then(|idx| state.transactions.get(idx)).cloned())
    }

    fn sum_outgoing(&self, criteria: &DaySpendCriteria) -> Result<Decimal, StoreError> {
        let state = self.read()?;
        let owner_of = |id: &AccountId| state.accounts.get(id).map(|acc| acc.owner);
        let sender_owner = owner_of(&criteria.account);

        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.sender == criteria.account && tx.kind.debits_sender())
            .filter(|tx| tx.timestamp.date_naive() == criteria.day)
            .filter(|tx| !criteria.exclude_same_owner || owner_of(&tx.receiver) != sender_owner)
            .map(|tx| tx.amount)
            .sum())
    }

    fn commit(
        &self,
        accounts: &[Account],
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut state = self.write()?;

        // check every row before touching any of them
        for account in accounts {
            let stored = state.accounts.get(&account.id);
            if stored.map(Account::version) != Some(account.version()) {
                return Err(StoreError::Conflict {
                    account: account.id,
                });
            }
        }

        for account in accounts {
            let mut updated = account.clone();
            updated.bump_version();
            state.accounts.insert(updated.id, updated);
        }

        let id = state.transactions.len() as TransactionId + 1;
        let transaction = Transaction::from_new(id, transaction);
        state.transactions.push(transaction.clone());
        trace!(transaction = id, rows = accounts.len(), "committed");
        Ok(transaction)
    }
}
