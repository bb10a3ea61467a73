//! This module could be a separate crate on its own, to bootstrap [`bank_ledger`](crate) within
//! a binary, but for simplicity it ships with the library.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    processor::{
        TransactionProcessError, TransactionProcessor, ledger_processor::LedgerProcessor,
    },
    store::{LedgerStore, in_memory_store::InMemoryLedgerStore},
    transaction::TransactionRecord,
    user::{ActingUser, UserId},
};
use csv_parser::{CsvOperationParser, Operation, OperationKind};
use csv_printer::{AccountRow, print_accounts};
use fixture::Fixture;

pub mod csv_parser;
pub mod csv_printer;
pub mod fixture;

#[derive(Debug, Error)]
pub enum RowError {
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error("Column `{column}` is required for {kind:?}")]
    MissingColumn {
        column: &'static str,
        kind: OperationKind,
    },
    #[error("Unknown acting user {0}")]
    UnknownUser(UserId),
    #[error(transparent)]
    Process(#[from] TransactionProcessError),
}

pub struct Service<'w, R, W: 'w> {
    pub fixture: Fixture,
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let (config, store) = self
            .fixture
            .into_store()
            .context("Failed to seed the ledger store")?;
        let processor = LedgerProcessor::new(store, config);

        let parser = CsvOperationParser::new(self.input);
        for (line, row) in parser {
            let outcome = row
                .map_err(RowError::from)
                .and_then(|operation| execute(&processor, operation));
            if let Err(err) = outcome {
                (self.error_printer)(line, err);
            }
        }

        let accounts = processor
            .store()
            .accounts()
            .context("Failed to list accounts")?;
        print_accounts(
            self.output,
            accounts.into_iter().map(|acc| AccountRow {
                balance: acc.balance(),
                iban: acc.iban,
                owner: acc.owner,
                kind: acc.kind,
                active: acc.active,
            }),
        )
    }
}

fn execute(
    processor: &LedgerProcessor<InMemoryLedgerStore>,
    operation: Operation,
) -> Result<TransactionRecord, RowError> {
    let user = processor
        .store()
        .user_by_id(operation.user)
        .map_err(TransactionProcessError::from)?
        .ok_or(RowError::UnknownUser(operation.user))?;
    let acting_user = ActingUser::from(&user);
    let kind = operation.kind;
    let missing = |column| RowError::MissingColumn { column, kind };

    let record = match kind {
        OperationKind::Transfer => processor.transfer(
            &operation.from.ok_or_else(|| missing("from"))?,
            &operation.to.ok_or_else(|| missing("to"))?,
            operation.amount,
            operation.description.as_deref().unwrap_or_default(),
            &acting_user,
        )?,
        OperationKind::Deposit => processor.atm_deposit(
            operation.account.ok_or_else(|| missing("account"))?,
            operation.amount,
            &acting_user,
        )?,
        OperationKind::Withdraw => processor.atm_withdraw(
            operation.account.ok_or_else(|| missing("account"))?,
            operation.amount,
            &acting_user,
        )?,
    };
    Ok(record)
}
