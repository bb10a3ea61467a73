use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{account::AccountType, user::UserId};

#[derive(Debug, Serialize)]
pub struct AccountRow {
    pub iban: String,
    pub owner: UserId,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub balance: Decimal,
    pub active: bool,
}

pub fn print_accounts<W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountRow>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for row in accounts {
        let iban = row.iban.clone();
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write account {iban}"))?;
    }
    writer.flush().context("Failed to flush account balances")?;
    Ok(())
}
