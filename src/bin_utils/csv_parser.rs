use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{account::AccountId, user::UserId};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Transfer,
    Deposit,
    Withdraw,
}

/// One row of the operations file. Which optional columns are required depends on `kind`.
#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub user: UserId,
    pub from: Option<String>,
    pub to: Option<String>,
    pub account: Option<AccountId>,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Parses an operation list in CSV format, yielding the line number with every row.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Operation, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_rows() {
        let input = "\
type,user,from,to,account,amount,description
transfer, 2, NL10, NL20, , 12.50, rent
deposit,2,,,10,100,
withdraw,x,,,10,1,
";
        let rows: Vec<_> = CsvOperationParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 3);

        let (_, transfer) = &rows[0];
        let transfer = transfer.as_ref().unwrap();
        assert_eq!(transfer.kind, OperationKind::Transfer);
        assert_eq!(transfer.from.as_deref(), Some("NL10"));
        assert_eq!(transfer.amount, dec!(12.50));
        assert_eq!(transfer.description.as_deref(), Some("rent"));
        assert_eq!(transfer.account, None);

        let (_, deposit) = &rows[1];
        let deposit = deposit.as_ref().unwrap();
        assert_eq!(deposit.account, Some(10));
        assert_eq!(deposit.from, None);

        let (_, bad) = &rows[2];
        assert!(bad.is_err());
    }
}
