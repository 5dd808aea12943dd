//! Reads account specs from CSV, to open accounts in bulk.
//!
//! ```csv
//! type,    holder,   balance, parameter
//! savings, Jane Doe, 10000,   5
//! C,       John Doe, 0,       500
//! ```
//!
//! `parameter` is the interest rate (in percent) of savings accounts, and the
//! overdraft limit of current accounts.

use crate::ledger::AccountSpec;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("malformed CSV: {0}")]
    Csv(String), // CSV is malformed

    #[error("invalid record: {0}")]
    Format(String), // Data format is incorrect
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<<AccountRecord as TryInto<AccountSpec>>::Error> for Error {
    fn from(err: <AccountRecord as TryInto<AccountSpec>>::Error) -> Self {
        Self::Format(err.to_string())
    }
}

// A bad row doesn't stop the import: every row gets its own result, and the
// caller decides what to do with the failures. The account type isn't checked
// here, the ledger reports unknown types along with its other failures.
pub fn parse(input_stream: impl std::io::Read) -> Vec<Result<AccountSpec, Error>> {
    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    reader.deserialize::<AccountRecord>().map(convert).collect()
}

// Convert from a csv deserialise result into an account spec result.
fn convert(record: Result<AccountRecord, csv::Error>) -> Result<AccountSpec, Error> {
    Ok(record?.try_into()?)
}

// I have an AccountRecord type because I can't directly deserialise into my "domain" type, i.e. AccountSpec.
// See https://github.com/BurntSushi/rust-csv/issues/211.
#[derive(Debug, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "type")]
    kind: String,

    #[serde(rename = "holder")]
    holder_name: String,

    #[serde(rename = "balance")]
    initial_balance: Decimal,

    parameter: Option<Decimal>,
}

impl TryFrom<AccountRecord> for AccountSpec {
    type Error = &'static str;
    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let parameter = match record.parameter {
            Some(parameter) => parameter,
            None => return Err("missing interest rate or overdraft limit"),
        };

        Ok(Self {
            kind_tag: record.kind,
            holder_name: record.holder_name,
            initial_balance: record.initial_balance,
            parameter,
        })
    }
}
