//! The account ledger.
//!
//! Ledger: owns every account, hands out account numbers and coordinates
//! snapshots with a [`Store`](crate::store::Store).
//! Account: a balance plus its append-only transaction log. Savings and
//! current accounts only differ in their withdrawal and interest policies.

pub mod account;
pub mod bank;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use bank::{AccountSpec, BatchReport, InterestSummary, Ledger};
pub use error::{AccountError, LedgerError};
pub use transaction::{Kind, Transaction};

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

// I decided to use a decimal library instead of the built-in f64 type, to be
// safer when dealing with money, and making the decimal precision easier to
// deal with.
pub type Amount = rust_decimal::Decimal;
pub(crate) const DECIMAL_PRECISION: u32 = 4;

const ACCOUNT_NUMBER_PREFIX: &str = "ACC";

/// Identifies an account, e.g. `ACC1001`.
///
/// Account numbers are generated by the [`Ledger`] from a sequence that only
/// ever moves forward, so a number is never handed out twice, even after the
/// account it belonged to was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub(crate) fn from_sequence(sequence: u64) -> Self {
        Self(format!("{ACCOUNT_NUMBER_PREFIX}{sequence}"))
    }

    /// The numeric part of the account number, if it was generated by a ledger.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(ACCOUNT_NUMBER_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountNumber {
    fn from(number: &str) -> Self {
        Self(number.to_string())
    }
}

// Lets the ledger look accounts up by `&str`, straight from user input.
impl Borrow<str> for AccountNumber {
    fn borrow(&self) -> &str {
        &self.0
    }
}
