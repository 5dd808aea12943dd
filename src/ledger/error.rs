//! Errors returned by account and ledger operations.
//!
//! None of these are fatal: the caller reports them and carries on.

use super::{AccountNumber, Amount};
use thiserror::Error;

/// Errors that can occur when applying an operation to a single account.
///
/// A failed operation never changes the account: its balance and
/// transaction log are left exactly as they were.
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    /// Deposits and withdrawals must be strictly positive.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Amount),

    /// A savings withdrawal exceeds the balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    /// A current account withdrawal exceeds the balance plus the overdraft limit.
    #[error("overdraft limit exceeded: requested {requested}, available {available}")]
    OverdraftExceeded { requested: Amount, available: Amount },

    /// The new balance can't be represented.
    #[error("balance would overflow")]
    Overflow,
}

/// Errors returned by the [`Ledger`](super::Ledger).
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    NotFound(AccountNumber),

    /// The account type tag is neither savings nor current.
    #[error("unrecognized account type: {0:?}")]
    UnrecognizedVariant(String),

    /// Negative opening balance, interest rate or overdraft limit, or an empty holder name.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every account number has been handed out.
    #[error("no account numbers left")]
    AccountNumbersExhausted,

    #[error(transparent)]
    Account(#[from] AccountError),
}
