use crate::ledger::{AccountError, Amount};

use serde::{Deserialize, Serialize};

/// The current balance of an account.
///
/// All arithmetic is checked: an operation that would overflow returns an
/// error and leaves the balance untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(Amount);

impl Balance {
    pub const fn new(amount: Amount) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Amount {
        self.0
    }

    pub fn add(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.0 = self.0.checked_add(amount).ok_or(AccountError::Overflow)?;

        Ok(())
    }

    pub fn subtract(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.0 = self.0.checked_sub(amount).ok_or(AccountError::Overflow)?;

        Ok(())
    }
}
