use crate::ledger::{transaction::Kind, AccountError, Amount, DECIMAL_PRECISION};

use super::account::{Account, AccountKind};
use rust_decimal_macros::dec;

impl Account {
    /// Credit one month of interest, and return the amount credited.
    ///
    /// Savings accounts always get an `Interest` transaction, even when the
    /// interest amounts to zero. Current accounts earn nothing: `Ok(None)`,
    /// and the log is left untouched.
    pub fn apply_monthly_interest(&mut self) -> Result<Option<Amount>, AccountError> {
        let rate = match self.kind() {
            AccountKind::Savings {
                interest_rate_percent,
            } => interest_rate_percent,
            AccountKind::Current { .. } => return Ok(None),
        };

        let interest = self
            .balance()
            .checked_mul(rate)
            .and_then(|product| product.checked_div(dec!(100)))
            .ok_or(AccountError::Overflow)?
            .round_dp(DECIMAL_PRECISION);

        self.balance_mut().add(interest)?;
        self.record(Kind::Interest, interest);

        Ok(Some(interest))
    }
}
