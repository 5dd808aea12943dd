use crate::ledger::{transaction::Kind, AccountError, Amount};

use super::account::{positive_amount, Account, AccountKind};

impl Account {
    /// Debit `amount` from the account, and return the new balance.
    ///
    /// Savings accounts can't be overdrawn. Current accounts can, down to
    /// their overdraft limit.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, AccountError> {
        let amount = positive_amount(amount)?;

        let available = self.available_to_withdraw();
        if amount > available {
            return Err(match self.kind() {
                AccountKind::Savings { .. } => AccountError::InsufficientFunds {
                    requested: amount,
                    available,
                },
                AccountKind::Current { .. } => AccountError::OverdraftExceeded {
                    requested: amount,
                    available,
                },
            });
        }

        self.balance_mut().subtract(amount)?;
        self.record(Kind::Withdraw, amount);

        Ok(self.balance())
    }

    /// The most that can currently be withdrawn.
    pub fn available_to_withdraw(&self) -> Amount {
        match self.kind() {
            AccountKind::Savings { .. } => self.balance(),
            AccountKind::Current { overdraft_limit } => self
                .balance()
                .checked_add(overdraft_limit)
                .unwrap_or(Amount::MAX),
        }
    }
}
