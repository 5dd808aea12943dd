use crate::ledger::{transaction::Kind, AccountError, Amount};

use super::account::{positive_amount, Account};

impl Account {
    /// Credit `amount` to the account, and return the new balance.
    /// Deposits behave the same for every kind of account.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, AccountError> {
        let amount = positive_amount(amount)?;

        self.balance_mut().add(amount)?;
        self.record(Kind::Deposit, amount);

        Ok(self.balance())
    }
}

#[cfg(test)]
mod deposit_tests {
    use crate::ledger::{transaction::Kind, AccountError, AccountKind, AccountNumber};

    use super::Account;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn current(balance: Decimal) -> Account {
        Account::open(
            AccountNumber::from("ACC1"),
            "B".to_string(),
            AccountKind::Current {
                overdraft_limit: dec!(500),
            },
            balance,
        )
    }

    #[test]
    fn test_deposit_ok() {
        let mut acc = current(dec!(10000));

        let got = acc.deposit(dec!(5000));
        assert_eq!(Ok(dec!(15000)), got);
        assert_eq!(dec!(15000), acc.balance());
        assert_eq!(2, acc.history().len());

        let last = acc.history().last().unwrap();
        assert_eq!(Kind::Deposit, last.kind());
        assert_eq!(dec!(5000), last.amount());
        assert_eq!(dec!(15000), last.balance_after());
    }

    #[test]
    fn test_deposit_into_overdrawn_account() {
        let mut acc = current(dec!(0));
        acc.withdraw(dec!(300)).expect("should withdraw within overdraft");

        assert_eq!(Ok(dec!(-100)), acc.deposit(dec!(200)));
    }

    #[test]
    fn test_deposit_non_positive_amount() {
        for amount in vec![dec!(0), dec!(-0.01), dec!(-5000)] {
            let mut acc = current(dec!(99.99));

            let got = acc.deposit(amount);
            assert_eq!(Err(AccountError::InvalidAmount(amount)), got);
            assert_eq!(dec!(99.99), acc.balance());
            assert_eq!(1, acc.history().len());
        }
    }

    #[test]
    fn test_deposit_overflow() {
        let mut acc = current(Decimal::MAX);

        assert_eq!(Err(AccountError::Overflow), acc.deposit(dec!(1)));
        assert_eq!(Decimal::MAX, acc.balance());
        assert_eq!(1, acc.history().len());
    }
}
