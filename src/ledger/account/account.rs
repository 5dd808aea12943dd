use crate::ledger::{
    transaction::{Kind, Transaction},
    AccountError, AccountNumber, Amount, DECIMAL_PRECISION,
};
use crate::money;

use super::balance::Balance;
use serde::{Deserialize, Serialize};

/// What kind of account this is, along with the parameters of its policies.
///
/// Both parameters are fixed when the account is opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    /// Earns `interest_rate_percent` of its balance every time monthly
    /// interest is applied. Can't go below zero.
    Savings { interest_rate_percent: Amount },

    /// Can go below zero, down to `-overdraft_limit`. Earns no interest.
    Current { overdraft_limit: Amount },
}

impl AccountKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Savings { .. } => "Savings",
            Self::Current { .. } => "Current",
        }
    }
}

/// A holder's balance, along with every transaction that led to it.
///
/// The transaction log is append-only, and is never empty: the opening
/// balance is always recorded as its first entry. The balance always equals
/// the `balance_after` of the last transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    holder_name: String,
    kind: AccountKind,
    balance: Balance,
    transactions: Vec<Transaction>,
}

impl Account {
    pub(crate) fn open(
        number: AccountNumber,
        holder_name: String,
        kind: AccountKind,
        initial_balance: Amount,
    ) -> Self {
        Self {
            number,
            holder_name,
            kind,
            balance: Balance::new(initial_balance),
            transactions: vec![Transaction::new(
                Kind::AccountOpen,
                initial_balance,
                initial_balance,
            )],
        }
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Amount {
        self.balance.amount()
    }

    /// Every transaction applied to this account, oldest first.
    pub fn history(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Appends a transaction for the current balance.
    /// Must be called right after the balance was updated.
    pub(super) fn record(&mut self, kind: Kind, amount: Amount) {
        self.transactions
            .push(Transaction::new(kind, amount, self.balance.amount()));
    }

    pub(super) fn balance_mut(&mut self) -> &mut Balance {
        &mut self.balance
    }

    /// Rebuild the balance from the transaction log alone.
    ///
    /// Returns `None` if the log is empty, doesn't start with the opening
    /// balance, holds an entry the account could never have recorded
    /// (a non-positive deposit or withdrawal, negative interest, a
    /// `balance_after` that doesn't follow from the previous entries), or
    /// can't be summed without overflowing.
    pub fn replay_balance(&self) -> Option<Amount> {
        let (opening, rest) = self.transactions.split_first()?;
        if opening.kind() != Kind::AccountOpen || opening.amount() != opening.balance_after() {
            return None;
        }

        rest.iter().try_fold(opening.amount(), |balance, tx| {
            let replayed = match tx.kind() {
                Kind::Deposit if tx.amount() > Amount::ZERO => balance.checked_add(tx.amount()),
                Kind::Interest if tx.amount() >= Amount::ZERO => balance.checked_add(tx.amount()),
                Kind::Withdraw if tx.amount() > Amount::ZERO => balance.checked_sub(tx.amount()),
                _ => None,
            }?;

            (replayed == tx.balance_after()).then_some(replayed)
        })
    }

    /// Whether the balance agrees with the transaction log.
    pub(crate) fn is_consistent(&self) -> bool {
        let last_balance = self.transactions.last().map(Transaction::balance_after);

        last_balance == Some(self.balance()) && self.replay_balance() == Some(self.balance())
    }

    /// Human-readable line, e.g. `ACC1001    | Jane Doe        | Balance: ₹10,000.00`.
    pub fn render(&self, currency_symbol: &str) -> String {
        format!(
            "{:<10} | {:<15} | Balance: {}",
            self.number.as_str(),
            self.holder_name,
            money::format(self.balance(), currency_symbol),
        )
    }
}

/// Amounts are rounded to the ledger precision before use.
/// Anything that isn't strictly positive once rounded is rejected.
pub(super) fn positive_amount(amount: Amount) -> Result<Amount, AccountError> {
    let rounded = amount.round_dp(DECIMAL_PRECISION);
    if rounded <= Amount::ZERO {
        return Err(AccountError::InvalidAmount(amount));
    }

    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use crate::ledger::{
        account::{
            account::{positive_amount, Account, AccountKind},
            balance::Balance,
        },
        transaction::{Kind, Transaction},
        AccountError, AccountNumber,
    };

    use rust_decimal_macros::dec;

    fn savings() -> Account {
        Account::open(
            AccountNumber::from("ACC1001"),
            "A".to_string(),
            AccountKind::Savings {
                interest_rate_percent: dec!(5),
            },
            dec!(10000),
        )
    }

    #[test]
    fn test_open_records_the_opening_balance() {
        let acc = savings();

        assert_eq!(dec!(10000), acc.balance());
        assert_eq!(1, acc.history().len());

        let opening = &acc.history()[0];
        assert_eq!(Kind::AccountOpen, opening.kind());
        assert_eq!(dec!(10000), opening.amount());
        assert_eq!(dec!(10000), opening.balance_after());
        assert!(acc.is_consistent());
    }

    #[test]
    fn test_replay_balance() {
        let mut acc = savings();
        acc.deposit(dec!(5000)).expect("should deposit");
        acc.withdraw(dec!(2500.5)).expect("should withdraw");
        acc.apply_monthly_interest().expect("should apply interest");
        let _ = acc.withdraw(dec!(1000000));
        let _ = acc.deposit(dec!(-3));

        // 10000 + 5000 - 2500.5 = 12499.5, then 5% interest.
        assert_eq!(dec!(13124.475), acc.balance());
        assert_eq!(Some(acc.balance()), acc.replay_balance());
        assert_eq!(4, acc.history().len());
        assert!(acc.is_consistent());
    }

    #[test]
    fn test_tampered_balance_is_inconsistent() {
        let mut acc = savings();
        acc.balance_mut().add(dec!(1)).expect("should not overflow");

        assert!(!acc.is_consistent());
    }

    #[test]
    fn test_replay_rejects_entries_that_could_not_be_recorded() {
        for (kind, amount, balance_after) in vec![
            (Kind::Deposit, dec!(-100), dec!(9900)),
            (Kind::Deposit, dec!(0), dec!(10000)),
            (Kind::Withdraw, dec!(-100), dec!(10100)),
            (Kind::Interest, dec!(-5000), dec!(5000)),
            (Kind::AccountOpen, dec!(1), dec!(10001)),
            // Amount is fine, but the balance after it doesn't follow.
            (Kind::Deposit, dec!(100), dec!(20000)),
        ] {
            let mut acc = savings();
            acc.transactions
                .push(Transaction::new(kind, amount, balance_after));
            acc.balance = Balance::new(balance_after);

            assert_eq!(None, acc.replay_balance(), "{:?} {}", kind, amount);
            assert!(!acc.is_consistent());
        }
    }

    #[test]
    fn test_replay_accepts_zero_interest() {
        let mut acc = savings();
        acc.transactions
            .push(Transaction::new(Kind::Interest, dec!(0), dec!(10000)));

        assert_eq!(Some(dec!(10000)), acc.replay_balance());
        assert!(acc.is_consistent());
    }

    #[test]
    fn test_positive_amount() {
        for (raw, want) in vec![
            (dec!(1), Ok(dec!(1))),
            (dec!(1.23456), Ok(dec!(1.2346))),
            (dec!(0), Err(AccountError::InvalidAmount(dec!(0)))),
            (dec!(-5), Err(AccountError::InvalidAmount(dec!(-5)))),
            (
                dec!(0.00001),
                Err(AccountError::InvalidAmount(dec!(0.00001))),
            ),
        ] {
            assert_eq!(want, positive_amount(raw), "{}", raw);
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(
            "ACC1001    | A               | Balance: ₹10,000.00",
            savings().render("₹")
        );
    }
}
