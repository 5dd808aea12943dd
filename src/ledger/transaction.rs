use super::Amount;
use crate::money;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    AccountOpen, // Opening balance, always the first entry of a log.
    Deposit,     // Credit to the balance.
    Withdraw,    // Debit from the balance.
    Interest,    // Monthly interest credit, savings accounts only.
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` rather than `write_str`, so callers can align the column.
        f.pad(match self {
            Self::AccountOpen => "Account Open",
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
            Self::Interest => "Interest",
        })
    }
}

/// An entry in an account's transaction log.
///
/// Transactions are immutable: they are only ever created by the account
/// they belong to, and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    kind: Kind,
    amount: Amount,
    balance_after: Amount,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    pub(super) fn new(kind: Kind, amount: Amount, balance_after: Amount) -> Self {
        Self {
            kind,
            amount,
            balance_after,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Balance of the account right after this transaction was applied.
    pub fn balance_after(&self) -> Amount {
        self.balance_after
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Human-readable line, e.g.
    /// `[2024-01-31 10:00:00] Deposit        ₹5,000.00 | Balance: ₹15,000.00`.
    pub fn render(&self, currency_symbol: &str) -> String {
        format!(
            "[{}] {:<12} {:>10} | Balance: {}",
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            money::format(self.amount, currency_symbol),
            money::format(self.balance_after, currency_symbol),
        )
    }
}
