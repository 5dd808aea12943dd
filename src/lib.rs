//! A bank account ledger.
//!
//! Savings and current accounts, each with its own transaction history,
//! deposits, withdrawals, monthly interest, and a [`store`] to keep the
//! ledger between sessions.

pub mod cli;
pub mod config;
pub mod input;
pub mod ledger;
pub mod money;
pub mod output;
pub mod store;
