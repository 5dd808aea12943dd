#[allow(clippy::module_inception)]
mod account;
mod balance;
mod deposit;
mod interest;
mod withdrawal;

pub use account::{Account, AccountKind};
