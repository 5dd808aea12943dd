use super::{
    Account, AccountError, AccountKind, AccountNumber, Amount, LedgerError, Transaction,
    DECIMAL_PRECISION,
};
use crate::store::{Snapshot, Store, StoreError, SNAPSHOT_VERSION};

use std::collections::{hash_map::Entry, HashMap};
use tracing::{info, warn};

/// Account numbers start at `ACC1001`.
const FIRST_ACCOUNT_SEQUENCE: u64 = 1001;

/// Everything needed to open an account.
///
/// The account type is kept as the raw tag it was given in (`S`, `savings`,
/// `C`, `current`, in any case), so that an unknown tag is reported by the
/// ledger like any other invalid account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSpec {
    pub kind_tag: String,
    pub holder_name: String,
    pub initial_balance: Amount,
    /// Interest rate (in percent) for savings, overdraft limit for current accounts.
    pub parameter: Amount,
}

impl AccountSpec {
    pub fn account_kind(&self) -> Result<AccountKind, LedgerError> {
        match self.kind_tag.trim().to_lowercase().as_str() {
            "s" | "savings" => Ok(AccountKind::Savings {
                interest_rate_percent: self.parameter,
            }),
            "c" | "current" => Ok(AccountKind::Current {
                overdraft_limit: self.parameter,
            }),
            _ => Err(LedgerError::UnrecognizedVariant(self.kind_tag.clone())),
        }
    }
}

/// Outcome of [`Ledger::create_accounts_batch`].
#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    pub created: Vec<AccountNumber>,
    /// Index of the failed spec in the batch, and why it failed.
    pub failures: Vec<(usize, LedgerError)>,
}

/// Outcome of [`Ledger::apply_interest_to_all`].
#[derive(Debug, Default, PartialEq)]
pub struct InterestSummary {
    /// Number of accounts that got an interest transaction.
    pub credited: usize,
    pub total: Amount,
    pub failures: Vec<(AccountNumber, AccountError)>,
}

/// The bank: every account, indexed by account number.
///
/// Every key of `accounts` is the number of the account it points to; the
/// ledger is the only one generating numbers, so that can't be broken.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    accounts: HashMap<AccountNumber, Account>,
    next_sequence: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            next_sequence: FIRST_ACCOUNT_SEQUENCE,
        }
    }

    /// Restore the ledger saved in `store`.
    ///
    /// Not finding anything, or failing to read it, isn't fatal: we log a
    /// warning and start with an empty ledger.
    pub fn open(store: &dyn Store) -> Self {
        match store
            .load()
            .and_then(|snapshot| snapshot.map(Self::restore).transpose())
        {
            Ok(Some(ledger)) => {
                info!(accounts = ledger.len(), "ledger restored");
                ledger
            }
            Ok(None) => {
                warn!("no previous data found, starting fresh");
                Self::new()
            }
            Err(err) => {
                warn!(%err, "failed to restore ledger, starting fresh");
                Self::new()
            }
        }
    }

    /// Persist the whole ledger to `store`.
    pub fn save(&self, store: &dyn Store) -> Result<(), StoreError> {
        store.save(&self.snapshot())?;
        info!(accounts = self.len(), "ledger saved");

        Ok(())
    }

    /// The full state of the ledger. Accounts are ordered by account number.
    pub fn snapshot(&self) -> Snapshot {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| by_account_number(a.number(), b.number()));

        Snapshot {
            version: SNAPSHOT_VERSION,
            next_account_number: self.next_sequence,
            accounts,
        }
    }

    /// Rebuild a ledger from a snapshot, checking it on the way.
    ///
    /// Every account must agree with its own transaction log, follow the
    /// same rules `create_account` enforces, and stay within what it may
    /// withdraw. Account numbers must be unique. The sequence is moved past
    /// every restored account number, so numbers are never handed out twice.
    pub fn restore(snapshot: Snapshot) -> Result<Self, StoreError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion(snapshot.version));
        }

        let mut next_sequence = snapshot.next_account_number.max(FIRST_ACCOUNT_SEQUENCE);
        let mut accounts = HashMap::with_capacity(snapshot.accounts.len());

        for account in snapshot.accounts {
            if !account.is_consistent() {
                return Err(StoreError::Corrupt(format!(
                    "balance of {} doesn't match its transactions",
                    account.number()
                )));
            }
            check_restored(&account).map_err(|err| {
                StoreError::Corrupt(format!("account {}: {err}", account.number()))
            })?;

            if let Some(sequence) = account.number().sequence() {
                next_sequence = next_sequence.max(sequence.saturating_add(1));
            }

            match accounts.entry(account.number().clone()) {
                Entry::Occupied(entry) => {
                    return Err(StoreError::Corrupt(format!(
                        "duplicate account {}",
                        entry.key()
                    )))
                }
                Entry::Vacant(entry) => {
                    entry.insert(account);
                }
            }
        }

        // The last number can't be handed out without overflowing the sequence.
        if next_sequence == u64::MAX {
            return Err(StoreError::Corrupt(
                "account number sequence is exhausted".to_string(),
            ));
        }

        Ok(Self {
            accounts,
            next_sequence,
        })
    }

    /// Open a new account, and return its number.
    ///
    /// The opening balance, interest rate and overdraft limit can't be
    /// negative, and the holder needs a name.
    pub fn create_account(
        &mut self,
        kind: AccountKind,
        holder_name: &str,
        initial_balance: Amount,
    ) -> Result<AccountNumber, LedgerError> {
        let holder_name = valid_holder_name(holder_name)?;
        let initial_balance = non_negative("opening balance", initial_balance)?;
        let kind = valid_kind(kind)?;

        let number = self.next_account_number()?;
        self.accounts.insert(
            number.clone(),
            Account::open(number.clone(), holder_name.to_string(), kind, initial_balance),
        );
        info!(account = %number, kind = kind.name(), "account opened");

        Ok(number)
    }

    /// Open one account per spec, in order.
    ///
    /// A spec that can't be opened is skipped and reported; it never stops
    /// the rest of the batch.
    pub fn create_accounts_batch(
        &mut self,
        specs: impl IntoIterator<Item = AccountSpec>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, spec) in specs.into_iter().enumerate() {
            let created = spec.account_kind().and_then(|kind| {
                self.create_account(kind, &spec.holder_name, spec.initial_balance)
            });

            match created {
                Ok(number) => report.created.push(number),
                Err(err) => {
                    warn!(index, %err, "skipping account");
                    report.failures.push((index, err));
                }
            }
        }

        report
    }

    pub fn find_account(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    fn account_mut(&mut self, number: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(number)
            .ok_or_else(|| LedgerError::NotFound(number.into()))
    }

    fn account(&self, number: &str) -> Result<&Account, LedgerError> {
        self.find_account(number)
            .ok_or_else(|| LedgerError::NotFound(number.into()))
    }

    /// Deposit into an account, and return its new balance.
    pub fn deposit(&mut self, number: &str, amount: Amount) -> Result<Amount, LedgerError> {
        Ok(self.account_mut(number)?.deposit(amount)?)
    }

    /// Withdraw from an account, and return its new balance.
    pub fn withdraw(&mut self, number: &str, amount: Amount) -> Result<Amount, LedgerError> {
        Ok(self.account_mut(number)?.withdraw(amount)?)
    }

    pub fn balance(&self, number: &str) -> Result<Amount, LedgerError> {
        Ok(self.account(number)?.balance())
    }

    pub fn history(&self, number: &str) -> Result<&[Transaction], LedgerError> {
        Ok(self.account(number)?.history())
    }

    /// Apply monthly interest to every account.
    ///
    /// Accounts that don't earn interest are left as they are, and an
    /// account failing doesn't stop the others from being credited.
    pub fn apply_interest_to_all(&mut self) -> InterestSummary {
        let mut summary = InterestSummary::default();

        for account in self.accounts.values_mut() {
            match account.apply_monthly_interest() {
                Ok(Some(interest)) => {
                    summary.credited += 1;
                    summary.total = summary.total.saturating_add(interest);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(account = %account.number(), %err, "failed to apply interest");
                    summary.failures.push((account.number().clone(), err));
                }
            }
        }
        info!(
            credited = summary.credited,
            total = %summary.total,
            "monthly interest applied"
        );

        summary
    }

    /// Remove an account, along with its history.
    /// Returns the removed account, or `None` if there was no such account.
    pub fn delete_account(&mut self, number: &str) -> Option<Account> {
        let removed = self.accounts.remove(number)?;
        info!(account = %number, "account deleted");

        Some(removed)
    }

    /// Every account, in no particular order.
    /// The order is stable as long as the ledger isn't modified.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn next_account_number(&mut self) -> Result<AccountNumber, LedgerError> {
        loop {
            let number = AccountNumber::from_sequence(self.next_sequence);
            self.next_sequence = self
                .next_sequence
                .checked_add(1)
                .ok_or(LedgerError::AccountNumbersExhausted)?;

            if !self.accounts.contains_key(&number) {
                return Ok(number);
            }
        }
    }
}

/// Generated numbers sort numerically (`ACC999` before `ACC1000`), anything
/// else after them, alphabetically.
pub(crate) fn by_account_number(a: &AccountNumber, b: &AccountNumber) -> std::cmp::Ordering {
    match (a.sequence(), b.sequence()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn valid_holder_name(holder_name: &str) -> Result<&str, LedgerError> {
    let holder_name = holder_name.trim();
    if holder_name.is_empty() {
        return Err(LedgerError::InvalidParameter(
            "holder name can't be empty".to_string(),
        ));
    }

    Ok(holder_name)
}

fn valid_kind(kind: AccountKind) -> Result<AccountKind, LedgerError> {
    Ok(match kind {
        AccountKind::Savings {
            interest_rate_percent,
        } => AccountKind::Savings {
            interest_rate_percent: non_negative("interest rate", interest_rate_percent)?,
        },
        AccountKind::Current { overdraft_limit } => AccountKind::Current {
            overdraft_limit: non_negative("overdraft limit", overdraft_limit)?,
        },
    })
}

/// Whether a restored account is one the ledger could have produced.
/// The transaction log must already be known to be consistent.
fn check_restored(account: &Account) -> Result<(), LedgerError> {
    valid_holder_name(account.holder_name())?;
    valid_kind(account.kind())?;
    if let Some(opening) = account.history().first() {
        non_negative("opening balance", opening.amount())?;
    }

    if account.available_to_withdraw() < Amount::ZERO {
        return Err(LedgerError::InvalidParameter(format!(
            "balance {} is below what the {} account allows",
            account.balance(),
            account.kind().name().to_lowercase()
        )));
    }

    Ok(())
}

fn non_negative(what: &str, amount: Amount) -> Result<Amount, LedgerError> {
    let rounded = amount.round_dp(DECIMAL_PRECISION);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        return Err(LedgerError::InvalidParameter(format!(
            "{what} can't be negative, got {amount}"
        )));
    }

    Ok(rounded)
}
