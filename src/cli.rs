//! The interactive menu.
//!
//! Reads choices line by line, calls the matching ledger operation, and
//! prints the outcome. A failed operation is reported and the menu comes
//! back; only `0` or the end of the input ends the session.

use crate::ledger::{bank::by_account_number, Account, AccountKind, AccountSpec, Amount, Ledger};
use crate::money;

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

const MENU: &str = "
================= BANK MENU =================
1. Open New Account
2. Open Several Accounts
3. Deposit
4. Withdraw
5. Check Balance
6. Transaction History
7. Apply Interest to Savings
8. Show All Accounts
9. Delete an Account
0. Exit
=============================================";

const SEPARATOR: &str = "--------------------------------------------------------------";

pub struct Session<'a, R, W> {
    ledger: &'a mut Ledger,
    input: R,
    output: W,
    currency_symbol: &'a str,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(ledger: &'a mut Ledger, input: R, output: W, currency_symbol: &'a str) -> Self {
        Self {
            ledger,
            input,
            output,
            currency_symbol,
        }
    }

    /// Run the menu until the user exits, or the input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let result = match self.prompt("Enter choice: ") {
                Ok(choice) => match choice.as_str() {
                    "1" => self.open_account(),
                    "2" => self.open_accounts(),
                    "3" => self.deposit(),
                    "4" => self.withdraw(),
                    "5" => self.check_balance(),
                    "6" => self.show_history(),
                    "7" => self.apply_interest(),
                    "8" => self.show_accounts(),
                    "9" => self.delete_account(),
                    "0" => return Ok(()),
                    other => writeln!(self.output, "Invalid choice: {other:?}"),
                },
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Print `label` and read the next line, trimmed.
    /// Running out of input is an `UnexpectedEof` error.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        Ok(line.trim().to_string())
    }

    /// Like `prompt`, for a number. An unparseable answer is reported, and
    /// gives `None`.
    fn prompt_number<T: FromStr>(&mut self, label: &str) -> io::Result<Option<T>> {
        let answer = self.prompt(label)?;
        match answer.parse() {
            Ok(number) => Ok(Some(number)),
            Err(_) => {
                writeln!(self.output, "Not a valid number: {answer:?}")?;
                Ok(None)
            }
        }
    }

    /// Ask for an account number, and make sure the account exists.
    fn prompt_account(&mut self) -> io::Result<Option<String>> {
        let number = self.prompt("Account Number: ")?;
        if self.ledger.find_account(&number).is_none() {
            writeln!(self.output, "Account not found: {number}")?;
            return Ok(None);
        }

        Ok(Some(number))
    }

    /// Ask for the details of one account. The interest rate or overdraft
    /// limit is only asked for once the type is known; with an unknown type
    /// the `AccountSpec` is still returned, for the ledger to reject.
    fn prompt_spec(&mut self) -> io::Result<Option<AccountSpec>> {
        let holder_name = self.prompt("Holder Name: ")?;
        let Some(initial_balance) = self.prompt_number::<Amount>("Initial Balance: ")? else {
            return Ok(None);
        };
        let kind_tag = self.prompt("Type (S for Savings / C for Current): ")?;

        let mut spec = AccountSpec {
            kind_tag,
            holder_name,
            initial_balance,
            parameter: Amount::ZERO,
        };
        let label = match spec.account_kind() {
            Ok(AccountKind::Savings { .. }) => "Interest Rate (%): ",
            Ok(AccountKind::Current { .. }) => "Overdraft Limit: ",
            Err(_) => return Ok(Some(spec)),
        };
        let Some(parameter) = self.prompt_number::<Amount>(label)? else {
            return Ok(None);
        };
        spec.parameter = parameter;

        Ok(Some(spec))
    }

    fn open_account(&mut self) -> io::Result<()> {
        let Some(spec) = self.prompt_spec()? else {
            return Ok(());
        };

        let opened = spec.account_kind().and_then(|kind| {
            self.ledger
                .create_account(kind, &spec.holder_name, spec.initial_balance)
                .map(|number| (kind, number))
        });
        match opened {
            Ok((kind, number)) => writeln!(self.output, "{} account opened: {number}", kind.name()),
            Err(err) => writeln!(self.output, "Error: {err}"),
        }
    }

    fn open_accounts(&mut self) -> io::Result<()> {
        let Some(count) = self.prompt_number::<usize>("How many accounts do you want to open? ")?
        else {
            return Ok(());
        };

        // Position of each spec in the batch -> number the user knows it by.
        let mut specs = Vec::new();
        let mut positions = Vec::new();
        // Input running out still opens what was entered before it did.
        let mut eof = None;
        for position in 1..=count {
            writeln!(self.output, "\nDetails for account {position}:")?;
            match self.prompt_spec() {
                Ok(Some(spec)) => {
                    specs.push(spec);
                    positions.push(position);
                }
                Ok(None) => writeln!(self.output, "Skipping account {position}.")?,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    eof = Some(err);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let report = self.ledger.create_accounts_batch(specs);
        writeln!(self.output)?;
        for number in &report.created {
            writeln!(self.output, "Account opened: {number}")?;
        }
        for (index, err) in &report.failures {
            writeln!(self.output, "Account {} skipped: {err}", positions[*index])?;
        }
        writeln!(
            self.output,
            "{} of {count} accounts opened.",
            report.created.len()
        )?;

        match eof {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn deposit(&mut self) -> io::Result<()> {
        let Some(number) = self.prompt_account()? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_number::<Amount>("Deposit Amount: ")? else {
            return Ok(());
        };

        match self.ledger.deposit(&number, amount) {
            Ok(balance) => {
                let balance = self.format(balance);
                writeln!(self.output, "Deposit successful. New balance: {balance}")
            }
            Err(err) => writeln!(self.output, "Error: {err}"),
        }
    }

    fn withdraw(&mut self) -> io::Result<()> {
        let Some(number) = self.prompt_account()? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_number::<Amount>("Withdraw Amount: ")? else {
            return Ok(());
        };

        match self.ledger.withdraw(&number, amount) {
            Ok(balance) => {
                let balance = self.format(balance);
                writeln!(self.output, "Withdrawal successful. New balance: {balance}")
            }
            Err(err) => writeln!(self.output, "Error: {err}"),
        }
    }

    fn check_balance(&mut self) -> io::Result<()> {
        let number = self.prompt("Account Number: ")?;

        match self.ledger.balance(&number) {
            Ok(balance) => {
                let balance = self.format(balance);
                writeln!(self.output, "Balance: {balance}")
            }
            Err(err) => writeln!(self.output, "Error: {err}"),
        }
    }

    fn show_history(&mut self) -> io::Result<()> {
        let number = self.prompt("Account Number: ")?;
        let Some(account) = self.ledger.find_account(&number) else {
            return writeln!(self.output, "Account not found: {number}");
        };

        writeln!(
            self.output,
            "\nTransaction History - {} ({})\n{SEPARATOR}",
            account.holder_name(),
            account.number()
        )?;
        for tx in account.history() {
            writeln!(self.output, "{}", tx.render(self.currency_symbol))?;
        }

        Ok(())
    }

    fn apply_interest(&mut self) -> io::Result<()> {
        let summary = self.ledger.apply_interest_to_all();

        for (number, err) in &summary.failures {
            writeln!(self.output, "Error: no interest for {number}: {err}")?;
        }
        let total = self.format(summary.total);
        writeln!(
            self.output,
            "Interest applied to {} savings accounts, {total} in total.",
            summary.credited
        )
    }

    fn show_accounts(&mut self) -> io::Result<()> {
        if self.ledger.is_empty() {
            return writeln!(self.output, "No accounts yet.");
        }

        let mut accounts: Vec<&Account> = self.ledger.accounts().collect();
        accounts.sort_by(|a, b| by_account_number(a.number(), b.number()));

        writeln!(self.output, "\nBank Accounts:\n{SEPARATOR}")?;
        for account in accounts {
            writeln!(self.output, "{}", account.render(self.currency_symbol))?;
        }

        Ok(())
    }

    fn delete_account(&mut self) -> io::Result<()> {
        let number = self.prompt("Enter Account Number to delete: ")?;

        match self.ledger.delete_account(&number) {
            Some(account) => writeln!(
                self.output,
                "Account {number} ({}) deleted.",
                account.holder_name()
            ),
            None => writeln!(self.output, "Account not found: {number}"),
        }
    }

    fn format(&self, amount: Amount) -> String {
        money::format(amount, self.currency_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::ledger::{AccountKind, Kind, Ledger};

    use rust_decimal_macros::dec;
    use std::io::Cursor;

    /// Run a whole session on `input`, and return what was printed.
    fn run(ledger: &mut Ledger, input: &str) -> String {
        let mut output = Vec::new();
        Session::new(ledger, Cursor::new(input), &mut output, "₹")
            .run()
            .expect("session should not fail");

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_open_accounts_input_ends_mid_batch() {
        let mut ledger = Ledger::new();
        let output = run(&mut ledger, "2\n2\nA\n10\nS\n1\n");

        assert!(output.contains("Account opened: ACC1001"), "{}", output);
        assert!(output.contains("1 of 2 accounts opened."), "{}", output);
        assert_eq!(1, ledger.len());
        assert_eq!(Ok(dec!(10)), ledger.balance("ACC1001"));
    }

    #[test]
    fn test_open_deposit_withdraw() {
        let mut ledger = Ledger::new();
        let output = run(
            &mut ledger,
            "1\nA\n10000\nS\n5\n\
             3\nACC1001\n5000\n\
             4\nACC1001\n25000\n\
             5\nACC1001\n\
             0\n",
        );

        assert!(output.contains("Savings account opened: ACC1001"), "{}", output);
        assert!(output.contains("Deposit successful. New balance: ₹15,000.00"));
        assert!(output.contains("Error: insufficient funds"));
        assert!(output.contains("Balance: ₹15,000.00"));
        assert_eq!(Ok(dec!(15000)), ledger.balance("ACC1001"));
    }

    #[test]
    fn test_current_account_overdraft() {
        let mut ledger = Ledger::new();
        let output = run(
            &mut ledger,
            "1\nB\n0\nc\n500\n4\nACC1001\n300\n4\nACC1001\n300\n0\n",
        );

        assert!(output.contains("Current account opened: ACC1001"));
        assert!(output.contains("Withdrawal successful. New balance: -₹300.00"));
        assert!(output.contains("Error: overdraft limit exceeded"));
        assert_eq!(Ok(dec!(-300)), ledger.balance("ACC1001"));
    }

    #[test]
    fn test_open_several_accounts() {
        let mut ledger = Ledger::new();
        let output = run(
            &mut ledger,
            "2\n3\n\
             A\n100\nS\n4\n\
             B\n100\nX\n\
             C\n50\nC\n500\n\
             0\n",
        );

        assert!(output.contains("Account opened: ACC1001"), "{}", output);
        assert!(output.contains("Account opened: ACC1002"));
        assert!(output.contains("Account 2 skipped: unrecognized account type: \"X\""));
        assert!(output.contains("2 of 3 accounts opened."));
        assert_eq!(2, ledger.len());
        assert_eq!("C", ledger.find_account("ACC1002").unwrap().holder_name());
    }

    #[test]
    fn test_open_several_accounts_with_a_bad_balance() {
        let mut ledger = Ledger::new();
        let output = run(&mut ledger, "2\n2\nA\nlots\nB\n10\ns\n1\n0\n");

        assert!(output.contains("Not a valid number: \"lots\""), "{}", output);
        assert!(output.contains("Skipping account 1."));
        assert!(output.contains("1 of 2 accounts opened."));
        assert_eq!("B", ledger.find_account("ACC1001").unwrap().holder_name());
    }

    #[test]
    fn test_negative_opening_balance_is_rejected() {
        let mut ledger = Ledger::new();
        let output = run(&mut ledger, "1\nA\n-5\nS\n5\n0\n");

        assert!(output.contains("Error: invalid parameter: opening balance"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unknown_account() {
        let mut ledger = Ledger::new();
        let output = run(
            &mut ledger,
            "3\nACC42\n4\nACC42\n5\nACC42\n6\nACC42\n9\nACC42\n0\n",
        );

        assert_eq!(4, output.matches("Account not found: ACC42").count(), "{}", output);
        assert!(output.contains("Error: account not found: ACC42"));
    }

    #[test]
    fn test_history() {
        let mut ledger = Ledger::new();
        ledger
            .create_account(
                AccountKind::Savings {
                    interest_rate_percent: dec!(5),
                },
                "Jane",
                dec!(1000),
            )
            .unwrap();
        ledger.deposit("ACC1001", dec!(500)).unwrap();

        let output = run(&mut ledger, "6\nACC1001\n0\n");
        assert!(output.contains("Transaction History - Jane (ACC1001)"), "{}", output);
        assert!(output.contains("Account Open  ₹1,000.00 | Balance: ₹1,000.00"));
        assert!(output.contains("Deposit         ₹500.00 | Balance: ₹1,500.00"));
    }

    #[test]
    fn test_apply_interest() {
        let mut ledger = Ledger::new();
        ledger
            .create_account(
                AccountKind::Savings {
                    interest_rate_percent: dec!(5),
                },
                "A",
                dec!(10000),
            )
            .unwrap();
        ledger
            .create_account(
                AccountKind::Current {
                    overdraft_limit: dec!(0),
                },
                "B",
                dec!(10000),
            )
            .unwrap();

        let output = run(&mut ledger, "7\n0\n");
        assert!(
            output.contains("Interest applied to 1 savings accounts, ₹500.00 in total."),
            "{}",
            output
        );
        let history = ledger.history("ACC1001").unwrap();
        assert_eq!(Kind::Interest, history.last().unwrap().kind());
    }

    #[test]
    fn test_show_and_delete_accounts() {
        let mut ledger = Ledger::new();
        let output = run(&mut ledger, "8\n0\n");
        assert!(output.contains("No accounts yet."));

        let output = run(
            &mut ledger,
            "1\nA\n10\nC\n0\n1\nB\n1234.5\nS\n1\n8\n9\nACC1001\n8\n0\n",
        );
        assert!(output.contains("ACC1001    | A               | Balance: ₹10.00"), "{}", output);
        assert!(output.contains("ACC1002    | B               | Balance: ₹1,234.50"));
        assert!(output.contains("Account ACC1001 (A) deleted."));
        assert_eq!(1, output.matches("ACC1001    |").count());
        assert!(ledger.find_account("ACC1001").is_none());
    }

    #[test]
    fn test_invalid_input_keeps_the_session_going() {
        let mut ledger = Ledger::new();
        let output = run(&mut ledger, "42\nhello\n3\n0\n");

        assert!(output.contains("Invalid choice: \"42\""), "{}", output);
        assert!(output.contains("Invalid choice: \"hello\""));
        // "3" asks for an account, and "0" is not one.
        assert!(output.contains("Account not found: 0"));
    }

    #[test]
    fn test_end_of_input_ends_the_session() {
        let mut ledger = Ledger::new();
        run(&mut ledger, "");
        run(&mut ledger, "1\nA\n");

        assert!(ledger.is_empty());
    }
}
