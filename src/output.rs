use crate::ledger::{bank::by_account_number, Account, Amount};

use serde::Serialize;

#[derive(Serialize)]
struct AccountRecord<'a> {
    #[serde(rename = "account")]
    number: &'a str,

    #[serde(rename = "holder")]
    holder_name: &'a str,

    #[serde(rename = "type")]
    kind: &'static str,

    balance: Amount,

    transactions: usize,
}

impl<'a> AccountRecord<'a> {
    fn new(acc: &'a Account) -> Self {
        Self {
            number: acc.number().as_str(),
            holder_name: acc.holder_name(),
            kind: acc.kind().name(),
            balance: acc.balance(),
            transactions: acc.history().len(),
        }
    }
}

// Writes a summary of the given accounts to the given stream, ordered by
// account number.
pub fn write<'a>(
    output_stream: impl std::io::Write,
    accounts: impl IntoIterator<Item = &'a Account>,
) -> Result<(), csv::Error> {
    let mut accounts: Vec<&Account> = accounts.into_iter().collect();
    accounts.sort_by(|a, b| by_account_number(a.number(), b.number()));

    let mut writer = csv::Writer::from_writer(output_stream);
    for account in accounts {
        writer.serialize(AccountRecord::new(account))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod write_tests {
    use crate::ledger::{AccountKind, Ledger};

    use rust_decimal_macros::dec;

    #[test]
    fn test_write_accounts() {
        let mut ledger = Ledger::new();
        for (holder_name, kind, balance) in vec![
            (
                "Jane Doe",
                AccountKind::Savings {
                    interest_rate_percent: dec!(5),
                },
                dec!(10000),
            ),
            (
                "John Doe",
                AccountKind::Current {
                    overdraft_limit: dec!(500),
                },
                dec!(1.234),
            ),
        ] {
            ledger.create_account(kind, holder_name, balance).unwrap();
        }
        ledger.withdraw("ACC1002", dec!(100)).unwrap();

        let mut output_stream = Vec::new();
        super::write(&mut output_stream, ledger.accounts()).unwrap();

        let want = r#"account,holder,type,balance,transactions
ACC1001,Jane Doe,Savings,10000,1
ACC1002,John Doe,Current,-98.766,2
"#;
        assert_eq!(want.to_string(), String::from_utf8(output_stream).unwrap());
    }

    #[test]
    fn test_write_no_accounts() {
        let mut output_stream = Vec::new();
        super::write(&mut output_stream, Ledger::new().accounts()).unwrap();

        // Headers are only written along with the first record.
        assert!(output_stream.is_empty());
    }
}
