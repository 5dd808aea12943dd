//! Currency formatting.

use crate::ledger::Amount;

use rust_decimal::RoundingStrategy;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format an amount for display: currency symbol, thousands separators and
/// exactly two decimals, e.g. `₹1,234,567.89` or `-₹300.00`.
pub fn format(amount: Amount, currency_symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{sign}{currency_symbol}{}.{fraction}",
        group_thousands(integer)
    )
}

fn group_thousands(integer: &str) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
