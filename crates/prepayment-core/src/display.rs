use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;

/// Round to kobo precision, halves away from zero.
pub fn round_kobo(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// True when the amount is still below zero once rounded to kobo, so
/// `-0.001` is not negative. Matches the sign shown by `format_money` and the words.
pub fn rounds_negative(amount: Money) -> bool {
    round_kobo(amount) < Decimal::ZERO
}

/// Render an amount the way the certificate prints it: thousands
/// separators and exactly two decimals (`350625` -> `350,625.00`).
pub fn format_money(amount: Money) -> String {
    let mut rounded = round_kobo(amount);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounds_negative(rounded) { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
