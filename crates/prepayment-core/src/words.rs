use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

use crate::error::PrepaymentError;
use crate::fields::{parse_field_checked, FieldValue};
use crate::types::Money;
use crate::PrepaymentResult;

/// Shown in place of the words when an amount cannot be rendered.
pub const AMOUNT_IN_WORDS_ERROR: &str = "Error: unable to convert amount to words";

pub const MAJOR_UNIT: &str = "naira";
pub const MINOR_UNIT: &str = "kobo";

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// Short scale. u128::MAX has 13 groups of three digits.
const SCALES: [&str; 13] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
    "undecillion",
];

fn below_hundred(n: u128) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{}-{}", TENS[n / 10], ONES[n % 10])
    }
}

fn below_thousand(n: u128) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, r) => format!("{} hundred and {}", ONES[h as usize], below_hundred(r)),
    }
}

/// English cardinal words, British style: "and" after hundreds and before a
/// trailing group under one hundred (`1005` -> "one thousand and five").
/// Compound tens keep their hyphen (`21` -> "twenty-one").
pub fn number_to_words(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::with_capacity(SCALES.len());
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        let mut words = below_thousand(*group);
        if scale == 0 && *group < 100 && !parts.is_empty() {
            words = format!("and {words}");
        }
        if !SCALES[scale].is_empty() {
            words = format!("{words} {}", SCALES[scale]);
        }
        parts.push(words);
    }

    parts.join(" ")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an amount into whole naira and kobo.
///
/// Naira truncate toward zero; kobo round half away from zero, and a
/// fraction that rounds up to 100 kobo carries into the naira.
pub fn split_naira_kobo(amount: Money) -> (Decimal, Decimal) {
    let magnitude = amount.abs();
    let mut naira = magnitude.trunc();
    let mut kobo = ((magnitude - naira) * dec!(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if kobo >= dec!(100) {
        naira += Decimal::ONE;
        kobo -= dec!(100);
    }
    (naira, kobo)
}

/// Render an amount as "<words> naira[, <words> kobo]", failing on amounts
/// that cannot be expressed.
pub fn try_format_amount_in_words(amount: Money) -> PrepaymentResult<String> {
    let (naira, kobo) = split_naira_kobo(amount);

    let naira_units = naira.to_u128().ok_or_else(|| {
        PrepaymentError::Formatting(format!("naira part {naira} is not a whole number"))
    })?;
    let kobo_units = kobo.to_u128().ok_or_else(|| {
        PrepaymentError::Formatting(format!("kobo part {kobo} is not a whole number"))
    })?;

    let mut text = format!("{} {MAJOR_UNIT}", number_to_words(naira_units));
    if kobo_units > 0 {
        text.push_str(&format!(", {} {MINOR_UNIT}", number_to_words(kobo_units)));
    }
    // Sign is decided after rounding so -0.001 reads "Zero naira".
    if amount.is_sign_negative() && (naira_units > 0 || kobo_units > 0) {
        text = format!("negative {text}");
    }

    Ok(capitalize_first(&text.replace('-', " ")))
}

/// Render an amount in words, substituting [`AMOUNT_IN_WORDS_ERROR`] on failure.
///
/// `350625` -> "Three hundred and fifty thousand six hundred and twenty five naira"
pub fn format_amount_in_words(amount: Money) -> String {
    try_format_amount_in_words(amount).unwrap_or_else(|e| {
        warn!(%amount, error = %e, "amount in words unavailable");
        AMOUNT_IN_WORDS_ERROR.to_string()
    })
}

/// Render a text amount in words. Separators are accepted, blank and `nil`
/// read as zero, and any other non-numeric or out-of-range text gives
/// [`AMOUNT_IN_WORDS_ERROR`].
pub fn format_text_in_words(raw: &str) -> String {
    match parse_field_checked(raw) {
        FieldValue::Unparsable(text) | FieldValue::OutOfRange(text) => {
            warn!(input = %text, "amount in words requested for text that is not decimal money");
            AMOUNT_IN_WORDS_ERROR.to_string()
        }
        parsed => format_amount_in_words(parsed.value()),
    }
}
