use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

use crate::display::{format_money, rounds_negative};
use crate::fields::{deserialize_lenient_text, parse_field_checked};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::words::format_amount_in_words;
use crate::PrepaymentResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Numeric payment figures for one project on a certificate.
///
/// Percentages are whole numbers as entered on the form (`7.5` means 7.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInputs {
    pub contract_sum: Money,
    pub advance_payment_percent: Percent,
    /// Value of work completed to date
    pub work_completed: Money,
    pub retention_percent: Percent,
    /// Sum of payments already made under the contract
    pub previous_payment: Money,
    /// Share of the advance payment recovered on this certificate
    pub advance_refund_percent: Percent,
    pub vat_percent: Percent,
}

/// One project's payment fields exactly as typed into the form.
///
/// Values may carry thousands separators, percent signs, whitespace or the
/// token `nil`. Missing or null fields read as blank; JSON/YAML numbers and
/// booleans are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaymentFields {
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub contract_sum: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub advance_payment_percent: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub work_completed: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub retention_percent: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub previous_payment: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub advance_refund_percent: String,
    #[serde(deserialize_with = "deserialize_lenient_text")]
    pub vat_percent: String,
}

/// Advance payment percentages offered on the form.
pub const ADVANCE_PAYMENT_PERCENT_OPTIONS: [Percent; 6] =
    [dec!(0), dec!(25), dec!(40), dec!(50), dec!(60), dec!(70)];
/// Retention percentages offered on the form.
pub const RETENTION_PERCENT_OPTIONS: [Percent; 2] = [dec!(0), dec!(5)];
/// VAT percentages offered on the form.
pub const VAT_PERCENT_OPTIONS: [Percent; 2] = [dec!(0), dec!(7.5)];

/// Every intermediate figure of the amount-due calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountDueBreakdown {
    /// contract_sum * advance_payment_percent / 100
    pub advance_payment: Money,
    /// work_completed * retention_percent / 100
    pub retention: Money,
    /// work_completed - retention
    pub total_net_payment: Money,
    /// total_net_payment * vat_percent / 100
    pub vat: Money,
    /// total_net_payment + vat
    pub total_net_amount: Money,
    /// advance_refund_percent / 100 * advance_payment
    pub advance_refund_amount: Money,
    pub previous_payment: Money,
    /// total_net_amount - advance_refund_amount - previous_payment
    pub amount_due: Money,
    /// Some step exceeded the decimal range and was clamped to Decimal::MAX / MIN
    #[serde(default)]
    pub saturated: bool,
}

/// Amount due for one project, ready for the certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountDueOutput {
    pub inputs: PaymentInputs,
    pub breakdown: AmountDueBreakdown,
    pub amount_due: Money,
    /// Two-decimal, comma-grouped amount as printed on the certificate
    pub amount_due_display: String,
    pub amount_in_words: String,
}

// ---------------------------------------------------------------------------
// Boundary adapter
// ---------------------------------------------------------------------------

impl RawPaymentFields {
    pub const FIELD_NAMES: [&'static str; 7] = [
        "contractSum",
        "advancePaymentPercent",
        "workCompleted",
        "retentionPercent",
        "previousPayment",
        "advanceRefundPercent",
        "vatPercent",
    ];

    /// Build from a loose key/value map of form fields keyed by
    /// [`Self::FIELD_NAMES`]. Unknown keys are ignored.
    pub fn from_map(fields: &HashMap<String, String>) -> Self {
        let [contract_sum, advance_payment_percent, work_completed, retention_percent, previous_payment, advance_refund_percent, vat_percent] =
            Self::FIELD_NAMES.map(|key| fields.get(key).cloned().unwrap_or_default());
        RawPaymentFields {
            contract_sum,
            advance_payment_percent,
            work_completed,
            retention_percent,
            previous_payment,
            advance_refund_percent,
            vat_percent,
        }
    }

    /// Field texts in [`Self::FIELD_NAMES`] order.
    pub fn values(&self) -> [&str; 7] {
        [
            self.contract_sum.as_str(),
            self.advance_payment_percent.as_str(),
            self.work_completed.as_str(),
            self.retention_percent.as_str(),
            self.previous_payment.as_str(),
            self.advance_refund_percent.as_str(),
            self.vat_percent.as_str(),
        ]
    }

    /// Leniently convert to numbers. Never fails.
    pub fn parse(&self) -> PaymentInputs {
        self.parse_with_warnings().0
    }

    /// Convert to numbers, also returning a warning for each field whose
    /// text was not a number (or was out of range) and therefore counted as zero.
    pub fn parse_with_warnings(&self) -> (PaymentInputs, Vec<String>) {
        let mut warnings = Vec::new();
        let mut values = [Decimal::ZERO; 7];

        let named = Self::FIELD_NAMES.iter().zip(self.values());
        for (slot, (name, raw)) in values.iter_mut().zip(named) {
            let parsed = parse_field_checked(raw);
            if let Some(warning) = parsed.warning(name) {
                warn!(field = *name, value = raw, "field treated as zero");
                warnings.push(warning);
            }
            *slot = parsed.value();
        }

        let [contract_sum, advance_payment_percent, work_completed, retention_percent, previous_payment, advance_refund_percent, vat_percent] =
            values;

        (
            PaymentInputs {
                contract_sum,
                advance_payment_percent,
                work_completed,
                retention_percent,
                previous_payment,
                advance_refund_percent,
                vat_percent,
            },
            warnings,
        )
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

fn pct(value: Percent) -> Decimal {
    value / dec!(100)
}

/// Checked arithmetic that clamps to `Decimal::MAX` / `Decimal::MIN` on
/// overflow and remembers that it did.
#[derive(Debug, Default)]
pub(crate) struct Saturating {
    pub hit: bool,
}

impl Saturating {
    fn clamp(&mut self, negative: bool) -> Decimal {
        self.hit = true;
        if negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    }

    pub fn mul(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_mul(b) {
            Some(v) => v,
            None => self.clamp(a.is_sign_negative() != b.is_sign_negative()),
        }
    }

    pub fn add(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_add(b) {
            Some(v) => v,
            None => self.clamp(a.is_sign_negative()),
        }
    }

    pub fn sub(&mut self, a: Decimal, b: Decimal) -> Decimal {
        match a.checked_sub(b) {
            Some(v) => v,
            None => self.clamp(a.is_sign_negative()),
        }
    }
}

/// Work through the certificate arithmetic, keeping every intermediate value.
/// No rounding is applied; negative results are passed through. A step that
/// overflows the decimal range is clamped and flagged via `saturated`.
pub fn amount_due_breakdown(inputs: &PaymentInputs) -> AmountDueBreakdown {
    let mut ops = Saturating::default();
    let advance_payment = ops.mul(inputs.contract_sum, pct(inputs.advance_payment_percent));
    let retention = ops.mul(inputs.work_completed, pct(inputs.retention_percent));
    let total_net_payment = ops.sub(inputs.work_completed, retention);
    let vat = ops.mul(total_net_payment, pct(inputs.vat_percent));
    let total_net_amount = ops.add(total_net_payment, vat);
    let advance_refund_amount = ops.mul(pct(inputs.advance_refund_percent), advance_payment);
    let net_of_refund = ops.sub(total_net_amount, advance_refund_amount);
    let amount_due = ops.sub(net_of_refund, inputs.previous_payment);

    let breakdown = AmountDueBreakdown {
        advance_payment,
        retention,
        total_net_payment,
        vat,
        total_net_amount,
        advance_refund_amount,
        previous_payment: inputs.previous_payment,
        amount_due,
        saturated: ops.hit,
    };
    if breakdown.saturated {
        warn!(?breakdown, "amount due overflowed the decimal range");
    }
    debug!(?breakdown, "amount due computed");
    breakdown
}

/// Amount due on the certificate for one project.
pub fn compute_amount_due(inputs: &PaymentInputs) -> Money {
    amount_due_breakdown(inputs).amount_due
}

/// Warnings for percentages the form's dropdowns do not offer. The value is
/// still used as entered.
pub fn option_warnings(inputs: &PaymentInputs) -> Vec<String> {
    let checks: [(&str, Percent, &[Percent]); 3] = [
        (
            "advancePaymentPercent",
            inputs.advance_payment_percent,
            &ADVANCE_PAYMENT_PERCENT_OPTIONS,
        ),
        ("retentionPercent", inputs.retention_percent, &RETENTION_PERCENT_OPTIONS),
        ("vatPercent", inputs.vat_percent, &VAT_PERCENT_OPTIONS),
    ];

    checks
        .iter()
        .filter(|(_, value, options)| !options.contains(value))
        .map(|(name, value, options)| {
            let offered: Vec<String> = options.iter().map(|o| format!("{o}%")).collect();
            format!(
                "{name}: {value}% is not one of the form's options ({})",
                offered.join(", ")
            )
        })
        .collect()
}

/// Warnings shared by single-project and certificate calculations: range
/// overflow and a negative amount due (sign taken after kobo rounding).
pub fn result_warnings(breakdown: &AmountDueBreakdown) -> Vec<String> {
    let mut warnings = Vec::new();
    if breakdown.saturated {
        warnings.push(format!(
            "Amount due overflowed the decimal range; figures clamped to ±{}",
            format_money(Decimal::MAX)
        ));
    }
    if rounds_negative(breakdown.amount_due) {
        warnings.push(format!(
            "Amount due is negative ({}): previous payments and advance refund exceed the net amount",
            format_money(breakdown.amount_due)
        ));
    }
    warnings
}

/// Parse raw form fields, compute the amount due and render it for the
/// certificate. Garbled fields count as zero and are reported as warnings.
pub fn calculate_amount_due(
    raw: &RawPaymentFields,
) -> PrepaymentResult<ComputationOutput<AmountDueOutput>> {
    let start = Instant::now();
    let (inputs, mut warnings) = raw.parse_with_warnings();
    warnings.extend(option_warnings(&inputs));

    let breakdown = amount_due_breakdown(&inputs);
    let amount_due = breakdown.amount_due;
    warnings.extend(result_warnings(&breakdown));

    let output = AmountDueOutput {
        amount_due_display: format_money(amount_due),
        amount_in_words: format_amount_in_words(amount_due),
        amount_due,
        breakdown,
        inputs,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Prepayment certificate: work completed less retention, plus VAT, less advance refund and previous payments",
        &serde_json::json!({
            "percent_basis": "whole numbers (7.5 = 7.5%)",
            "lenient_parsing": "blank, nil and non-numeric fields count as 0",
            "rounding": "none until display; display and kobo round half away from zero",
            "overflow": "steps beyond the decimal range clamp to Decimal::MAX / MIN with a warning",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
