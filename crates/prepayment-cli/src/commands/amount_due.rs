use clap::Args;
use serde_json::Value;

use prepayment_core::amount_due::{self, RawPaymentFields};

use crate::input;

/// Arguments for a single project's amount due.
///
/// Fields may be given as flags, exactly as they would be typed on the form
/// (`--contract-sum "1,000,000" --vat-percent 7.5%`), or as a JSON/YAML
/// snapshot via `--input` or stdin.
#[derive(Args)]
pub struct AmountDueArgs {
    /// Path to JSON/YAML input file with camelCase payment fields
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub contract_sum: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub advance_payment_percent: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub work_completed: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub retention_percent: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub previous_payment: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub advance_refund_percent: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub vat_percent: Option<String>,
}

impl AmountDueArgs {
    fn flag_fields(&self) -> Option<RawPaymentFields> {
        let flags = [
            &self.contract_sum,
            &self.advance_payment_percent,
            &self.work_completed,
            &self.retention_percent,
            &self.previous_payment,
            &self.advance_refund_percent,
            &self.vat_percent,
        ];
        if flags.iter().all(|f| f.is_none()) {
            return None;
        }

        let text = |f: &Option<String>| f.clone().unwrap_or_default();
        Some(RawPaymentFields {
            contract_sum: text(&self.contract_sum),
            advance_payment_percent: text(&self.advance_payment_percent),
            work_completed: text(&self.work_completed),
            retention_percent: text(&self.retention_percent),
            previous_payment: text(&self.previous_payment),
            advance_refund_percent: text(&self.advance_refund_percent),
            vat_percent: text(&self.vat_percent),
        })
    }
}

pub fn run_amount_due(args: AmountDueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: RawPaymentFields = match args.flag_fields() {
        Some(raw) => raw,
        None => input::read_input(args.input.as_deref(), "amount due")?,
    };
    let result = amount_due::calculate_amount_due(&raw)?;
    Ok(serde_json::to_value(result)?)
}
