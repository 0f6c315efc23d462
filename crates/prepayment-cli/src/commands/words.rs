use clap::Args;
use serde_json::{json, Value};

use prepayment_core::words;

/// Arguments for rendering an amount in words
#[derive(Args)]
pub struct WordsArgs {
    /// Amount in naira, e.g. "350,625.00"
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

pub fn run_words(args: WordsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "amount": args.amount,
        "amount_in_words": words::format_text_in_words(&args.amount),
    }))
}
