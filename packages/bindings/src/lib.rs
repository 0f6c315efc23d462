use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amount due
// ---------------------------------------------------------------------------

/// Takes one project's form fields as JSON (camelCase keys, free-form text
/// values) and returns the amount-due envelope as JSON.
#[napi]
pub fn compute_amount_due(input_json: String) -> NapiResult<String> {
    let input: prepayment_core::amount_due::RawPaymentFields =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        prepayment_core::amount_due::calculate_amount_due(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Words
// ---------------------------------------------------------------------------

/// Amount text (separators allowed) to naira/kobo words. Never throws;
/// non-numeric text yields the error placeholder string.
#[napi]
pub fn format_amount_in_words(amount: String) -> String {
    prepayment_core::words::format_text_in_words(&amount)
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

#[napi]
pub fn build_certificate(input_json: String) -> NapiResult<String> {
    let input: prepayment_core::certificate::CertificateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        prepayment_core::certificate::build_certificate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
