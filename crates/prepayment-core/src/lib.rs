pub mod amount_due;
pub mod display;
pub mod error;
pub mod fields;
pub mod types;
pub mod words;

#[cfg(feature = "certificate")]
pub mod certificate;

pub use amount_due::{compute_amount_due, PaymentInputs, RawPaymentFields};
pub use error::PrepaymentError;
pub use types::*;
pub use words::format_amount_in_words;

/// Standard result type for all prepayment operations
pub type PrepaymentResult<T> = Result<T, PrepaymentError>;
