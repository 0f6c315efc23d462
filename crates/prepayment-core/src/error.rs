use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepaymentError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Formatting failure: {0}")]
    Formatting(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PrepaymentError {
    fn from(e: serde_json::Error) -> Self {
        PrepaymentError::SerializationError(e.to_string())
    }
}
