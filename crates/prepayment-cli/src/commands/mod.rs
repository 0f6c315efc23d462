pub mod amount_due;
pub mod backup;
pub mod certificate;
pub mod words;
