use thiserror::Error;

/// Input rejected by the converter. Nothing is recorded for these.
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("Missing {0} currency")]
    MissingCurrency(&'static str),

    #[error("Converting {amount} {from} to {to} is out of range")]
    ResultOutOfRange {
        from: String,
        to: String,
        amount: f64,
    },
}
