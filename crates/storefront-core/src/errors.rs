use thiserror::Error;

/// Failures while interpreting the query parameters a payment redirect
/// carries back. Store mutations themselves never fail; this only covers
/// input that cannot be understood at all.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("missing payment parameter: {0}")]
    MissingParam(&'static str),

    #[error("invalid payment amount: {0}")]
    InvalidAmount(String),
}
