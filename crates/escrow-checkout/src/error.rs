//! Checkout Error Types

use thiserror::Error;

use crate::config::{GENERIC_PAYMENT_ERROR, INVALID_AMOUNT_MESSAGE};
use crate::processor::PaymentStatus;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout and escrow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Amount missing, unparseable, or not positive
    #[error("Invalid amount")]
    InvalidAmount,

    /// Backend answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Stripe reported an error while confirming
    #[error("{0}")]
    Processor(String),

    /// Backend reported success but sent no client secret
    #[error("Payment intent response has no client secret")]
    MissingClientSecret,

    /// Confirmation finished in a non-terminal or failed state
    #[error("Payment was not completed (status: {0})")]
    Incomplete(PaymentStatus),

    /// Request never completed (network, CORS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Page configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required element missing or of the wrong type
    #[error("DOM error: {0}")]
    Dom(String),
}

impl CheckoutError {
    /// Text shown in the inline error region
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidAmount => INVALID_AMOUNT_MESSAGE.into(),
            Self::Rejected(msg) | Self::Processor(msg) if !msg.is_empty() => msg.clone(),
            Self::Incomplete(_) => self.to_string(),
            _ => GENERIC_PAYMENT_ERROR.into(),
        }
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
