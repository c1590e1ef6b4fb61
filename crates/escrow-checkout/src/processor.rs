//! Payment Processor Abstraction
//!
//! Card tokenization and charge confirmation belong to Stripe.js. The
//! controller only needs "confirm this client secret against the mounted card".

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Confirms a PaymentIntent with the card the buyer entered
///
/// Implemented over Stripe.js in the browser and by scripted fakes in tests.
#[async_trait(?Send)]
pub trait PaymentProcessor {
    /// Resolves to the intent's status, or `CheckoutError::Processor` with
    /// Stripe's message when the card is declined or invalid.
    async fn confirm_card_payment(&self, client_secret: &str) -> Result<ConfirmedPayment>;
}

/// Outcome of a confirmation that Stripe did not reject
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedPayment {
    pub payment_intent_id: Option<String>,
    pub status: PaymentStatus,
}

/// PaymentIntent status as reported by Stripe
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    RequiresCapture,
    Canceled,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "succeeded" => Self::Succeeded,
            "processing" => Self::Processing,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "requires_confirmation" => Self::RequiresConfirmation,
            "requires_action" => Self::RequiresAction,
            "requires_capture" => Self::RequiresCapture,
            "canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Processing => "processing",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::RequiresCapture => "requires_capture",
            Self::Canceled => "canceled",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for `elements.create("card", ...)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardElementOptions {
    pub style: CardStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardStyle {
    pub base: CardBaseStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBaseStyle {
    pub font_size: String,
    pub color: String,
    #[serde(rename = "::placeholder")]
    pub placeholder: PlaceholderStyle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaceholderStyle {
    pub color: String,
}

impl Default for CardElementOptions {
    fn default() -> Self {
        Self {
            style: CardStyle {
                base: CardBaseStyle {
                    font_size: "16px".into(),
                    color: "#424770".into(),
                    placeholder: PlaceholderStyle {
                        color: "#aab7c4".into(),
                    },
                },
            },
        }
    }
}
