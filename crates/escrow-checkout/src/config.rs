//! Page Configuration
//!
//! The host page renders `window.paymentConfig` before the script loads:
//!
//! ```js
//! window.paymentConfig = {
//!     stripePublicKey: "pk_test_...",
//!     platformFee: 5,
//!     requestId: "42",
//! };
//! ```
//!
//! Every field is optional on the wire. Pages without a payment form still
//! carry the object so the escrow buttons can find `requestId`.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::breakdown::parse_amount;

/// Create-intent endpoint
pub const CREATE_INTENT_PATH: &str = "/api/payment/create-intent";

/// Escrow release endpoint
pub const RELEASE_PATH: &str = "/api/payment/release";

/// Refund request endpoint
pub const REFUND_PATH: &str = "/api/payment/refund";

/// Label while a submission is in flight
pub const PROCESSING_LABEL: &str = "🔄 Processing Payment...";

/// Submit label used when the page button has no text of its own
pub const DEFAULT_SUBMIT_LABEL: &str = "🔒 Fund Request Securely";

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";
pub const GENERIC_PAYMENT_ERROR: &str = "An error occurred processing your payment";
pub const CREATE_INTENT_FALLBACK: &str = "Failed to create payment";
pub const PROCESSING_NOTICE: &str = "Your payment is processing.";

/// Configuration supplied by the host page
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Stripe publishable key (`pk_...`)
    #[serde(default)]
    pub stripe_public_key: Option<String>,

    /// Platform fee as a percentage of the base amount. `null`, missing or
    /// unreadable values count as 0.
    #[serde(default, deserialize_with = "lenient_percent")]
    pub platform_fee: Decimal,

    /// Escrow request being funded
    #[serde(default, deserialize_with = "string_or_number")]
    pub request_id: Option<String>,
}

impl PageConfig {
    /// Publishable key, if the page can run checkout at all
    pub fn checkout_key(&self) -> Option<&str> {
        self.stripe_public_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Request identifier, ignoring blank values
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Where to send the buyer once Stripe reports success
    pub fn success_url(&self) -> String {
        success_url(self.request_id().unwrap_or_default())
    }
}

/// The part of the page configuration the escrow buttons read. Parsed on
/// its own so a bad checkout field cannot hide the request id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowConfig {
    #[serde(default, deserialize_with = "string_or_number")]
    pub request_id: Option<String>,
}

/// `/request/{id}?payment=success`
pub fn success_url(request_id: &str) -> String {
    format!("/request/{request_id}?payment=success")
}

/// Server templates render ids both quoted and bare
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(f)) => Some(f.to_string()),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Numbers and numeric strings; anything else is 0
fn lenient_percent<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Decimal::try_from(n).unwrap_or_default(),
        Some(Raw::Text(s)) => parse_amount(&s),
        Some(Raw::Other(_)) | None => Decimal::ZERO,
    })
}

/// Backend location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Compile-time override, otherwise the page origin
    pub fn resolve(origin: &str) -> Self {
        Self::new(option_env!("ESCROW_API_BASE").unwrap_or(origin))
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
