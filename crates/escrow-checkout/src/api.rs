//! Backend API Client
//!
//! Three JSON endpoints, all `POST`:
//!
//! | Call          | Path                         | Body                               |
//! |---------------|------------------------------|------------------------------------|
//! | create intent | `/api/payment/create-intent` | `{amount, request_id, seller_id?}` |
//! | release       | `/api/payment/release`       | `{request_id}`                     |
//! | refund        | `/api/payment/refund`        | `{request_id, reason}`             |
//!
//! The backend reports failures as JSON with an `error` field and a non-2xx
//! status, so bodies are decoded regardless of status.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::{ApiConfig, CREATE_INTENT_PATH, REFUND_PATH, RELEASE_PATH};
use crate::error::Result;

/// Body for create-intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateIntentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
}

/// Response from create-intent
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreateIntentResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Body for release
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReleaseRequest {
    pub request_id: String,
}

/// Body for refund
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RefundRequest {
    pub request_id: String,
    pub reason: String,
}

/// Response from release and refund
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub error: Option<String>,
}

/// Escrow backend
///
/// `?Send` because the browser client runs on a single-threaded event loop.
#[async_trait(?Send)]
pub trait PaymentApi {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<CreateIntentResponse>;

    async fn release(&self, request: &ReleaseRequest) -> Result<ActionResponse>;

    async fn refund(&self, request: &RefundRequest) -> Result<ActionResponse>;
}

/// `reqwest`-backed client, usable from WASM and native
#[derive(Clone, Debug)]
pub struct HttpPaymentApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpPaymentApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.url(path);
        tracing::debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "Backend returned error status");
        }

        Ok(response.json().await?)
    }
}

#[async_trait(?Send)]
impl PaymentApi for HttpPaymentApi {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<CreateIntentResponse> {
        self.post(CREATE_INTENT_PATH, request).await
    }

    async fn release(&self, request: &ReleaseRequest) -> Result<ActionResponse> {
        self.post(RELEASE_PATH, request).await
    }

    async fn refund(&self, request: &RefundRequest) -> Result<ActionResponse> {
        self.post(REFUND_PATH, request).await
    }
}
