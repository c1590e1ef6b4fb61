//! Stripe.js Card Element
//!
//! Raw `wasm-bindgen` imports for the parts of Stripe.js v3 the checkout uses,
//! and [`StripeCard`], which implements [`PaymentProcessor`] over them.
//! Stripe.js itself is loaded by the host page (`<script src="https://js.stripe.com/v3/">`).

use async_trait::async_trait;
use escrow_checkout::{
    CardElementOptions, CheckoutError, ConfirmedPayment, PaymentProcessor, PaymentStatus, Result,
};
use js_sys::{Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// Client returned by `Stripe(publishableKey)`
    #[wasm_bindgen(js_name = Stripe)]
    #[derive(Debug, Clone)]
    pub type JsStripe;

    #[derive(Debug, Clone)]
    pub type JsElements;

    #[derive(Debug, Clone)]
    pub type JsCardElement;

    /// `Stripe("pk_...")`
    #[wasm_bindgen(catch, js_name = Stripe)]
    fn new_stripe(publishable_key: &str) -> std::result::Result<JsStripe, JsValue>;

    /// `stripe.elements()`
    #[wasm_bindgen(method, catch)]
    fn elements(this: &JsStripe) -> std::result::Result<JsElements, JsValue>;

    /// `elements.create(type, options)`
    #[wasm_bindgen(method, catch)]
    fn create(
        this: &JsElements,
        element_type: &str,
        options: &JsValue,
    ) -> std::result::Result<JsCardElement, JsValue>;

    /// `card.mount(selector)`
    #[wasm_bindgen(method, catch)]
    fn mount(this: &JsCardElement, selector: &str) -> std::result::Result<(), JsValue>;

    /// `card.on(event, handler)`
    #[wasm_bindgen(method)]
    fn on(this: &JsCardElement, event: &str, handler: &js_sys::Function);

    /// `stripe.confirmCardPayment(clientSecret, data)`
    #[wasm_bindgen(method, catch, js_name = confirmCardPayment)]
    fn confirm_card_payment(
        this: &JsStripe,
        client_secret: &str,
        data: &JsValue,
    ) -> std::result::Result<Promise, JsValue>;
}

/// Mounted card widget plus the Stripe client that owns it
pub struct StripeCard {
    stripe: JsStripe,
    card: JsCardElement,
}

impl StripeCard {
    /// Creates a `card` element and mounts it at `selector`
    pub fn mount(
        publishable_key: &str,
        selector: &str,
        options: &CardElementOptions,
    ) -> Result<Self> {
        let stripe = new_stripe(publishable_key).map_err(processor_error)?;
        let elements = stripe.elements().map_err(processor_error)?;

        let options = options
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| CheckoutError::Config(e.to_string()))?;
        let card = elements
            .create("card", &options)
            .map_err(processor_error)?;
        card.mount(selector).map_err(processor_error)?;

        tracing::debug!(selector, "Card element mounted");
        Ok(Self { stripe, card })
    }

    /// Calls `handler` with the widget's validation message, `None` once valid
    pub fn on_change(&self, mut handler: impl FnMut(Option<String>) + 'static) {
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            handler(error_message(&event).filter(|msg| !msg.is_empty()));
        });
        self.card.on("change", listener.as_ref().unchecked_ref());
        listener.forget();
    }
}

#[async_trait(?Send)]
impl PaymentProcessor for StripeCard {
    async fn confirm_card_payment(&self, client_secret: &str) -> Result<ConfirmedPayment> {
        let payment_method = Object::new();
        Reflect::set(&payment_method, &"card".into(), &self.card).map_err(processor_error)?;
        let data = Object::new();
        Reflect::set(&data, &"payment_method".into(), &payment_method)
            .map_err(processor_error)?;

        let promise = self
            .stripe
            .confirm_card_payment(client_secret, &data)
            .map_err(processor_error)?;
        let result = JsFuture::from(promise).await.map_err(processor_error)?;

        if let Some(message) = error_message(&result) {
            return Err(CheckoutError::Processor(message));
        }

        let intent = field(&result, "paymentIntent")
            .ok_or_else(|| CheckoutError::Decode("confirmCardPayment returned no paymentIntent".into()))?;
        let status = field(&intent, "status")
            .and_then(|s| s.as_string())
            .ok_or_else(|| CheckoutError::Decode("paymentIntent has no status".into()))?;

        Ok(ConfirmedPayment {
            payment_intent_id: field(&intent, "id").and_then(|id| id.as_string()),
            status: PaymentStatus::parse(&status),
        })
    }
}

/// Defined, non-null property
fn field(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// `obj.error.message`; `Some("")` when an error has no message
fn error_message(obj: &JsValue) -> Option<String> {
    let error = field(obj, "error")?;
    Some(
        field(&error, "message")
            .and_then(|m| m.as_string())
            .unwrap_or_default(),
    )
}

/// Thrown JS value → processor error carrying its message
fn processor_error(err: JsValue) -> CheckoutError {
    let message = field(&err, "message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_default();
    CheckoutError::Processor(message)
}
