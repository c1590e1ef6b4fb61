//! Escrow Checkout Web Frontend
//!
//! WASM shell loaded on every request page. Reads `window.paymentConfig`,
//! wires the payment form when the page has one, and exports the escrow
//! buttons' handlers:
//!
//! ```html
//! <script>window.paymentConfig = { stripePublicKey: "pk_...", platformFee: 5, requestId: "42" };</script>
//! <script src="https://js.stripe.com/v3/"></script>
//! <script type="module">
//!   import init, { releasePayment, requestRefund } from "/static/pkg/escrow_web.js";
//!   await init();
//!   window.releasePayment = releasePayment;
//!   window.requestRefund = requestRefund;
//! </script>
//! ```

mod checkout;
mod dom;
mod stripe;

use escrow_checkout::{EscrowActions, EscrowConfig, HttpPaymentApi, PageConfig};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::dom::{BrowserInteraction, BrowserNavigator};

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(config) = page_config::<PageConfig>(&window) else {
        tracing::warn!("Payment configuration not found");
        return;
    };

    match checkout::mount(&window, &config) {
        Ok(true) => tracing::info!(request_id = ?config.request_id(), "Checkout form mounted"),
        Ok(false) => tracing::debug!("No payment form on this page"),
        Err(err) => tracing::error!(error = %err, "Checkout setup failed"),
    }
}

/// Release escrowed funds to the seller
#[wasm_bindgen(js_name = releasePayment)]
pub fn release_payment() {
    let Some(actions) = escrow_actions() else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = actions.release_payment().await;
        tracing::debug!(?outcome, "Release finished");
    });
}

/// Ask for a refund of the escrowed payment
#[wasm_bindgen(js_name = requestRefund)]
pub fn request_refund() {
    let Some(actions) = escrow_actions() else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = actions.request_refund().await;
        tracing::debug!(?outcome, "Refund request finished");
    });
}

type PageActions = EscrowActions<HttpPaymentApi, BrowserInteraction, BrowserNavigator>;

fn escrow_actions() -> Option<PageActions> {
    let window = web_sys::window()?;
    let request_id =
        page_config::<EscrowConfig>(&window).and_then(|config| config.request_id);

    Some(EscrowActions::new(
        checkout::api_client(&window),
        BrowserInteraction::new(window.clone()),
        BrowserNavigator::new(window),
        request_id,
    ))
}

/// `window.paymentConfig` read as `T`, if the page set one
fn page_config<T: DeserializeOwned>(window: &web_sys::Window) -> Option<T> {
    let raw = js_sys::Reflect::get(window, &JsValue::from_str("paymentConfig")).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }

    match serde_wasm_bindgen::from_value(raw) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(error = %err, "Invalid payment configuration");
            None
        }
    }
}
