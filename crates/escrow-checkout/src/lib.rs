//! # escrow-checkout
//!
//! Checkout form logic for funding an escrow request, plus the release and
//! refund actions shown once a request is funded.
//!
//! ## Payment Flow
//!
//! ```text
//! ┌──────────────┐  create-intent   ┌──────────┐
//! │   Checkout   │─────────────────▶│ Backend  │
//! │  Controller  │◀── client_secret─│   API    │
//! │              │                  └──────────┘
//! │              │  confirmCardPayment   ┌──────────┐
//! │              │──────────────────────▶│ Stripe.js│
//! │              │◀──────── status ──────│          │
//! └──────┬───────┘                       └──────────┘
//!        │ succeeded
//!        ▼
//!  /request/{id}?payment=success
//! ```
//!
//! The browser pieces (DOM, Stripe.js, dialogs, navigation) sit behind the
//! traits in [`ui`], [`processor`] and [`api`], so everything here runs and
//! tests natively. The `escrow-web` crate supplies the WASM implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use escrow_checkout::{ApiConfig, CheckoutController, HttpPaymentApi};
//!
//! let controller = CheckoutController::new(&page_config, HttpPaymentApi::new(api), stripe, view, nav)
//!     .with_submit_label(button_text);
//! controller.start(&amount_input.value());
//!
//! // on submit
//! controller.submit(&amount_input.value(), seller_id).await;
//! ```

pub mod api;
pub mod breakdown;
pub mod config;
pub mod controller;
pub mod error;
pub mod escrow;
pub mod processor;
pub mod ui;

#[cfg(test)]
mod testing;

pub use api::{HttpPaymentApi, PaymentApi};
pub use breakdown::{Breakdown, format_usd, parse_amount};
pub use config::{ApiConfig, EscrowConfig, PageConfig};
pub use controller::{CheckoutController, SubmitOutcome, SubmitPhase, UiState};
pub use error::{CheckoutError, Result};
pub use escrow::{ActionOutcome, EscrowAction, EscrowActions};
pub use processor::{CardElementOptions, ConfirmedPayment, PaymentProcessor, PaymentStatus};
pub use ui::{CheckoutView, Interaction, Navigator};
