//! Checkout Controller
//!
//! Owns the checkout form's UI state and drives one payment attempt:
//!
//! ```text
//! submit ──▶ create intent ──▶ confirm card ──▶ redirect
//!   │             │                 │
//!   └── invalid   └── rejected      └── declined ──▶ error shown, button restored
//! ```
//!
//! State changes only at amount edits, card-widget errors, submit start and
//! submit end. After every change the whole state is pushed to the view.

use std::cell::RefCell;

use rust_decimal::Decimal;

use crate::api::{CreateIntentRequest, PaymentApi};
use crate::breakdown::{Breakdown, parse_amount};
use crate::config::{
    self, CREATE_INTENT_FALLBACK, DEFAULT_SUBMIT_LABEL, INVALID_AMOUNT_MESSAGE, PROCESSING_LABEL,
    PROCESSING_NOTICE, PageConfig,
};
use crate::error::{CheckoutError, Result};
use crate::processor::{ConfirmedPayment, PaymentProcessor, PaymentStatus};
use crate::ui::{CheckoutView, Navigator};

/// Where the submit sequence is
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    /// Create-intent or confirmation in flight
    Processing,
    /// Stripe accepted the charge but has not settled it
    AwaitingSettlement,
    /// Navigating away to the success page
    Redirecting,
}

/// Everything the form shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// `Some` only for a payable amount
    pub breakdown: Option<Breakdown>,
    pub submit_enabled: bool,
    pub submit_label: String,
    pub error: Option<String>,
    pub phase: SubmitPhase,
}

/// Result of one submit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was already in flight
    Ignored,
    /// Amount was not positive; nothing was sent
    Invalid,
    /// Charge succeeded; browser sent to this URL
    Redirected(String),
    /// Charge accepted but not yet settled
    Pending(PaymentStatus),
    /// Attempt failed and the form is usable again
    Failed(CheckoutError),
}

pub struct CheckoutController<A, P, V, N> {
    api: A,
    processor: P,
    view: V,
    navigator: N,
    fee_percent: Decimal,
    request_id: Option<String>,
    submit_label: String,
    state: RefCell<UiState>,
}

impl<A, P, V, N> CheckoutController<A, P, V, N>
where
    A: PaymentApi,
    P: PaymentProcessor,
    V: CheckoutView,
    N: Navigator,
{
    pub fn new(config: &PageConfig, api: A, processor: P, view: V, navigator: N) -> Self {
        Self {
            api,
            processor,
            view,
            navigator,
            fee_percent: config.platform_fee,
            request_id: config.request_id().map(str::to_string),
            submit_label: DEFAULT_SUBMIT_LABEL.into(),
            state: RefCell::new(UiState {
                submit_label: DEFAULT_SUBMIT_LABEL.into(),
                ..UiState::default()
            }),
        }
    }

    /// Label restored after a failed attempt; blank labels are ignored
    #[must_use]
    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let label = label.trim();
        if !label.is_empty() {
            self.submit_label = label.to_string();
            self.state.get_mut().submit_label = label.to_string();
        }
        self
    }

    /// Initial render, covering amounts the page pre-filled
    pub fn start(&self, initial_amount: &str) {
        tracing::debug!(request_id = ?self.request_id, "Checkout form ready");
        self.amount_changed(initial_amount);
    }

    /// Amount field edited
    pub fn amount_changed(&self, raw: &str) {
        let breakdown = Breakdown::from_input(raw, self.fee_percent);
        let payable = breakdown.is_payable();

        self.transition(|state| {
            state.breakdown = payable.then_some(breakdown);
            if state.phase == SubmitPhase::Idle {
                state.submit_enabled = payable;
            }
        });
    }

    /// Card widget reported a validation change
    pub fn card_changed(&self, error: Option<&str>) {
        let error = error.filter(|msg| !msg.is_empty()).map(str::to_string);
        self.transition(|state| state.error = error);
    }

    /// Runs one payment attempt to completion
    pub async fn submit(&self, raw_amount: &str, seller_id: Option<String>) -> SubmitOutcome {
        if self.state.borrow().phase != SubmitPhase::Idle {
            tracing::debug!("Submit ignored, payment already in flight");
            return SubmitOutcome::Ignored;
        }

        let amount = parse_amount(raw_amount);
        if amount <= Decimal::ZERO {
            self.transition(|state| state.error = Some(INVALID_AMOUNT_MESSAGE.into()));
            return SubmitOutcome::Invalid;
        }

        self.transition(|state| {
            state.phase = SubmitPhase::Processing;
            state.submit_enabled = false;
            state.submit_label = PROCESSING_LABEL.into();
            state.error = None;
        });

        tracing::info!(request_id = ?self.request_id, %amount, "Submitting payment");

        match self.charge(amount, seller_id).await {
            Ok(ConfirmedPayment {
                status: PaymentStatus::Succeeded,
                payment_intent_id,
            }) => {
                let url = config::success_url(self.request_id.as_deref().unwrap_or_default());
                tracing::info!(?payment_intent_id, %url, "Payment succeeded");

                self.transition(|state| state.phase = SubmitPhase::Redirecting);
                self.navigator.redirect(&url);
                SubmitOutcome::Redirected(url)
            }
            Ok(ConfirmedPayment {
                status: PaymentStatus::Processing,
                payment_intent_id,
            }) => {
                tracing::info!(?payment_intent_id, "Payment processing");

                self.transition(|state| {
                    state.phase = SubmitPhase::AwaitingSettlement;
                    state.error = Some(PROCESSING_NOTICE.into());
                });
                SubmitOutcome::Pending(PaymentStatus::Processing)
            }
            Ok(ConfirmedPayment { status, .. }) => self.fail(CheckoutError::Incomplete(status)),
            Err(err) => self.fail(err),
        }
    }

    /// Create-intent then confirm
    async fn charge(&self, amount: Decimal, seller_id: Option<String>) -> Result<ConfirmedPayment> {
        let request = CreateIntentRequest {
            amount,
            request_id: self.request_id.clone(),
            seller_id: seller_id.filter(|id| !id.is_empty()),
        };

        let response = self.api.create_intent(&request).await?;
        if !response.success {
            let message = response
                .error
                .filter(|msg| !msg.is_empty())
                .unwrap_or_else(|| CREATE_INTENT_FALLBACK.into());
            return Err(CheckoutError::Rejected(message));
        }

        let client_secret = response
            .client_secret
            .filter(|secret| !secret.is_empty())
            .ok_or(CheckoutError::MissingClientSecret)?;

        self.processor.confirm_card_payment(&client_secret).await
    }

    fn fail(&self, err: CheckoutError) -> SubmitOutcome {
        tracing::error!(error = %err, request_id = ?self.request_id, "Payment error");

        let message = err.user_message();
        let label = self.submit_label.clone();
        self.transition(|state| {
            state.phase = SubmitPhase::Idle;
            state.submit_enabled = state.breakdown.is_some();
            state.submit_label = label;
            state.error = Some(message);
        });

        SubmitOutcome::Failed(err)
    }

    fn transition(&self, update: impl FnOnce(&mut UiState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            update(&mut state);
            state.clone()
        };
        self.render(&snapshot);
    }

    fn render(&self, state: &UiState) {
        match &state.breakdown {
            Some(breakdown) => self.view.show_breakdown(breakdown),
            None => self.view.hide_breakdown(),
        }
        self.view.set_submit_enabled(state.submit_enabled);
        self.view.set_submit_label(&state.submit_label);
        self.view.set_error(state.error.as_deref().unwrap_or_default());
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::api::CreateIntentResponse;
    use crate::testing::{FakeApi, FakeProcessor, RecordingNavigator, RecordingView};
    use rust_decimal_macros::dec;
    use tokio::sync::Notify;

    type TestController =
        CheckoutController<FakeApi, FakeProcessor, RecordingView, RecordingNavigator>;

    fn page() -> PageConfig {
        PageConfig {
            stripe_public_key: Some("pk_test_123".into()),
            platform_fee: dec!(5),
            request_id: Some("42".into()),
        }
    }

    fn controller(api: FakeApi, processor: FakeProcessor) -> TestController {
        CheckoutController::new(
            &page(),
            api,
            processor,
            RecordingView::default(),
            RecordingNavigator::default(),
        )
        .with_submit_label("🔒 Fund Request Securely")
    }

    #[test]
    fn test_breakdown_shown_for_positive_amount() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.start("100");

        let r = c.view().rendered();
        assert!(r.breakdown_visible);
        assert_eq!(r.amount, "$100.00");
        assert_eq!(r.fee, "$5.00");
        assert_eq!(r.total, "$105.00");
        assert!(r.submit_enabled);
    }

    #[test]
    fn test_breakdown_hidden_for_non_positive_amount() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.start("100");

        for raw in ["0", "-1", "abc", ""] {
            c.amount_changed(raw);
            let r = c.view().rendered();
            assert!(!r.breakdown_visible, "{raw:?}");
            assert!(!r.submit_enabled, "{raw:?}");
        }
    }

    #[test]
    fn test_card_errors_shown_and_cleared() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.start("");

        c.card_changed(Some("Your card number is incomplete."));
        assert_eq!(c.view().rendered().error, "Your card number is incomplete.");

        c.card_changed(None);
        assert_eq!(c.view().rendered().error, "");
    }

    #[tokio::test]
    async fn test_zero_amount_never_calls_backend() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.start("0");

        let outcome = c.submit("0", None).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(c.api().call_count(), 0);
        assert_eq!(c.view().rendered().error, "Please enter a valid amount");
    }

    #[tokio::test]
    async fn test_success_redirects_to_request_page() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.start("100");

        let outcome = c.submit("100", Some("7".into())).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Redirected("/request/42?payment=success".into())
        );
        assert_eq!(
            *c.navigator().redirects.borrow(),
            vec!["/request/42?payment=success".to_string()]
        );
        assert_eq!(*c.processor().secrets.borrow(), vec!["pi_123_secret_abc".to_string()]);

        let calls = c.api().calls.borrow();
        assert_eq!(calls[0].0, "create-intent");
        assert_eq!(
            calls[0].1,
            serde_json::json!({"amount": 100.0, "request_id": "42", "seller_id": "7"})
        );
        assert_eq!(c.state().phase, SubmitPhase::Redirecting);
    }

    #[tokio::test]
    async fn test_empty_seller_field_is_omitted() {
        let c = controller(FakeApi::new(), FakeProcessor::succeeding());
        c.submit("10", Some(String::new())).await;

        let calls = c.api().calls.borrow();
        assert!(calls[0].1.get("seller_id").is_none());
    }

    #[tokio::test]
    async fn test_backend_rejection_restores_button() {
        let api = FakeApi::new().with_intent(Ok(CreateIntentResponse {
            success: false,
            client_secret: None,
            error: Some("card declined".into()),
        }));
        let c = controller(api, FakeProcessor::succeeding());
        c.start("100");

        let outcome = c.submit("100", None).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(CheckoutError::Rejected(_))));
        let r = c.view().rendered();
        assert_eq!(r.error, "card declined");
        assert!(r.submit_enabled);
        assert_eq!(r.submit_label, "🔒 Fund Request Securely");
        assert!(c.processor().secrets.borrow().is_empty());
        assert!(c.navigator().redirects.borrow().is_empty());
        assert_eq!(c.state().phase, SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let api = FakeApi::new().with_intent(Ok(CreateIntentResponse::default()));
        let c = controller(api, FakeProcessor::succeeding());

        c.submit("5", None).await;

        assert_eq!(c.view().rendered().error, "Failed to create payment");
    }

    #[tokio::test]
    async fn test_card_decline_shows_processor_message() {
        let processor = FakeProcessor::with_outcome(Err(CheckoutError::Processor(
            "Your card was declined.".into(),
        )));
        let c = controller(FakeApi::new(), processor);
        c.start("100");

        c.submit("100", None).await;

        let r = c.view().rendered();
        assert_eq!(r.error, "Your card was declined.");
        assert!(r.submit_enabled);
    }

    #[tokio::test]
    async fn test_transport_failure_shows_generic_message() {
        let api =
            FakeApi::new().with_intent(Err(CheckoutError::Transport("connection refused".into())));
        let c = controller(api, FakeProcessor::succeeding());
        c.start("100");

        c.submit("100", None).await;

        let r = c.view().rendered();
        assert_eq!(r.error, "An error occurred processing your payment");
        assert!(r.submit_enabled);
        assert_eq!(r.submit_label, "🔒 Fund Request Securely");
    }

    #[tokio::test]
    async fn test_missing_client_secret_fails() {
        let api = FakeApi::new().with_intent(Ok(CreateIntentResponse {
            success: true,
            client_secret: None,
            error: None,
        }));
        let c = controller(api, FakeProcessor::succeeding());

        let outcome = c.submit("100", None).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(CheckoutError::MissingClientSecret)
        );
    }

    #[tokio::test]
    async fn test_processing_status_keeps_button_disabled() {
        let c = controller(
            FakeApi::new(),
            FakeProcessor::with_status(PaymentStatus::Processing),
        );
        c.start("100");

        let outcome = c.submit("100", None).await;
        assert_eq!(outcome, SubmitOutcome::Pending(PaymentStatus::Processing));

        let r = c.view().rendered();
        assert!(!r.submit_enabled);
        assert_eq!(r.error, "Your payment is processing.");

        // further edits and submits cannot re-arm the form
        c.amount_changed("50");
        assert!(!c.view().rendered().submit_enabled);
        assert_eq!(c.submit("50", None).await, SubmitOutcome::Ignored);
        assert_eq!(c.api().call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_status_restores_form() {
        let c = controller(
            FakeApi::new(),
            FakeProcessor::with_status(PaymentStatus::RequiresPaymentMethod),
        );
        c.start("100");

        let outcome = c.submit("100", None).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(CheckoutError::Incomplete(
                PaymentStatus::RequiresPaymentMethod
            ))
        );
        let r = c.view().rendered();
        assert_eq!(
            r.error,
            "Payment was not completed (status: requires_payment_method)"
        );
        assert!(r.submit_enabled);
    }

    async fn wait_for_processing(c: &TestController) {
        while c.state().phase != SubmitPhase::Processing {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_form_locked_while_payment_in_flight() {
        let gate = Rc::new(Notify::new());
        let c = controller(
            FakeApi::new().gated(Rc::clone(&gate)),
            FakeProcessor::succeeding(),
        );
        c.start("100");

        let (first, second) = tokio::join!(c.submit("100", None), async {
            wait_for_processing(&c).await;

            let r = c.view().rendered();
            assert!(!r.submit_enabled);
            assert_eq!(r.submit_label, PROCESSING_LABEL);
            assert_eq!(r.error, "");
            assert_eq!(c.state().phase, SubmitPhase::Processing);

            // edits keep the breakdown live but never re-arm the button
            c.amount_changed("50");
            let r = c.view().rendered();
            assert_eq!(r.total, "$52.50");
            assert!(!r.submit_enabled);

            let again = c.submit("100", None).await;
            gate.notify_one();
            again
        });

        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(
            first,
            SubmitOutcome::Redirected("/request/42?payment=success".into())
        );
        assert_eq!(c.api().call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_after_amount_cleared_keeps_button_disabled() {
        let gate = Rc::new(Notify::new());
        let api = FakeApi::new()
            .with_intent(Err(CheckoutError::Transport("connection reset".into())))
            .gated(Rc::clone(&gate));
        let c = controller(api, FakeProcessor::succeeding());
        c.start("100");

        let (outcome, ()) = tokio::join!(c.submit("100", None), async {
            wait_for_processing(&c).await;
            c.amount_changed("");
            gate.notify_one();
        });

        assert!(matches!(outcome, SubmitOutcome::Failed(CheckoutError::Transport(_))));
        let r = c.view().rendered();
        assert!(!r.breakdown_visible);
        assert!(!r.submit_enabled);
        assert_eq!(r.submit_label, "🔒 Fund Request Securely");
        assert_eq!(c.state().phase, SubmitPhase::Idle);
    }

    #[test]
    fn test_blank_page_label_keeps_default() {
        let c = CheckoutController::new(
            &page(),
            FakeApi::new(),
            FakeProcessor::succeeding(),
            RecordingView::default(),
            RecordingNavigator::default(),
        )
        .with_submit_label("   ");

        assert_eq!(c.state().submit_label, DEFAULT_SUBMIT_LABEL);
    }
}
