//! Scripted fakes for the page capabilities

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{
    ActionResponse, CreateIntentRequest, CreateIntentResponse, PaymentApi, RefundRequest,
    ReleaseRequest,
};
use crate::breakdown::Breakdown;
use crate::error::Result;
use crate::processor::{ConfirmedPayment, PaymentProcessor, PaymentStatus};
use crate::ui::{CheckoutView, Interaction, Navigator};

/// Backend that answers every call with a canned response
pub struct FakeApi {
    intent: Result<CreateIntentResponse>,
    action: Result<ActionResponse>,
    gate: Option<Rc<Notify>>,
    pub calls: RefCell<Vec<(&'static str, serde_json::Value)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            intent: Ok(CreateIntentResponse {
                success: true,
                client_secret: Some("pi_123_secret_abc".into()),
                error: None,
            }),
            action: Ok(ActionResponse {
                success: true,
                error: None,
            }),
            gate: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_intent(mut self, intent: Result<CreateIntentResponse>) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_action(mut self, action: Result<ActionResponse>) -> Self {
        self.action = action;
        self
    }

    /// Holds create-intent open until `gate` is notified
    pub fn gated(mut self, gate: Rc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, path: &'static str, body: &impl serde::Serialize) {
        let body = serde_json::to_value(body).unwrap_or_default();
        self.calls.borrow_mut().push((path, body));
    }
}

#[async_trait(?Send)]
impl PaymentApi for FakeApi {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<CreateIntentResponse> {
        self.record("create-intent", request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.intent.clone()
    }

    async fn release(&self, request: &ReleaseRequest) -> Result<ActionResponse> {
        self.record("release", request);
        self.action.clone()
    }

    async fn refund(&self, request: &RefundRequest) -> Result<ActionResponse> {
        self.record("refund", request);
        self.action.clone()
    }
}

/// Stripe stand-in
pub struct FakeProcessor {
    outcome: Result<ConfirmedPayment>,
    pub secrets: RefCell<Vec<String>>,
}

impl FakeProcessor {
    pub fn succeeding() -> Self {
        Self::with_status(PaymentStatus::Succeeded)
    }

    pub fn with_status(status: PaymentStatus) -> Self {
        Self::with_outcome(Ok(ConfirmedPayment {
            payment_intent_id: Some("pi_123".into()),
            status,
        }))
    }

    pub fn with_outcome(outcome: Result<ConfirmedPayment>) -> Self {
        Self {
            outcome,
            secrets: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl PaymentProcessor for FakeProcessor {
    async fn confirm_card_payment(&self, client_secret: &str) -> Result<ConfirmedPayment> {
        self.secrets.borrow_mut().push(client_secret.to_string());
        self.outcome.clone()
    }
}

/// What the page would currently show
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub breakdown_visible: bool,
    pub amount: String,
    pub fee: String,
    pub total: String,
    pub submit_enabled: bool,
    pub submit_label: String,
    pub error: String,
}

#[derive(Default)]
pub struct RecordingView {
    rendered: RefCell<Rendered>,
}

impl RecordingView {
    pub fn rendered(&self) -> Rendered {
        self.rendered.borrow().clone()
    }
}

impl CheckoutView for RecordingView {
    fn show_breakdown(&self, breakdown: &Breakdown) {
        let mut r = self.rendered.borrow_mut();
        r.breakdown_visible = true;
        r.amount = breakdown.amount_display();
        r.fee = breakdown.fee_display();
        r.total = breakdown.total_display();
    }

    fn hide_breakdown(&self) {
        self.rendered.borrow_mut().breakdown_visible = false;
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.rendered.borrow_mut().submit_enabled = enabled;
    }

    fn set_submit_label(&self, label: &str) {
        self.rendered.borrow_mut().submit_label = label.to_string();
    }

    fn set_error(&self, message: &str) {
        self.rendered.borrow_mut().error = message.to_string();
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub redirects: RefCell<Vec<String>>,
    pub reloads: Cell<usize>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &str) {
        self.redirects.borrow_mut().push(url.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}

/// Answers dialogs from a script and records alerts
pub struct ScriptedInteraction {
    confirm: bool,
    prompt: Option<String>,
    pub alerts: RefCell<Vec<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn confirming(confirm: bool) -> Self {
        Self {
            confirm,
            prompt: None,
            alerts: RefCell::new(Vec::new()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn answering(reason: Option<&str>) -> Self {
        Self {
            prompt: reason.map(str::to_string),
            ..Self::confirming(true)
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Interaction for ScriptedInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.confirm
    }

    fn prompt(&self, message: &str) -> Option<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.prompt.clone()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}
