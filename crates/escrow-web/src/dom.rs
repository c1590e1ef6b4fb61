//! Browser implementations of the page capabilities

use escrow_checkout::{Breakdown, CheckoutError, CheckoutView, Interaction, Navigator, Result};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Window};

pub const PAYMENT_FORM_ID: &str = "payment-form";
pub const AMOUNT_ID: &str = "amount";
pub const SUBMIT_ID: &str = "submit-payment";
pub const CARD_ERRORS_ID: &str = "card-errors";
pub const BREAKDOWN_ID: &str = "payment-breakdown";
pub const BREAKDOWN_AMOUNT_ID: &str = "breakdown-amount";
pub const BREAKDOWN_FEE_ID: &str = "breakdown-fee";
pub const BREAKDOWN_TOTAL_ID: &str = "breakdown-total";
pub const SELLER_ID: &str = "seller_id";
pub const CARD_MOUNT_SELECTOR: &str = "#card-element";

/// Element by id
pub fn element(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::Dom(format!("#{id} not found")))
}

/// Element by id, cast to a concrete element type
pub fn typed<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    element(document, id)?
        .dyn_into::<T>()
        .map_err(|_| CheckoutError::Dom(format!("#{id} has an unexpected element type")))
}

/// Value of the optional hidden seller field
pub fn seller_id(document: &Document) -> Option<String> {
    document
        .get_element_by_id(SELLER_ID)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Checkout form elements supplied by the server-rendered page
pub struct DomCheckoutView {
    panel: HtmlElement,
    amount: Element,
    fee: Element,
    total: Element,
    submit: HtmlButtonElement,
    errors: Element,
}

impl DomCheckoutView {
    pub fn bind(document: &Document) -> Result<Self> {
        Ok(Self {
            panel: typed(document, BREAKDOWN_ID)?,
            amount: element(document, BREAKDOWN_AMOUNT_ID)?,
            fee: element(document, BREAKDOWN_FEE_ID)?,
            total: element(document, BREAKDOWN_TOTAL_ID)?,
            submit: typed(document, SUBMIT_ID)?,
            errors: element(document, CARD_ERRORS_ID)?,
        })
    }

    /// Button text as rendered by the page
    pub fn submit_label(&self) -> String {
        self.submit.text_content().unwrap_or_default()
    }

    fn set_panel_display(&self, value: &str) {
        if let Err(err) = self.panel.style().set_property("display", value) {
            tracing::error!(?err, display = value, "Cannot toggle breakdown panel");
        }
    }
}

impl CheckoutView for DomCheckoutView {
    fn show_breakdown(&self, breakdown: &Breakdown) {
        self.amount.set_text_content(Some(&breakdown.amount_display()));
        self.fee.set_text_content(Some(&breakdown.fee_display()));
        self.total.set_text_content(Some(&breakdown.total_display()));
        self.set_panel_display("block");
    }

    fn hide_breakdown(&self) {
        self.set_panel_display("none");
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.submit.set_disabled(!enabled);
    }

    fn set_submit_label(&self, label: &str) {
        self.submit.set_text_content(Some(label));
    }

    fn set_error(&self, message: &str) {
        self.errors.set_text_content(Some(message));
    }
}

/// `window.location`
pub struct BrowserNavigator {
    window: Window,
}

impl BrowserNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for BrowserNavigator {
    fn redirect(&self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            tracing::error!(?err, url, "Navigation failed");
        }
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            tracing::error!(?err, "Reload failed");
        }
    }
}

/// `window.confirm` / `prompt` / `alert`
pub struct BrowserInteraction {
    window: Window,
}

impl BrowserInteraction {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Interaction for BrowserInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn prompt(&self, message: &str) -> Option<String> {
        self.window.prompt_with_message(message).ok().flatten()
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            tracing::error!(?err, message, "Alert failed");
        }
    }
}
