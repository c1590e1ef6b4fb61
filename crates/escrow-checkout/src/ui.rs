//! Page Capabilities
//!
//! Everything the checkout logic does to the page goes through these traits,
//! so the same controller drives the real DOM and a recording fake in tests.

use crate::breakdown::Breakdown;

/// Sink for checkout UI state
pub trait CheckoutView {
    fn show_breakdown(&self, breakdown: &Breakdown);

    fn hide_breakdown(&self);

    fn set_submit_enabled(&self, enabled: bool);

    fn set_submit_label(&self, label: &str);

    /// Empty string clears the region
    fn set_error(&self, message: &str);
}

/// Page navigation
pub trait Navigator {
    fn redirect(&self, url: &str);

    fn reload(&self);
}

/// Blocking browser dialogs (`confirm`, `prompt`, `alert`)
pub trait Interaction {
    fn confirm(&self, message: &str) -> bool;

    /// `None` when the user cancels
    fn prompt(&self, message: &str) -> Option<String>;

    fn alert(&self, message: &str);
}
