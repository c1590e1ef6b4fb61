//! Escrow Actions
//!
//! Release and refund are one-shot commands bound to buttons on a funded
//! request page. Each asks the user first, posts once, reports through an
//! alert and reloads the page on success so it reflects the new escrow state.

use crate::api::{ActionResponse, PaymentApi, RefundRequest, ReleaseRequest};
use crate::error::Result;
use crate::ui::{Interaction, Navigator};

const MISSING_REQUEST_ID: &str = "Error: Request ID not found";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Which escrow command is running
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowAction {
    Release,
    Refund,
}

impl EscrowAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Refund => "refund",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Release => "Payment released successfully!",
            Self::Refund => "Refund request submitted successfully!",
        }
    }

    fn rejected_message(self, error: Option<&str>) -> String {
        let error = error.filter(|e| !e.is_empty()).unwrap_or(UNKNOWN_ERROR);
        match self {
            Self::Release => format!("Error releasing payment: {error}"),
            Self::Refund => format!("Error submitting refund request: {error}"),
        }
    }

    fn failed_message(self) -> &'static str {
        match self {
            Self::Release => "Error releasing payment. Please try again.",
            Self::Refund => "Error submitting refund request. Please try again.",
        }
    }
}

pub const RELEASE_CONFIRMATION: &str =
    "Are you sure you want to release payment to the seller? This action cannot be undone.";
pub const REFUND_PROMPT: &str = "Please provide a reason for the refund request:";

/// What happened when a button was pressed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// User declined the confirmation or gave no reason
    Cancelled,
    /// Page has no request id
    MissingRequestId,
    /// Backend accepted; page reloading
    Completed,
    /// Backend answered `success: false`
    Rejected(String),
    /// Request or decode failed
    Failed,
}

/// Release and refund handlers
pub struct EscrowActions<A, I, N> {
    api: A,
    interaction: I,
    navigator: N,
    request_id: Option<String>,
}

impl<A, I, N> EscrowActions<A, I, N>
where
    A: PaymentApi,
    I: Interaction,
    N: Navigator,
{
    pub fn new(api: A, interaction: I, navigator: N, request_id: Option<String>) -> Self {
        Self {
            api,
            interaction,
            navigator,
            request_id: request_id.filter(|id| !id.is_empty()),
        }
    }

    /// Transfer escrowed funds to the seller
    pub async fn release_payment(&self) -> ActionOutcome {
        if !self.interaction.confirm(RELEASE_CONFIRMATION) {
            return ActionOutcome::Cancelled;
        }

        let Some(request_id) = self.request_id() else {
            return ActionOutcome::MissingRequestId;
        };

        let request = ReleaseRequest {
            request_id: request_id.to_string(),
        };
        let result = self.api.release(&request).await;
        self.finish(EscrowAction::Release, result)
    }

    /// Ask for a refund with a free-text reason
    pub async fn request_refund(&self) -> ActionOutcome {
        let reason = self
            .interaction
            .prompt(REFUND_PROMPT)
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());
        let Some(reason) = reason else {
            return ActionOutcome::Cancelled;
        };

        let Some(request_id) = self.request_id() else {
            return ActionOutcome::MissingRequestId;
        };

        let request = RefundRequest {
            request_id: request_id.to_string(),
            reason,
        };
        let result = self.api.refund(&request).await;
        self.finish(EscrowAction::Refund, result)
    }

    fn request_id(&self) -> Option<&str> {
        let id = self.request_id.as_deref();
        if id.is_none() {
            self.interaction.alert(MISSING_REQUEST_ID);
        }
        id
    }

    fn finish(&self, action: EscrowAction, result: Result<ActionResponse>) -> ActionOutcome {
        match result {
            Ok(ActionResponse { success: true, .. }) => {
                tracing::info!(action = action.as_str(), request_id = ?self.request_id, "Escrow action accepted");
                self.interaction.alert(action.success_message());
                self.navigator.reload();
                ActionOutcome::Completed
            }
            Ok(ActionResponse { error, .. }) => {
                let message = action.rejected_message(error.as_deref());
                tracing::warn!(action = action.as_str(), %message, "Escrow action rejected");
                self.interaction.alert(&message);
                ActionOutcome::Rejected(message)
            }
            Err(err) => {
                tracing::error!(action = action.as_str(), error = %err, "Escrow action failed");
                self.interaction.alert(action.failed_message());
                ActionOutcome::Failed
            }
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}
