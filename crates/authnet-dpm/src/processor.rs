//! Relay response handling.
//!
//! A notification moves `Received -> Verifying` on entry and then into exactly
//! one terminal state:
//!
//! - `Rejected` when the `x_SHA2_Hash` does not verify. No event is emitted
//!   and no redirect is built; the caller answers 403.
//! - `Approved` when it verifies and `x_response_code` is `"1"`.
//! - `Declined` when it verifies with any other response code.
//!
//! Approved and declined each emit one [`TransactionEvent`] and produce one
//! [`RedirectDescriptor`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::constants::{QUERY_RESPONSE, QUERY_TRANSACTION_ID, SALE_TRANSACTION_TYPE};
use crate::error::DpmError;
use crate::events::{EventSink, TransactionEvent};
use crate::fields::{order, INBOUND_SCHEMA};
use crate::form::{generate_form, CheckoutRequest, SignedFormFields};
use crate::notification::InboundNotification;
use crate::redirect::RedirectDescriptor;
use crate::signature::{DpmSignatureEngine, SignatureEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    Received,
    Verifying,
    Approved,
    Declined,
    Rejected,
}

impl ProcessingState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Declined | Self::Rejected)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Verifying => "verifying",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingSignature,
    SignatureMismatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSignature => f.write_str("relay response carried no signature"),
            Self::SignatureMismatch => f.write_str("relay response signature mismatch"),
        }
    }
}

/// Terminal result of processing one relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransactionOutcome {
    Approved {
        transaction_id: String,
        result_text: String,
    },
    Declined {
        result_text: String,
    },
    Rejected {
        reason: RejectReason,
    },
}

impl TransactionOutcome {
    pub fn state(&self) -> ProcessingState {
        match self {
            Self::Approved { .. } => ProcessingState::Approved,
            Self::Declined { .. } => ProcessingState::Declined,
            Self::Rejected { .. } => ProcessingState::Rejected,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Outcome plus the redirect to send the payer to. `redirect` is `None`
/// exactly when the outcome is `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processed {
    pub outcome: TransactionOutcome,
    pub redirect: Option<RedirectDescriptor>,
}

/// Verifies relay responses and turns them into outcomes and events.
///
/// Holds no mutable state; share one instance across threads.
pub struct NotificationProcessor {
    config: GatewayConfig,
    engine: Box<dyn SignatureEngine>,
    sink: Box<dyn EventSink>,
}

impl NotificationProcessor {
    /// Processor using the gateway's current signature contract.
    pub fn new(config: GatewayConfig, sink: impl EventSink + 'static) -> Self {
        Self::with_engine(config, DpmSignatureEngine, sink)
    }

    pub fn with_engine(
        config: GatewayConfig,
        engine: impl SignatureEngine + 'static,
        sink: impl EventSink + 'static,
    ) -> Self {
        Self {
            config,
            engine: Box::new(engine),
            sink: Box::new(sink),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Hosted form endpoint for this account's mode.
    pub fn service_url(&self) -> &'static str {
        self.config.service_url()
    }

    /// Sign a checkout request with this account's credentials.
    pub fn generate_form(&self, request: &CheckoutRequest) -> Result<SignedFormFields, DpmError> {
        generate_form(self.engine.as_ref(), &self.config.credentials, request)
    }

    /// Check the `x_SHA2_Hash` of a relay response.
    pub fn verify(&self, notification: &InboundNotification) -> bool {
        let ordered = order(notification, INBOUND_SCHEMA);
        self.engine.verify(
            &self.config.credentials,
            &ordered,
            notification.presented_signature(),
        )
    }

    /// Run one relay response through the state machine.
    pub fn process(&self, notification: InboundNotification) -> Processed {
        let mut state = ProcessingState::Received;
        transition(&mut state, ProcessingState::Verifying);

        if !self.verify(&notification) {
            let reason = match notification.presented_signature() {
                None | Some("") => RejectReason::MissingSignature,
                Some(_) => RejectReason::SignatureMismatch,
            };
            transition(&mut state, ProcessingState::Rejected);
            tracing::warn!(
                transaction_id = notification.transaction_id(),
                %reason,
                "rejected relay response"
            );
            return Processed {
                outcome: TransactionOutcome::Rejected { reason },
                redirect: None,
            };
        }

        let result_text = notification.reason_text().to_string();

        if notification.is_approved() {
            transition(&mut state, ProcessingState::Approved);
            let transaction_id = notification.transaction_id().to_string();
            tracing::info!(transaction_id = %transaction_id, "transaction approved");

            let redirect = RedirectDescriptor::new(&self.config.success_target)
                .with_param(QUERY_RESPONSE, &result_text)
                .with_param(QUERY_TRANSACTION_ID, &transaction_id);
            self.sink.emit(TransactionEvent::TransactionSucceeded {
                transaction_type: SALE_TRANSACTION_TYPE.to_string(),
                response: notification,
            });

            return Processed {
                outcome: TransactionOutcome::Approved {
                    transaction_id,
                    result_text,
                },
                redirect: Some(redirect),
            };
        }

        transition(&mut state, ProcessingState::Declined);
        tracing::info!(
            transaction_id = notification.transaction_id(),
            response_code = notification.response_code(),
            "transaction declined"
        );

        let redirect = RedirectDescriptor::new(&self.config.failure_target)
            .with_param(QUERY_RESPONSE, &result_text);
        self.sink.emit(TransactionEvent::TransactionFailed {
            transaction_type: SALE_TRANSACTION_TYPE.to_string(),
            response: notification,
        });

        Processed {
            outcome: TransactionOutcome::Declined { result_text },
            redirect: Some(redirect),
        }
    }
}

impl fmt::Debug for NotificationProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn transition(state: &mut ProcessingState, next: ProcessingState) {
    debug_assert!(!state.is_terminal(), "no transition out of {state}");
    tracing::debug!(from = %state, to = %next, "relay response state");
    *state = next;
}
