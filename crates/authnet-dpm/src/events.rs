//! Domain events emitted after a relay response is verified.
//!
//! Delivery is a plain synchronous call into an [`EventSink`]. Closures,
//! `std::sync::mpsc` senders and (with `full`) tokio unbounded senders all
//! work as sinks.

use serde::Serialize;

use crate::notification::InboundNotification;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransactionEvent {
    TransactionSucceeded {
        #[serde(rename = "type")]
        transaction_type: String,
        response: InboundNotification,
    },
    TransactionFailed {
        #[serde(rename = "type")]
        transaction_type: String,
        response: InboundNotification,
    },
}

impl TransactionEvent {
    pub fn transaction_type(&self) -> &str {
        match self {
            Self::TransactionSucceeded {
                transaction_type, ..
            }
            | Self::TransactionFailed {
                transaction_type, ..
            } => transaction_type,
        }
    }

    /// The full relay response the event was raised for.
    pub fn response(&self) -> &InboundNotification {
        match self {
            Self::TransactionSucceeded { response, .. } | Self::TransactionFailed { response, .. } => {
                response
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::TransactionSucceeded { .. })
    }
}

/// Receiver of [`TransactionEvent`]s.
///
/// Implementations must be thread-safe (`Send + Sync`) and must not block for
/// long: they run inline with notification processing.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: TransactionEvent);
}

impl<F> EventSink for F
where
    F: Fn(TransactionEvent) + Send + Sync,
{
    fn emit(&self, event: TransactionEvent) {
        self(event)
    }
}

impl EventSink for std::sync::mpsc::Sender<TransactionEvent> {
    fn emit(&self, event: TransactionEvent) {
        if self.send(event).is_err() {
            tracing::warn!("transaction event dropped: receiver disconnected");
        }
    }
}

#[cfg(feature = "full")]
impl EventSink for tokio::sync::mpsc::UnboundedSender<TransactionEvent> {
    fn emit(&self, event: TransactionEvent) {
        if self.send(event).is_err() {
            tracing::warn!("transaction event dropped: receiver closed");
        }
    }
}
