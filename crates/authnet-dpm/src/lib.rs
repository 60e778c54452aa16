//! Authorize.Net Direct Post Method (DPM) signing and relay-response core.
//!
//! The payer's browser posts a signed checkout form straight to the gateway;
//! the gateway then posts the result back to the merchant. This crate covers
//! the cryptography and the result state machine on both legs:
//!
//! - **Checkout** ([`generate_form`]): fingerprints `x_fp_sequence`,
//!   `x_fp_timestamp` and `x_amount` with HMAC-MD5 under the transaction key
//! - **Relay response** ([`NotificationProcessor`]): verifies `x_SHA2_Hash`
//!   (HMAC-SHA512 under the signature key, constant-time), then resolves the
//!   notification to approved, declined or rejected
//!
//! HTTP, rendering and persistence stay with the caller.
//!
//! # Quick example
//!
//! ```no_run
//! use dpm::{CheckoutRequest, GatewayConfig, InboundNotification, NotificationProcessor};
//!
//! let config = GatewayConfig::from_env().unwrap();
//! let (tx, _rx) = std::sync::mpsc::channel::<dpm::TransactionEvent>();
//! let processor = NotificationProcessor::new(config, tx);
//!
//! let form = processor.generate_form(&CheckoutRequest::new("9.99")).unwrap();
//! println!("post {} fields to {}", form.iter().count(), processor.service_url());
//!
//! # let body: &[u8] = b"";
//! let processed = processor.process(InboundNotification::from_form_body(body));
//! if processed.outcome.is_rejected() {
//!     // answer 403
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod fields;
pub mod form;
pub mod notification;
pub mod processor;
pub mod redirect;
pub mod security;
pub mod signature;

pub use config::{service_url, Credentials, GatewayConfig};
pub use constants::*;
pub use error::DpmError;
pub use events::{EventSink, TransactionEvent};
pub use fields::{order, FieldSet, Schema, INBOUND_SCHEMA, OUTBOUND_SCHEMA};
pub use form::{generate_form, CheckoutRequest, SignedFormFields};
pub use notification::InboundNotification;
pub use processor::{
    NotificationProcessor, Processed, ProcessingState, RejectReason, TransactionOutcome,
};
pub use redirect::{RedirectDescriptor, ResultPage};
pub use signature::{DpmSignatureEngine, SignatureEngine};
