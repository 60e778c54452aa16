//! Checkout form construction.
//!
//! Builds the hidden fields a renderer places in the payer-facing form that
//! posts straight to the gateway. The form is signed once here and never
//! verified again by this crate.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::constants::{X_AMOUNT, X_FP_HASH, X_FP_SEQUENCE, X_FP_TIMESTAMP, X_LOGIN};
use crate::error::DpmError;
use crate::fields::{order, OUTBOUND_SCHEMA};
use crate::signature::SignatureEngine;

/// Checkout fields gathered by the merchant before signing.
///
/// Anything beyond the fingerprinted fields (description, invoice number,
/// relay URL, ...) is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutRequest {
    fields: BTreeMap<String, String>,
}

impl CheckoutRequest {
    /// New request for `amount` with a fresh sequence number and the current
    /// Unix timestamp.
    pub fn new(amount: impl Into<String>) -> Self {
        Self::default()
            .with_field(X_AMOUNT, amount)
            .with_field(X_FP_SEQUENCE, random_sequence().to_string())
            .with_field(X_FP_TIMESTAMP, unix_timestamp().to_string())
    }

    /// Request built from fields exactly as given.
    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Checkout fields plus `x_login` and `x_fp_hash`, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedFormFields {
    fields: BTreeMap<String, String>,
}

impl SignedFormFields {
    pub fn login_id(&self) -> &str {
        self.field(X_LOGIN).unwrap_or_default()
    }

    /// Lowercase hex fingerprint.
    pub fn fingerprint(&self) -> &str {
        self.field(X_FP_HASH).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }
}

/// Sign a checkout request.
///
/// Fails only when `x_amount` is absent or empty. A missing sequence or
/// timestamp is signed as an empty value, which the gateway will reject.
pub fn generate_form<E>(
    engine: &E,
    credentials: &Credentials,
    request: &CheckoutRequest,
) -> Result<SignedFormFields, DpmError>
where
    E: SignatureEngine + ?Sized,
{
    if request.field(X_AMOUNT).map_or(true, str::is_empty) {
        return Err(DpmError::InvalidForm(format!("{X_AMOUNT} is required")));
    }

    let fingerprint = engine.sign(credentials, &order(request.fields(), OUTBOUND_SCHEMA));

    let mut fields = request.fields().clone();
    fields.insert(X_LOGIN.to_string(), credentials.login_id().to_string());
    fields.insert(X_FP_HASH.to_string(), fingerprint);

    tracing::debug!(
        sequence = request.field(X_FP_SEQUENCE).unwrap_or_default(),
        amount = request.field(X_AMOUNT).unwrap_or_default(),
        "signed checkout form"
    );

    Ok(SignedFormFields { fields })
}

/// Random fingerprint sequence number.
///
/// Uses `rand::fill`, which delegates to the OS CSPRNG.
fn random_sequence() -> u32 {
    let mut bytes = [0u8; 4];
    rand::fill(&mut bytes);
    u32::from_be_bytes(bytes)
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
