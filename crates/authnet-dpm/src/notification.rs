use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    APPROVED_RESPONSE_CODE, X_RESPONSE_CODE, X_RESPONSE_REASON_TEXT, X_SHA2_HASH, X_TRANS_ID,
};
use crate::fields::FieldSet;

/// A relay response as posted by the gateway.
///
/// Holds every field received, recognised or not, so the full payload can be
/// forwarded on the emitted event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InboundNotification {
    fields: BTreeMap<String, String>,
}

impl InboundNotification {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    ///
    /// For repeated keys the last value wins.
    pub fn from_form_body(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn transaction_id(&self) -> &str {
        self.field(X_TRANS_ID).unwrap_or_default()
    }

    pub fn response_code(&self) -> &str {
        self.field(X_RESPONSE_CODE).unwrap_or_default()
    }

    /// Human-readable result (`x_response_reason_text`).
    pub fn reason_text(&self) -> &str {
        self.field(X_RESPONSE_REASON_TEXT).unwrap_or_default()
    }

    /// The `x_SHA2_Hash` the gateway attached, if any.
    pub fn presented_signature(&self) -> Option<&str> {
        self.field(X_SHA2_HASH)
    }

    pub fn is_approved(&self) -> bool {
        self.response_code() == APPROVED_RESPONSE_CODE
    }
}

impl FieldSet for InboundNotification {
    fn field(&self, name: &str) -> Option<&str> {
        InboundNotification::field(self, name)
    }
}

impl<K, V> FromIterator<(K, V)> for InboundNotification
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
