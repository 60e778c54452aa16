//! Protocol-defined field orderings for signed messages.
//!
//! The gateway signs and verifies over field *values* in a fixed order, so the
//! order of each schema is part of the wire contract. Missing fields are not
//! an error: they contribute an empty string at their position.

use std::collections::BTreeMap;
use std::collections::HashMap;

/// A fixed, ordered list of field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [&'static str],
}

impl Schema {
    pub const fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Fields covered by the checkout fingerprint (after the login id).
pub const OUTBOUND_SCHEMA: Schema = Schema {
    fields: &["x_fp_sequence", "x_fp_timestamp", "x_amount"],
};

/// Fields covered by the relay response `x_SHA2_Hash`, in gateway order.
pub const INBOUND_SCHEMA: Schema = Schema {
    fields: &[
        "x_trans_id",
        "x_test_request",
        "x_response_code",
        "x_auth_code",
        "x_cvv2_resp_code",
        "x_cavv_response",
        "x_avs_code",
        "x_method",
        "x_account_number",
        "x_amount",
        "x_company",
        "x_first_name",
        "x_last_name",
        "x_address",
        "x_city",
        "x_state",
        "x_zip",
        "x_country",
        "x_phone",
        "x_fax",
        "x_email",
        "x_ship_to_company",
        "x_ship_to_first_name",
        "x_ship_to_last_name",
        "x_ship_to_address",
        "x_ship_to_city",
        "x_ship_to_state",
        "x_ship_to_zip",
        "x_ship_to_country",
        "x_invoice_num",
    ],
};

/// Read access to a named set of string fields.
pub trait FieldSet {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSet for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSet for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSet for [(&str, &str)] {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

/// Project `fields` onto `schema`, substituting `""` for absent names.
///
/// The result always has exactly `schema.len()` entries.
pub fn order<'a, F>(fields: &'a F, schema: Schema) -> Vec<&'a str>
where
    F: FieldSet + ?Sized,
{
    schema
        .fields()
        .iter()
        .map(|name| fields.field(name).unwrap_or(""))
        .collect()
}
