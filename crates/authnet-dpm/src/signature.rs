//! Keyed-hash signing of checkout forms and verification of relay responses.
//!
//! The two directions use unrelated algorithms and keys:
//!
//! - **Fingerprint** (`x_fp_hash`): HMAC-MD5 over `login^seq^ts^amount^`,
//!   keyed by the raw transaction key, lowercase hex.
//! - **Relay response** (`x_SHA2_Hash`): HMAC-SHA512 over `^f1^...^fN^`,
//!   keyed by the hex-decoded signature key, uppercase hex.
//!
//! MD5 is mandated by the gateway's fingerprint contract. It sits behind
//! [`SignatureEngine`] so it can be replaced if the gateway retires it.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::Sha512;

use crate::config::Credentials;
use crate::constants::FIELD_DELIMITER;
use crate::security::constant_time_eq_ignore_ascii_case;

type HmacMd5 = Hmac<Md5>;
type HmacSha512 = Hmac<Sha512>;

/// Signs outbound field lists and verifies inbound ones.
pub trait SignatureEngine: Send + Sync {
    /// Fingerprint for an ordered outbound field list. Lowercase hex.
    fn sign(&self, credentials: &Credentials, ordered: &[&str]) -> String;

    /// Check `presented` against the MAC of an ordered inbound field list.
    ///
    /// Returns `false` for a missing or malformed signature; never panics.
    fn verify(&self, credentials: &Credentials, ordered: &[&str], presented: Option<&str>)
        -> bool;
}

/// The gateway's current contract: HMAC-MD5 out, HMAC-SHA512 in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DpmSignatureEngine;

impl SignatureEngine for DpmSignatureEngine {
    fn sign(&self, credentials: &Credentials, ordered: &[&str]) -> String {
        let message = fingerprint_message(credentials.login_id(), ordered);
        compute_hmac_md5(credentials.transaction_key(), message.as_bytes())
    }

    fn verify(
        &self,
        credentials: &Credentials,
        ordered: &[&str],
        presented: Option<&str>,
    ) -> bool {
        let message = relay_message(ordered);
        let expected = compute_hmac_sha512(credentials.signature_key(), message.as_bytes());

        // A missing signature is compared as empty so the MAC is always computed.
        let presented = presented.unwrap_or_default();
        constant_time_eq_ignore_ascii_case(expected.as_bytes(), presented.as_bytes())
    }
}

/// `login^f1^...^fN^`
pub fn fingerprint_message(login_id: &str, ordered: &[&str]) -> String {
    let mut message = String::from(login_id);
    message.push(FIELD_DELIMITER);
    for field in ordered {
        message.push_str(field);
        message.push(FIELD_DELIMITER);
    }
    message
}

/// `^f1^...^fN^`
pub fn relay_message(ordered: &[&str]) -> String {
    let mut message = String::new();
    message.push(FIELD_DELIMITER);
    for field in ordered {
        message.push_str(field);
        message.push(FIELD_DELIMITER);
    }
    message
}

/// HMAC-MD5, lowercase hex.
pub fn compute_hmac_md5(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacMd5::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// HMAC-SHA512, uppercase hex.
pub fn compute_hmac_sha512(key: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    hex::encode_upper(mac.finalize().into_bytes())
}
