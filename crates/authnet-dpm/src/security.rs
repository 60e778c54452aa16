//! Constant-time comparison helpers for signature checks.
//!
//! All implementations use the `subtle` crate for timing-attack resistance.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Constant-time byte comparison that does not leak input lengths or content.
///
/// Both inputs are hashed to fixed-length SHA-256 digests before comparison,
/// so timing reveals neither the content nor the length of either input.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// ASCII case-insensitive variant of [`constant_time_eq`].
///
/// Hex signatures arrive in either case. Both sides are upper-cased byte by
/// byte (no early exit) before the digest comparison.
pub fn constant_time_eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    let a = a.to_ascii_uppercase();
    let b = b.to_ascii_uppercase();
    constant_time_eq(&a, &b)
}
