//! The octet-string-to-integer primitive from RFC 8017 §4.2.

use num_bigint::BigUint;

/// Interprets `bytes` as a base-256 big-endian numeral, with `bytes[0]` the most significant
/// digit. An empty slice is zero; there is no length limit.
#[must_use]
pub fn os2ip(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
