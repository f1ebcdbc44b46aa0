use thiserror::Error;

/// The error type for master secret key derivation.
///
/// Derivation is defined for every seed, so either variant means the underlying HKDF or SHA-256
/// implementation is broken. Neither should be retried with a different primitive, as that would
/// produce a different key.
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum KeyGenError {
    /// HKDF-Expand refused to produce the requested output length.
    #[error("HKDF-Expand failed to produce output keying material")]
    Expand,

    /// Every candidate scalar reduced to zero within the attempt cap.
    #[error("no nonzero scalar after {0} attempts")]
    AttemptsExhausted(u32),
}
