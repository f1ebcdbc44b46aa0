//! Master secret key derivation as defined by ERC-2333.
//!
//! Given a seed `S`, the master secret key is derived as follows:
//!
//! ```text
//! IKM  = S || 0x00
//! salt = "BLS-SIG-KEYGEN-SALT-"
//! loop:
//!     salt = SHA256(salt)
//!     OKM  = HKDF-SHA256(salt, IKM, info = I2OSP(48, 2), L = 48)
//!     SK   = OS2IP(OKM) mod r
//!     if SK != 0: return SK
//! ```
//!
//! where `r` is the order of the BLS12-381 scalar field.

use std::fmt::{self, Debug, Formatter};
use std::sync::LazyLock;

use hkdf::Hkdf;
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::{os2ip, KeyGenError};

/// The initial HKDF salt, before its first hash.
pub const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";

/// The length of the output keying material in bytes, `ceil(3 * ceil(log2(r)) / 16)`.
pub const OKM_LEN: usize = 48;

/// The length of an encoded secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// The length of a freshly generated seed in bytes.
pub const SEED_LEN: usize = 32;

/// The maximum number of salt rehashes before derivation gives up.
///
/// A single attempt fails with probability below 2^-128, so reaching this means the hash or HKDF
/// implementation is broken.
pub const MAX_ATTEMPTS: u32 = 1000;

/// The order `r` of the BLS12-381 scalar field.
pub static GROUP_ORDER: LazyLock<BigUint> =
    LazyLock::new(|| BigUint::from_bytes_be(&GROUP_ORDER_BYTES));

const GROUP_ORDER_BYTES: [u8; SECRET_KEY_LEN] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

// I2OSP(OKM_LEN, 2)
const OKM_LEN_INFO: [u8; 2] = [0x00, OKM_LEN as u8];

/// A BLS12-381 master secret key: a scalar in `[1, r-1]`.
///
/// The key's memory is wiped on drop. Its [`Debug`] form never includes the scalar.
#[derive(Clone, Eq, PartialEq)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Returns the key's scalar value.
    #[must_use]
    pub fn to_biguint(&self) -> BigUint {
        os2ip(&self.0)
    }

    /// Encodes the key as a 32-byte big-endian integer.
    #[must_use]
    pub const fn encode(&self) -> [u8; SECRET_KEY_LEN] {
        self.0
    }

    /// Decodes a 32-byte big-endian integer as a secret key. Returns `None` if the slice is the
    /// wrong length or its value is not in `[1, r-1]`.
    #[must_use]
    pub fn decode(b: impl AsRef<[u8]>) -> Option<SecretKey> {
        let encoded = <[u8; SECRET_KEY_LEN]>::try_from(b.as_ref()).ok()?;
        // Equal-length big-endian arrays compare in numeric order.
        (encoded != [0u8; SECRET_KEY_LEN] && encoded < GROUP_ORDER_BYTES)
            .then_some(SecretKey(encoded))
    }

    fn from_scalar(d: &BigUint) -> SecretKey {
        debug_assert!(d < &*GROUP_ORDER);
        let be = Zeroizing::new(d.to_bytes_be());
        let mut encoded = [0u8; SECRET_KEY_LEN];
        encoded[SECRET_KEY_LEN - be.len()..].copy_from_slice(&be);
        SecretKey(encoded)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Derives the ERC-2333 master secret key for the given seed.
///
/// The seed may be any length, including zero; minimum-length policy belongs to the caller. The
/// seed is only read.
///
/// # Errors
///
/// Returns [`KeyGenError`] only if the HKDF implementation fails or [`MAX_ATTEMPTS`] salts all
/// produce a zero scalar, both of which indicate a broken primitive rather than a bad seed.
pub fn derive_master_secret_key(seed: impl AsRef<[u8]>) -> Result<SecretKey, KeyGenError> {
    let (d, attempts) = derive_scalar(seed.as_ref())?;
    trace!(seed_len = seed.as_ref().len(), attempts, "derived master secret key");
    Ok(SecretKey::from_scalar(&d))
}

/// Generates a random seed suitable for [`derive_master_secret_key`].
#[must_use]
pub fn random_seed(mut rng: impl CryptoRng + Rng) -> [u8; SEED_LEN] {
    rng.gen()
}

/// Returns the derived scalar and the number of salts it took to find it.
fn derive_scalar(seed: &[u8]) -> Result<(BigUint, u32), KeyGenError> {
    derive_scalar_with(seed, MAX_ATTEMPTS, |d| *d != BigUint::ZERO)
}

/// Tries up to `max_attempts` salts, returning the first reduced candidate `accept` allows.
fn derive_scalar_with(
    seed: &[u8],
    max_attempts: u32,
    mut accept: impl FnMut(&BigUint) -> bool,
) -> Result<(BigUint, u32), KeyGenError> {
    // IKM = seed || 0x00, in a fresh buffer.
    let mut ikm = Zeroizing::new(Vec::with_capacity(seed.len() + 1));
    ikm.extend_from_slice(seed);
    ikm.push(0);

    let mut salt = Sha256::digest(KEYGEN_SALT);
    for attempt in 1..=max_attempts {
        let mut okm = Zeroizing::new([0u8; OKM_LEN]);
        Hkdf::<Sha256>::new(Some(salt.as_slice()), ikm.as_slice())
            .expand(&OKM_LEN_INFO, okm.as_mut_slice())
            .map_err(|_| KeyGenError::Expand)?;

        let d = os2ip(okm.as_slice()) % &*GROUP_ORDER;
        if accept(&d) {
            return Ok((d, attempt));
        }

        debug!(attempt, "candidate scalar rejected, rehashing salt");
        salt = Sha256::digest(salt);
    }

    Err(KeyGenError::AttemptsExhausted(max_attempts))
}
