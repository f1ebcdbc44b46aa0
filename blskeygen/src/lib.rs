//! ERC-2333 master secret key derivation for BLS12-381 validator keys.
//!
//! A seed is expanded with salted HKDF-SHA256 into 48 bytes of output keying material, which is
//! read as a big-endian integer and reduced modulo the BLS12-381 scalar field order `r`. If the
//! result is zero the salt is rehashed and the process repeats. The result is always in
//! `[1, r-1]` and depends only on the seed bytes, so it interoperates with every other ERC-2333
//! implementation.
//!
//! ```rust
//! use blskeygen::derive_master_secret_key;
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let seed = hex::decode("3141592653589793238462643383279502884197169399375105820974944592")?;
//!
//! let sk = derive_master_secret_key(&seed)?;
//! assert_eq!(
//!     "29757020647961307431480504535336562678282505419141012933316116377660817309383",
//!     sk.to_biguint().to_string(),
//! );
//!
//! // The same seed always yields the same key.
//! assert_eq!(sk, derive_master_secret_key(&seed)?);
//! #
//! #   Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use self::{
    errors::*,
    keygen::{
        derive_master_secret_key, random_seed, SecretKey, GROUP_ORDER, KEYGEN_SALT, MAX_ATTEMPTS,
        OKM_LEN, SECRET_KEY_LEN, SEED_LEN,
    },
    os2ip::os2ip,
};

mod errors;
mod keygen;
mod os2ip;
pub mod vectors;
