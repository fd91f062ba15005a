//! # pwseal-core
//!
//! Password-based envelope encryption including:
//! - scrypt key stretching (N = 2^15, r = 8, p = 1) with a fresh 32-byte salt
//! - AES-256-GCM authenticated encryption with a fresh 12-byte nonce
//! - A self-contained base64 envelope: `nonce || ciphertext || tag || salt`
//! - A bounded async pool for running the CPU-bound work off the executor
//!
//! ```no_run
//! let envelope = pwseal_core::encrypt("secret", b"test data")?;
//! let plaintext = pwseal_core::decrypt("secret", &envelope)?;
//! assert_eq!(plaintext, b"test data");
//! # Ok::<(), pwseal_core::SealError>(())
//! ```

pub mod crypto;
pub mod error;
pub mod pool;

pub use crypto::{
    decrypt, decrypt_string, derive_key, encrypt, encrypt_string, DerivedKey, EnvelopeLayout,
    KdfParams, OsRandom, Salt, SecureRandom, Sealer,
};
pub use error::{Result, SealError};
pub use pool::SealPool;
