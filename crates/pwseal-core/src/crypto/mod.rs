//! Cryptographic primitives for the password envelope
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption
//! - scrypt key derivation from passwords
//! - Secure memory handling with zeroize
//! - An injectable secure random source

mod envelope;
mod key_derivation;
mod random;
mod secure_memory;

pub use envelope::{decrypt, decrypt_string, encrypt, encrypt_string, EnvelopeLayout, Sealer};
pub use key_derivation::{derive_key, KdfParams, Salt};
pub use random::{OsRandom, SecureRandom};
pub use secure_memory::DerivedKey;

/// Derived key length (AES-256)
pub const KEY_LEN: usize = 32;

/// Salt length, stored at the end of every envelope
pub const SALT_LEN: usize = 32;

/// GCM nonce length, stored at the start of every envelope
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

/// Smallest decoded envelope: empty plaintext
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN + SALT_LEN;
