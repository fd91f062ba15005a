//! AES-256-GCM password envelope
//!
//! Envelope format: `base64(nonce || ciphertext || auth_tag || salt)`
//! - Nonce: 12 bytes (96 bits) - standard for GCM
//! - Ciphertext: same length as the plaintext
//! - Auth tag: 16 bytes (128 bits)
//! - Salt: 32 bytes, trailing, feeds the scrypt derivation
//!
//! The base64 alphabet is the standard one with padding. Regions are located
//! purely by fixed offsets from the start (nonce) and the end (salt).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use tracing::debug;

use super::key_derivation::{derive_key_with, KdfParams};
use super::random::{OsRandom, SecureRandom};
use super::{DerivedKey, MIN_ENVELOPE_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, SealError};

/// Seals and opens envelopes with a given random source
///
/// The scrypt parameters are fixed to [`KdfParams::STANDARD`].
#[derive(Debug, Clone)]
pub struct Sealer<R: SecureRandom = OsRandom> {
    rng: R,
    params: KdfParams,
}

impl Sealer<OsRandom> {
    /// Create a sealer backed by the operating system CSPRNG
    pub fn new() -> Self {
        Self::with_rng(OsRandom)
    }
}

impl Default for Sealer<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SecureRandom> Sealer<R> {
    /// Create a sealer drawing salts and nonces from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            params: KdfParams::STANDARD,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_params(mut self, params: KdfParams) -> Self {
        self.params = params;
        self
    }

    /// The key derivation parameters in use
    pub fn kdf_params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` under `password` and return the textual envelope
    ///
    /// Every call draws a fresh salt and nonce, so the output differs even for
    /// identical inputs.
    pub fn encrypt(&self, password: impl AsRef<[u8]>, plaintext: &[u8]) -> Result<String> {
        let (key, salt) = derive_key_with(password.as_ref(), None, &self.rng, &self.params)?;
        let cipher = new_cipher(&key)?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce)?;

        // aes-gcm appends the auth tag to the ciphertext
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| SealError::CipherConstruction(format!("Seal failed: {}", e)))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + sealed.len() + SALT_LEN);
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);
        raw.extend_from_slice(&salt);

        let envelope = STANDARD.encode(&raw);
        debug!(
            plaintext_len = plaintext.len(),
            envelope_len = envelope.len(),
            "Sealed envelope"
        );
        Ok(envelope)
    }

    /// Encrypt a string and return the textual envelope
    pub fn encrypt_string(&self, password: impl AsRef<[u8]>, plaintext: &str) -> Result<String> {
        self.encrypt(password, plaintext.as_bytes())
    }

    /// Decrypt an envelope produced by [`Sealer::encrypt`]
    ///
    /// Fails closed: a wrong password or any modification of the envelope
    /// yields an error and never partial plaintext.
    pub fn decrypt(&self, password: impl AsRef<[u8]>, envelope: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let raw = decode(envelope.as_ref())?;

        let (body, salt) = raw.split_at(raw.len() - SALT_LEN);
        let (key, _) = derive_key_with(password.as_ref(), Some(salt), &self.rng, &self.params)?;
        let cipher = new_cipher(&key)?;

        let (nonce, sealed) = body.split_at(NONCE_LEN);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| {
                debug!("Envelope authentication failed");
                SealError::Authentication
            })?;

        debug!(plaintext_len = plaintext.len(), "Opened envelope");
        Ok(plaintext)
    }

    /// Decrypt an envelope whose plaintext is UTF-8 text
    pub fn decrypt_string(
        &self,
        password: impl AsRef<[u8]>,
        envelope: impl AsRef<[u8]>,
    ) -> Result<String> {
        let plaintext = self.decrypt(password, envelope)?;
        String::from_utf8(plaintext).map_err(|_| SealError::InvalidUtf8)
    }
}

/// Encrypt `plaintext` under `password` using the OS random source
pub fn encrypt(password: impl AsRef<[u8]>, plaintext: &[u8]) -> Result<String> {
    Sealer::new().encrypt(password, plaintext)
}

/// Encrypt a string under `password` using the OS random source
pub fn encrypt_string(password: impl AsRef<[u8]>, plaintext: &str) -> Result<String> {
    Sealer::new().encrypt_string(password, plaintext)
}

/// Decrypt an envelope with `password`
pub fn decrypt(password: impl AsRef<[u8]>, envelope: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    Sealer::new().decrypt(password, envelope)
}

/// Decrypt an envelope with `password` and return its text
pub fn decrypt_string(password: impl AsRef<[u8]>, envelope: impl AsRef<[u8]>) -> Result<String> {
    Sealer::new().decrypt_string(password, envelope)
}

/// Region sizes of an envelope, in decoded bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvelopeLayout {
    pub total_len: usize,
    pub nonce_len: usize,
    pub ciphertext_len: usize,
    pub tag_len: usize,
    pub salt_len: usize,
}

impl EnvelopeLayout {
    /// Layout of the envelope a plaintext of `len` bytes seals into
    pub fn for_plaintext_len(len: usize) -> Self {
        Self {
            total_len: NONCE_LEN + len + TAG_LEN + SALT_LEN,
            nonce_len: NONCE_LEN,
            ciphertext_len: len,
            tag_len: TAG_LEN,
            salt_len: SALT_LEN,
        }
    }

    /// Structurally validate an envelope and report its regions
    ///
    /// No key material is involved, so this says nothing about authenticity.
    pub fn inspect(envelope: impl AsRef<[u8]>) -> Result<Self> {
        let raw = decode(envelope.as_ref())?;
        Ok(Self::for_plaintext_len(raw.len() - MIN_ENVELOPE_LEN))
    }

    /// Length of the padded base64 text
    pub fn encoded_len(&self) -> usize {
        self.total_len.div_ceil(3) * 4
    }
}

fn new_cipher(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SealError::CipherConstruction(e.to_string()))
}

fn decode(envelope: &[u8]) -> Result<Vec<u8>> {
    let raw = STANDARD
        .decode(envelope)
        .map_err(|e| SealError::MalformedEnvelope(format!("Invalid base64 encoding: {}", e)))?;

    if raw.len() < MIN_ENVELOPE_LEN {
        return Err(SealError::MalformedEnvelope(format!(
            "Envelope too short: expected at least {} bytes, got {}",
            MIN_ENVELOPE_LEN,
            raw.len()
        )));
    }

    Ok(raw)
}
