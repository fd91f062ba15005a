//! Password-based key derivation using scrypt

use serde::Serialize;
use tracing::debug;

use super::random::{OsRandom, SecureRandom};
use super::{DerivedKey, KEY_LEN, SALT_LEN};
use crate::error::{Result, SealError};

/// Salt mixed into every derivation
pub type Salt = [u8; SALT_LEN];

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl KdfParams {
    /// The only parameter set envelopes are produced with: N = 2^15, r = 8, p = 1
    pub const STANDARD: KdfParams = KdfParams {
        log_n: 15,
        r: 8,
        p: 1,
    };

    /// Cheap parameters so tests can afford thousands of derivations
    #[cfg(test)]
    pub(crate) const FAST: KdfParams = KdfParams {
        log_n: 4,
        r: 8,
        p: 1,
    };

    /// CPU/memory cost factor N
    pub fn cost(&self) -> u64 {
        1u64 << self.log_n
    }

    /// Approximate working memory of one derivation in bytes (128 * r * N)
    pub fn memory_bytes(&self) -> u64 {
        128 * u64::from(self.r) * self.cost()
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| SealError::Derivation(format!("Invalid scrypt parameters: {}", e)))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Derive a 256-bit key from a password using scrypt
///
/// # Arguments
/// * `password` - The user's password
/// * `salt` - The 32-byte salt to reuse, or `None` to generate a fresh one
///
/// # Returns
/// The derived key together with the salt that produced it
pub fn derive_key(password: &[u8], salt: Option<&[u8]>) -> Result<(DerivedKey, Salt)> {
    derive_key_with(password, salt, &OsRandom, &KdfParams::STANDARD)
}

pub(crate) fn derive_key_with<R: SecureRandom + ?Sized>(
    password: &[u8],
    salt: Option<&[u8]>,
    rng: &R,
    params: &KdfParams,
) -> Result<(DerivedKey, Salt)> {
    let mut salt_bytes = [0u8; SALT_LEN];
    match salt {
        Some(given) => {
            if given.len() != SALT_LEN {
                return Err(SealError::Derivation(format!(
                    "Invalid salt length: expected {}, got {}",
                    SALT_LEN,
                    given.len()
                )));
            }
            salt_bytes.copy_from_slice(given);
        }
        None => rng.fill(&mut salt_bytes)?,
    }

    let scrypt_params = params.to_scrypt()?;

    let mut key = DerivedKey::zeroed();
    scrypt::scrypt(password, &salt_bytes, &scrypt_params, key.as_mut_bytes())
        .map_err(|e| SealError::Derivation(e.to_string()))?;

    debug!(
        log_n = params.log_n,
        r = params.r,
        p = params.p,
        fresh_salt = salt.is_none(),
        "Derived envelope key"
    );

    Ok((key, salt_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::testing::{FailingRandom, SeededRandom};

    fn fast(password: &[u8], salt: Option<&[u8]>) -> Result<(DerivedKey, Salt)> {
        derive_key_with(password, salt, &OsRandom, &KdfParams::FAST)
    }

    #[test]
    fn test_standard_params() {
        let params = KdfParams::default();
        assert_eq!(params, KdfParams::STANDARD);
        assert_eq!(params.cost(), 32768);
        assert_eq!(params.r, 8);
        assert_eq!(params.p, 1);
        assert_eq!(params.memory_bytes(), 32 * 1024 * 1024);
    }

    #[test]
    fn test_derive_key_generates_salt() {
        let (key, salt) = fast(b"test-password-123", None).unwrap();

        assert_eq!(key.as_bytes().len(), KEY_LEN);
        assert_eq!(salt.len(), SALT_LEN);
        assert_ne!(salt, [0u8; SALT_LEN]);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let (key1, salt) = fast(b"test-password-123", None).unwrap();
        let (key2, salt2) = fast(b"test-password-123", Some(&salt)).unwrap();

        // Same password + salt should produce same key
        assert_eq!(key1, key2);
        assert_eq!(salt, salt2);
    }

    #[test]
    fn test_derive_key_different_passwords() {
        let salt = [9u8; SALT_LEN];

        let (key1, _) = fast(b"password1", Some(&salt)).unwrap();
        let (key2, _) = fast(b"password2", Some(&salt)).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_derive_key_different_salts() {
        let (key1, salt1) = fast(b"test-password", None).unwrap();
        let (key2, salt2) = fast(b"test-password", None).unwrap();

        assert_ne!(salt1, salt2);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_derive_key_empty_password() {
        let salt = [1u8; SALT_LEN];
        let (key1, _) = fast(b"", Some(&salt)).unwrap();
        let (key2, _) = fast(b"", Some(&salt)).unwrap();
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_derive_key_rejects_bad_salt_length() {
        let err = fast(b"password", Some(&[0u8; 16])).unwrap_err();
        assert!(matches!(err, SealError::Derivation(_)));
    }

    #[test]
    fn test_derive_key_rejects_invalid_params() {
        let params = KdfParams {
            log_n: 0,
            r: 0,
            p: 0,
        };
        let err = derive_key_with(b"password", None, &OsRandom, &params).unwrap_err();
        assert!(matches!(err, SealError::Derivation(_)));
    }

    #[test]
    fn test_derive_key_random_source_failure() {
        let err = derive_key_with(b"password", None, &FailingRandom, &KdfParams::FAST).unwrap_err();
        assert!(matches!(err, SealError::RandomSource(_)));
    }

    #[test]
    fn test_supplied_salt_skips_random_source() {
        let salt = [3u8; SALT_LEN];
        let (key, used) =
            derive_key_with(b"password", Some(&salt), &FailingRandom, &KdfParams::FAST).unwrap();
        assert_eq!(used, salt);
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn test_seeded_salt_is_reproducible() {
        let (_, salt1) =
            derive_key_with(b"pw", None, &SeededRandom::new(42), &KdfParams::FAST).unwrap();
        let (_, salt2) =
            derive_key_with(b"pw", None, &SeededRandom::new(42), &KdfParams::FAST).unwrap();
        assert_eq!(salt1, salt2);
    }

    #[test]
    fn test_standard_params_derivation() {
        let salt = [0x5Au8; SALT_LEN];
        let (key1, _) = derive_key(b"secret", Some(&salt)).unwrap();
        let (key2, _) = derive_key(b"secret", Some(&salt)).unwrap();
        assert_eq!(key1, key2);
    }
}
