//! Cryptographically secure random bytes
//!
//! Salts and nonces are drawn through the [`SecureRandom`] trait so the
//! envelope code never touches a global generator directly. Production code
//! uses [`OsRandom`]; tests substitute seeded or failing sources.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, SealError};

/// Source of cryptographically secure random bytes
///
/// Implementations must be safe to share between threads without producing
/// correlated output for concurrent callers.
pub trait SecureRandom: Send + Sync {
    /// Fill `dest` entirely with random bytes
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| SealError::RandomSource(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Deterministic source for reproducible tests
    pub struct SeededRandom {
        inner: Mutex<StdRng>,
    }

    impl SeededRandom {
        pub fn new(seed: u64) -> Self {
            Self {
                inner: Mutex::new(StdRng::seed_from_u64(seed)),
            }
        }
    }

    impl SecureRandom for SeededRandom {
        fn fill(&self, dest: &mut [u8]) -> Result<()> {
            let mut rng = self
                .inner
                .lock()
                .map_err(|e| SealError::RandomSource(e.to_string()))?;
            rng.fill_bytes(dest);
            Ok(())
        }
    }

    /// Source that always reports the entropy pool as unavailable
    pub struct FailingRandom;

    impl SecureRandom for FailingRandom {
        fn fill(&self, _dest: &mut [u8]) -> Result<()> {
            Err(SealError::RandomSource("entropy source offline".to_string()))
        }
    }
}
