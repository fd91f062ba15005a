//! Async offloading for envelope operations
//!
//! scrypt at the standard cost takes tens of milliseconds and 32 MiB per call,
//! which must not run on an async executor thread. [`SealPool`] moves each
//! operation onto tokio's blocking pool and caps how many run at once.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{OsRandom, SecureRandom, Sealer};
use crate::error::{Result, SealError};

/// Bounded pool of envelope workers
pub struct SealPool<R: SecureRandom = OsRandom> {
    sealer: Arc<Sealer<R>>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl SealPool<OsRandom> {
    /// Create a pool running at most `max_concurrent` operations at a time
    pub fn new(max_concurrent: usize) -> Self {
        Self::with_sealer(Sealer::new(), max_concurrent)
    }
}

impl Default for SealPool<OsRandom> {
    /// One worker per available CPU
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl<R: SecureRandom + 'static> SealPool<R> {
    /// Create a pool around an existing sealer (zero is treated as one)
    pub fn with_sealer(sealer: Sealer<R>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            sealer: Arc::new(sealer),
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    /// Maximum number of operations running at once
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Encrypt on the blocking pool; see [`Sealer::encrypt`]
    pub async fn encrypt(&self, password: &[u8], plaintext: Vec<u8>) -> Result<String> {
        let password = Zeroizing::new(password.to_vec());
        let plaintext = Zeroizing::new(plaintext);
        let sealer = self.sealer.clone();

        self.run(move || sealer.encrypt(password.as_slice(), &plaintext))
            .await
    }

    /// Decrypt on the blocking pool; see [`Sealer::decrypt`]
    pub async fn decrypt(&self, password: &[u8], envelope: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let password = Zeroizing::new(password.to_vec());
        let envelope = envelope.as_ref().to_vec();
        let sealer = self.sealer.clone();

        self.run(move || sealer.decrypt(password.as_slice(), &envelope))
            .await
    }

    async fn run<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| SealError::TaskFailed(e.to_string()))?;

        debug!(
            available = self.permits.available_permits(),
            "Dispatching envelope job"
        );

        // The permit moves into the worker so it is held until the work
        // finishes, even if the awaiting future is dropped.
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| SealError::TaskFailed(e.to_string()))?
    }
}
