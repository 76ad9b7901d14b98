use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Proof that the caller holds the process-wide store lock.
pub type Held<'a> = MutexGuard<'a, ()>;

/// The single lock serializing every table operation, across all tables.
///
/// There is deliberately no per-table locking: an upsert on `attendance.csv`
/// excludes an append on `responses.csv`.
#[derive(Debug, Default)]
pub struct Guard {
    lock: Mutex<()>,
}

impl Guard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the lock is available.
    ///
    /// A panic inside a previous cycle poisons the mutex. The protected state
    /// is the files themselves, which every write cycle replaces or extends
    /// as a whole, so the lock is recovered rather than propagated.
    pub fn lock(&self) -> Held<'_> {
        self.lock.lock().unwrap_or_else(|poisoned| {
            warn!("Store guard poisoned by a panicked operation, recovering");
            self.lock.clear_poison();
            poisoned.into_inner()
        })
    }
}
