//! Per-destination transfer serialization.
//!
//! Two coordinators appending to the same stub would interleave writes and
//! corrupt it, so `run()` holds a mutex keyed by the final-file path for
//! its whole duration. Guards release on drop, covering every exit path
//! including errors and cancellation. Keys are canonical because the
//! resolver canonicalizes destination directories before paths are built.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// Lock manager keyed by canonical final-file path.
#[derive(Default)]
pub struct PathLockMap {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `final_path`, waiting while another transfer
    /// to the same destination is in flight.
    pub async fn acquire(&self, final_path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            Arc::clone(
                locks
                    .entry(final_path.to_path_buf())
                    .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
