//! Mounted/unmounted guard for screen loads.
//!
//! Requests are never cancelled. A screen hands a [`MountGuard`] to each load
//! and drops the result if the screen was torn down while it was in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    /// A guard in the mounted state.
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Mark the owning screen as torn down. Every clone sees it.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// `Some(value)` while mounted, `None` after teardown.
    pub fn keep<T>(&self, value: T) -> Option<T> {
        self.is_mounted().then_some(value)
    }
}
