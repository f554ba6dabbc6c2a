//! Cancellable delayed tasks.
//!
//! [`Debouncer::schedule`] runs a task once the delay has passed without
//! another `schedule` call. Each call bumps a generation counter and aborts
//! the pending task. Tasks receive a [`Ticket`] and must check it before
//! publishing a result, because a newer call can land while their request is
//! still in flight.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Proof of which `schedule` call a task belongs to.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a later `schedule` or a `cancel` has happened.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period, superseding any earlier call.
    ///
    /// Must be called inside a tokio runtime.
    pub fn schedule<F, Fut>(&self, task: F) -> Ticket
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = Ticket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            current: Arc::clone(&self.generation),
        };

        let delay = self.delay;
        let task_ticket = ticket.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if task_ticket.is_current() {
                trace!(generation = task_ticket.generation, "Debounced task firing");
                task(task_ticket).await;
            }
        });

        if let Some(previous) = self.lock_pending().replace(handle) {
            previous.abort();
        }
        ticket
    }

    /// Drop the pending task, if any, and invalidate outstanding tickets.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        // The guarded value is a plain handle; a panic elsewhere cannot leave
        // it half-written.
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
