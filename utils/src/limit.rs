//! Live-worker accounting for the dispatcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Default cap on connections served in parallel.
pub const MAX_CONNECTIONS: usize = 5;

/// Counts workers that are currently running, up to a fixed cap.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct ConnectionLimit {
    active: Arc<AtomicUsize>,
    max: usize,
}

impl ConnectionLimit {
    /// Create a limit allowing `max` concurrent workers.
    pub fn new(max: usize) -> Self {
        Self { active: Arc::new(AtomicUsize::new(0)), max }
    }

    /// Claim a slot, or `None` when `max` workers are already running.
    ///
    /// The slot is returned to the pool when the [`ConnectionSlot`] drops,
    /// whichever way the worker holding it ends.
    pub fn try_acquire(&self) -> Option<ConnectionSlot> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.max).then_some(n + 1))
            .ok()
            .map(|_| ConnectionSlot { active: Arc::clone(&self.active) })
    }

    /// Workers currently holding a slot.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Configured cap.
    pub fn max(&self) -> usize {
        self.max
    }
}

/// One claimed worker slot. Dropping it releases the slot exactly once.
#[derive(Debug)]
pub struct ConnectionSlot {
    active: Arc<AtomicUsize>,
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
