use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-session tally of unread notifications.
///
/// Shared between the poller, which overwrites it with the backend's count,
/// and mark-read, which decrements it optimistically. Never goes below zero.
#[derive(Debug, Clone, Default)]
pub struct UnreadCounter {
    value: Arc<AtomicU64>,
}

impl UnreadCounter {
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, count: u64) {
        self.value.store(count, Ordering::SeqCst);
    }

    /// Returns the decremented value, or `None` when already at zero.
    pub fn decrement(&self) -> Option<u64> {
        self.value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| value.checked_sub(1))
            .ok()
            .map(|previous| previous - 1)
    }

    /// Undoes a decrement that left the counter at `decremented`. Does
    /// nothing once the value has moved on, e.g. after a poll replaced it.
    pub fn undo_decrement(&self, decremented: u64) -> bool {
        self.value
            .compare_exchange(
                decremented,
                decremented + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }
}
