//! Process-wide "busy" state: an in-flight counter held for the whole handling of a message.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts messages currently being relayed. Cloning shares the counter.
#[derive(Clone, Default)]
pub struct BusyTracker {
    in_flight: Arc<AtomicUsize>,
}

impl BusyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one message in flight until the returned guard is dropped.
    pub fn enter(&self) -> BusyGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        BusyGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[must_use = "the message counts as in flight only while the guard lives"]
pub struct BusyGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_counts_overlapping_messages() {
        let busy = BusyTracker::new();
        assert!(!busy.is_busy());

        let a = busy.enter();
        let b = busy.enter();
        assert_eq!(busy.in_flight(), 2);

        drop(a);
        assert!(busy.is_busy());
        drop(b);
        assert!(!busy.is_busy());
    }
}
