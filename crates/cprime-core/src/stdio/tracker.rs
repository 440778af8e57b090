//! Registry of strings handed out by the interactive reader.
//!
//! Callers get an `Arc<str>` and may keep it as long as they like; the
//! registry holds one more reference so every string read during the process
//! can be released in one sweep at exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct AllocationTracker {
    entries: Mutex<Vec<Arc<str>>>,
    torn_down: AtomicBool,
}

impl AllocationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `text` and returns the caller's handle to it.
    ///
    /// After teardown nothing is retained; the handle is still returned.
    pub fn track(&self, text: String) -> Arc<str> {
        let shared: Arc<str> = Arc::from(text);
        if !self.torn_down.load(Ordering::Acquire) {
            self.entries.lock().push(Arc::clone(&shared));
        }
        shared
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Bytes held across all registrations.
    #[must_use]
    pub fn tracked_bytes(&self) -> usize {
        self.entries.lock().iter().map(|s| s.len()).sum()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Releases every registration, then the registry's storage.
    ///
    /// Runs once; later calls do nothing and return `0`. Returns the number
    /// of strings released.
    pub fn teardown(&self) -> usize {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return 0;
        }
        let released = std::mem::take(&mut *self.entries.lock());
        released.len()
    }
}

/// Process-wide tracker behind the stdin helpers.
pub fn global_tracker() -> &'static AllocationTracker {
    static TRACKER: OnceLock<AllocationTracker> = OnceLock::new();
    TRACKER.get_or_init(AllocationTracker::new)
}
