//! Sync statistics tracking.
//!
//! This module provides thread-safe counters for write/sync events and for
//! database errors grouped by kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{DbErrorKind, SyncEvent};

/// Thread-safe sync statistics tracker.
///
/// Every `SyncEvent` and `DbErrorKind` gets a counter, initialized to zero on
/// creation. The counters are advisory and never drive control flow.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct SyncStats {
    events: HashMap<SyncEvent, AtomicUsize>,
    errors: HashMap<DbErrorKind, AtomicUsize>,
}

impl SyncStats {
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in SyncEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }

        let mut errors = HashMap::new();
        for kind in DbErrorKind::iter() {
            errors.insert(kind, AtomicUsize::new(0));
        }

        SyncStats { events, errors }
    }

    /// Increment an event counter.
    pub fn increment_event(&self, event: SyncEvent) {
        self.add_event(event, 1);
    }

    /// Add `n` to an event counter.
    pub fn add_event(&self, event: SyncEvent, n: usize) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(n, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment event counter for {:?} which is not in the map. \
                 This indicates a bug in SyncStats initialization.",
                event
            );
        }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, kind: DbErrorKind) {
        if let Some(counter) = self.errors.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in SyncStats initialization.",
                kind
            );
        }
    }

    pub fn get_event_count(&self, event: SyncEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_error_count(&self, kind: DbErrorKind) -> usize {
        self.errors
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl Default for SyncStats {
    fn default() -> Self {
        Self::new()
    }
}
