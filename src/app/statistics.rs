//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{DbErrorKind, SyncEvent, SyncStats};

/// Logs every non-zero event and error counter.
pub fn print_sync_statistics(stats: &SyncStats) {
    for event in SyncEvent::iter() {
        let count = stats.get_event_count(event);
        if count > 0 {
            info!("{event}: {count}");
        }
    }
    for kind in DbErrorKind::iter() {
        let count = stats.get_error_count(kind);
        if count > 0 {
            info!("{kind}: {count}");
        }
    }
}

/// One-line summary for the terminal.
pub fn summary_line(stats: &SyncStats) -> String {
    format!(
        "{} local, {} online, {} queued, {} replayed, {} error(s)",
        stats.get_event_count(SyncEvent::LocalWrite),
        stats.get_event_count(SyncEvent::OnlineWrite),
        stats.get_event_count(SyncEvent::Queued),
        stats.get_event_count(SyncEvent::Replayed),
        stats.total_errors()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let stats = SyncStats::new();
        stats.increment_event(SyncEvent::LocalWrite);
        stats.increment_event(SyncEvent::Queued);
        stats.increment_error(DbErrorKind::Connection);
        assert_eq!(
            summary_line(&stats),
            "1 local, 0 online, 1 queued, 0 replayed, 1 error(s)"
        );
        print_sync_statistics(&stats);
    }
}
