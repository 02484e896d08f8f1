#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::models::AiInsight;

/// Identifies one readiness request. Only the most recently issued ticket
/// may publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    latest: u64,
    current: Option<AiInsight>,
}

/// Holds the visible insight and discards responses that were overtaken by
/// a newer request while in flight.
#[derive(Debug, Default)]
pub struct InsightTracker {
    state: Mutex<TrackerState>,
}

impl InsightTracker {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // The state is two plain fields; a panic mid-update cannot break it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn begin(&self) -> RequestTicket {
        let mut state = self.lock();
        state.latest += 1;
        RequestTicket(state.latest)
    }

    /// Publishes `insight` if `ticket` is still the latest request.
    /// Returns whether it was applied.
    pub fn resolve(&self, ticket: RequestTicket, insight: AiInsight) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.latest {
            debug!(
                "Discarding stale readiness response #{} (latest #{})",
                ticket.0, state.latest
            );
            return false;
        }
        state.current = Some(insight);
        true
    }

    pub fn current(&self) -> Option<AiInsight> {
        self.lock().current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(score: i64) -> AiInsight {
        AiInsight::new(score, "a", "s")
    }

    #[test]
    fn test_tickets_increase() {
        let tracker = InsightTracker::default();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b > a);
        assert_eq!(b.sequence(), a.sequence() + 1);
    }

    #[test]
    fn test_latest_response_is_applied() {
        let tracker = InsightTracker::default();
        let ticket = tracker.begin();
        assert!(tracker.resolve(ticket, insight(80)));
        assert_eq!(tracker.current().map(|i| i.readiness_score), Some(80));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let tracker = InsightTracker::default();
        let old = tracker.begin();
        let new = tracker.begin();
        assert!(tracker.resolve(new, insight(90)));
        assert!(!tracker.resolve(old, insight(10)));
        assert_eq!(tracker.current().map(|i| i.readiness_score), Some(90));
    }

    #[test]
    fn test_stale_response_before_latest_is_also_discarded() {
        let tracker = InsightTracker::default();
        let old = tracker.begin();
        let _new = tracker.begin();
        assert!(!tracker.resolve(old, insight(10)));
        assert!(tracker.current().is_none());
    }
}
