//! Read-only admin reporting
//!
//! Aggregates over the engine's stores without mutating them. Because the
//! engine task calls these between message dispatches, every report is
//! consistent with the same-instant state.

use pairchat_core::channel::{QueueSnapshot, SessionEntry, StatsReport};
use pairchat_core::Category;

use crate::logic::CoreState;

/// Every active session exactly once, with usernames where known
pub fn list_active_sessions(state: &CoreState) -> Vec<SessionEntry> {
    state
        .pairs
        .active_pairs()
        .into_iter()
        .map(|(a, b)| SessionEntry {
            a,
            a_username: state.roster.username_of(&a).map(str::to_string),
            b,
            b_username: state.roster.username_of(&b).map(str::to_string),
        })
        .collect()
}

/// Ordered wait-queue contents per category
pub fn queue_snapshot(state: &CoreState) -> Vec<QueueSnapshot> {
    Category::ALL
        .into_iter()
        .map(|category| QueueSnapshot {
            category,
            waiting: state.queues.snapshot(category),
        })
        .collect()
}

/// The combined operational report
pub fn stats_report(state: &CoreState) -> StatsReport {
    StatsReport {
        sessions: list_active_sessions(state),
        queues: queue_snapshot(state),
        active_session_count: state.pairs.session_count(),
        total_participants: state.roster.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairchat_core::{ChatId, PairchatConfig, Profile};

    #[test]
    fn test_report_over_empty_state() {
        let state = CoreState::new(&PairchatConfig::default());
        let report = stats_report(&state);
        assert!(report.sessions.is_empty());
        assert_eq!(report.active_session_count, 0);
        assert_eq!(report.total_participants, 0);
        assert!(report.queues.iter().all(|q| q.waiting.is_empty()));
    }

    #[test]
    fn test_sessions_carry_usernames() {
        let mut state = CoreState::new(&PairchatConfig::default());
        let (a, b) = (ChatId::new(1), ChatId::new(2));
        state
            .roster
            .upsert(a, Profile::new(None, Some("ann".to_string())));
        state.roster.upsert(b, Profile::default());
        state.pairs.link(a, b);

        let sessions = list_active_sessions(&state);
        assert_eq!(sessions.len(), 1);
        let entry = &sessions[0];
        let (ann_name, other_name) = if entry.a == a {
            (&entry.a_username, &entry.b_username)
        } else {
            (&entry.b_username, &entry.a_username)
        };
        assert_eq!(ann_name.as_deref(), Some("ann"));
        assert!(other_name.is_none());
    }

    #[test]
    fn test_queue_snapshot_preserves_order() {
        let mut state = CoreState::new(&PairchatConfig::default());
        state.queues.enqueue(ChatId::new(3), Category::Female);
        state.queues.enqueue(ChatId::new(1), Category::Female);

        let snapshot = queue_snapshot(&state);
        let female = snapshot
            .iter()
            .find(|q| q.category == Category::Female)
            .unwrap();
        assert_eq!(female.waiting, vec![ChatId::new(3), ChatId::new(1)]);
    }
}
