//! Per-participant search timers
//!
//! Each waiting participant gets one cancellable scheduled task that fires a
//! `SearchTimeout` event back into the engine mailbox. Cancellation aborts
//! the task, so a cancelled timer never fires; a timer that already fired is
//! still harmless because the engine re-checks queue and session membership
//! before evicting.

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

use pairchat_core::channel::{Event, EventSender};
use pairchat_core::ChatId;

/// Armed search timers, at most one per participant
#[derive(Debug, Default)]
pub struct SearchTimers {
    handles: HashMap<ChatId, JoinHandle<()>>,
}

impl SearchTimers {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Arm the timer for a participant, replacing any previously armed one.
    pub fn arm(&mut self, id: ChatId, timeout: Duration, events: EventSender) {
        self.cancel(&id);
        trace!(%id, ?timeout, "arming search timer");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // The engine may already be gone during shutdown; nothing to do.
            let _ = events.send(Event::SearchTimeout { id }).await;
        });
        self.handles.insert(id, handle);
    }

    /// Cancel a participant's timer. Effective-or-no-op: aborting a finished
    /// or absent timer changes nothing.
    pub fn cancel(&mut self, id: &ChatId) -> bool {
        if let Some(handle) = self.handles.remove(id) {
            handle.abort();
            trace!(%id, "cancelled search timer");
            true
        } else {
            false
        }
    }

    /// Whether a timer entry is held for this participant
    pub fn is_armed(&self, id: &ChatId) -> bool {
        self.handles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for SearchTimers {
    fn drop(&mut self) {
        for handle in self.handles.values() {
            handle.abort();
        }
    }
}
