//! Engine State Management
//!
//! Contains the consolidated engine state and statistics. All five stores
//! live in one struct owned by the engine task; nothing outside the task
//! mutates them.

use pairchat_core::{PairchatConfig, SystemTimeSource};

use crate::managers::{BanList, Blocklist, PairRegistry, Roster, WaitQueues};

// ----------------------------------------------------------------------------
// Core Engine State
// ----------------------------------------------------------------------------

/// Engine state owned exclusively by the engine task
pub struct CoreState {
    /// Identity registry: minimal profile per participant
    pub roster: Roster,
    /// Ban list gating queue and message operations
    pub bans: BanList,
    /// Static content blocklist
    pub blocklist: Blocklist,
    /// Gender-segmented wait queues
    pub queues: WaitQueues,
    /// Active session links
    pub pairs: PairRegistry,
    /// Time source for ban timestamps
    pub clock: SystemTimeSource,
    /// Statistics
    pub stats: CoreStats,
}

impl CoreState {
    /// Create new engine state from configuration
    pub fn new(config: &PairchatConfig) -> Self {
        Self {
            roster: Roster::new(),
            bans: BanList::new(),
            blocklist: Blocklist::new(&config.moderation.blocklist),
            queues: WaitQueues::new(),
            pairs: PairRegistry::new(),
            clock: SystemTimeSource,
            stats: CoreStats::default(),
        }
    }
}

/// Statistics for the engine task
#[derive(Debug, Clone, Default)]
pub struct CoreStats {
    pub commands_processed: u64,
    pub events_processed: u64,
    pub effects_emitted: u64,
    pub matches_made: u64,
    pub messages_delivered: u64,
    pub messages_rejected: u64,
    pub searches_timed_out: u64,
}
