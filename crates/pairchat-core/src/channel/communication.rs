//! CSP Channel Communication Protocol Types
//!
//! This module defines the typed communication protocol between the external
//! transport (the messaging-platform client), the engine task, and the
//! outbound notifier. All inter-task communication flows through these
//! channel message types.

use crate::types::{Category, ChatId, Profile};
use serde::{Deserialize, Serialize};

/// Prefix reserved for platform commands; inbound text starting with it is
/// never forwarded to a partner.
pub const COMMAND_PREFIX: char = '/';

// ----------------------------------------------------------------------------
// Actor: admin authorization fact
// ----------------------------------------------------------------------------

/// The originator of an administrative command.
///
/// The engine does not verify identity; the transport supplies the
/// `is_admin` fact per command and the engine trusts it. Unauthorized admin
/// commands are silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ChatId,
    pub is_admin: bool,
}

impl Actor {
    pub fn admin(id: ChatId) -> Self {
        Self { id, is_admin: true }
    }

    pub fn participant(id: ChatId) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Command: Transport → Engine
// ----------------------------------------------------------------------------

/// Commands sent from the transport to the engine task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// First interaction: create or refresh the participant's profile
    Register { id: ChatId, profile: Profile },
    /// Request a match against the opposite category's pool
    Join { id: ChatId, category: Category },
    /// Inbound text from a participant
    Text { id: ChatId, text: String },
    /// Leave the current session
    EndChat { id: ChatId },
    /// Stop waiting for a match
    CancelSearch { id: ChatId },
    /// Ban a participant (admin only)
    Ban {
        actor: Actor,
        target: ChatId,
        reason: Option<String>,
    },
    /// Lift a ban (admin only)
    Unban { actor: Actor, target: ChatId },
    /// Request the operational report (admin only)
    Stats { actor: Actor },
    /// Shutdown the engine gracefully
    Shutdown,
}

// ----------------------------------------------------------------------------
// Event: Timer tasks → Engine
// ----------------------------------------------------------------------------

/// Events sent from background tasks to the engine task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A participant's search timer elapsed. Only effective if the
    /// participant is still waiting at processing time; late fires after a
    /// match or cancellation are no-ops.
    SearchTimeout { id: ChatId },
}

// ----------------------------------------------------------------------------
// Effect: Engine → Transport (External Side Effects Only)
// ----------------------------------------------------------------------------

/// Effects emitted by the engine task.
///
/// `Deliver` and `Notify` go out to the transport; the timer effects are
/// intercepted and handled locally by the engine task and never reach the
/// transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Forward partner text verbatim
    Deliver { to: ChatId, text: String },
    /// Deliver a system notice
    Notify { to: ChatId, notice: Notice },
    /// Arm the search timer for a waiting participant (handled locally)
    ArmSearchTimer { id: ChatId },
    /// Cancel a participant's search timer (handled locally)
    CancelSearchTimer { id: ChatId },
}

// ----------------------------------------------------------------------------
// Notice: system messages rendered by the transport
// ----------------------------------------------------------------------------

/// Typed system notices. The transport decides how to render each one; the
/// engine only decides who gets which notice and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notice {
    /// Greeting after registration
    Welcome { name: Option<String> },
    /// Entered a wait queue, search timer armed
    Searching,
    /// Search stopped on request
    SearchCancelled,
    /// Search abandoned after the timeout elapsed
    SearchTimedOut,
    /// Paired with an anonymous partner
    Matched,
    /// Own session ended
    ChatEnded,
    /// The partner ended the session (or was removed)
    PartnerLeft,
    /// End-chat requested with no active session
    NoActiveChat,
    /// Join rejected: already in a session
    AlreadyInChat,
    /// Join rejected: already waiting in a queue
    AlreadySearching,
    /// Operation rejected: the participant is banned
    Banned { reason: Option<String> },
    /// Message rejected by the content blocklist
    BlockedContent,
    /// Text received outside any session
    NoSession,
    /// Admin confirmation: ban recorded
    BanApplied { target: ChatId },
    /// Admin confirmation: ban lifted
    BanLifted { target: ChatId },
    /// Admin operational report
    StatsReport(StatsReport),
}

// ----------------------------------------------------------------------------
// Route Outcome
// ----------------------------------------------------------------------------

/// Classification of an inbound `Text` command after moderation gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteOutcome {
    /// Forwarded verbatim to the partner
    Delivered,
    /// Rejected by the content blocklist
    Blocked,
    /// Rejected because the sender is banned
    Banned,
    /// Sender has no active session
    NoSession,
    /// Command-prefixed or empty text; routed nowhere, emits nothing
    Ignored,
}

// ----------------------------------------------------------------------------
// Admin Reporting Types
// ----------------------------------------------------------------------------

/// One active session, reported exactly once per pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub a: ChatId,
    pub a_username: Option<String>,
    pub b: ChatId,
    pub b_username: Option<String>,
}

/// Ordered contents of one category's wait queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub category: Category,
    pub waiting: Vec<ChatId>,
}

/// Read-only operational report over the engine's same-instant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub sessions: Vec<SessionEntry>,
    pub queues: Vec<QueueSnapshot>,
    pub active_session_count: usize,
    pub total_participants: usize,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
