//! Pairchat Core Protocol Definitions
//!
//! This crate provides the foundational types for the Pairchat anonymous
//! matchmaking engine: participant identifiers, the two-sided pairing
//! category, the typed channel protocol between transport and engine, the
//! configuration surface, and the durable-storage abstraction.
//!
//! The engine itself lives in `pairchat-runtime`; this crate is the stable
//! API boundary shared by the engine, the transports, and tests.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod channel;
pub mod config;
pub mod errors;
pub mod storage;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{
    Actor, Command, Effect, Event, Notice, QueueSnapshot, RouteOutcome, SessionEntry,
    StatsReport, COMMAND_PREFIX,
};
pub use config::{ChannelConfig, MatchConfig, ModerationConfig, PairchatConfig};
pub use errors::{PairchatError, PairchatResult, Result, StorageError};
pub use storage::{DurableStore, MemoryStore};
pub use types::{Category, ChatId, Profile, SystemTimeSource, TimeSource, Timestamp};
