//! Pairchat Runtime Engine
//!
//! This crate contains the matchmaking engine for Pairchat, including:
//! - `EngineTask`: the serialized state machine processing all inbound traffic
//! - State managers for the roster, moderation, wait queues, and pair registry
//! - Cancellable per-participant search timers
//! - Read-only admin reporting
//! - `RuntimeBuilder`: wiring for consumers (CLI/tests) to get command and
//!   effect handles
//!
//! This is the "engine" of Pairchat — it owns all mutable state and
//! serializes every operation against it, while `pairchat-core` provides the
//! stable API definitions.

pub mod builder;
pub mod logic;
pub mod managers;
pub mod reporting;
pub mod timers;

pub use builder::{create_test_runtime, RuntimeBuilder, RuntimeHandle};
pub use logic::{CommandHandlers, CoreState, CoreStats, EngineTask};
pub use managers::{BanList, BanRecord, Blocklist, PairRegistry, Roster, WaitQueues};
pub use timers::SearchTimers;

// Re-export core types for convenience
pub use pairchat_core::{
    channel::{
        create_command_channel, create_effect_channel, create_effect_receiver,
        create_event_channel, Actor, ChannelError, Command, CommandReceiver, CommandSender,
        Effect, EffectReceiver, EffectSender, Event, EventReceiver, EventSender, Notice,
        NonBlockingSend, RouteOutcome, StatsReport,
    },
    Category, ChatId, DurableStore, MemoryStore, PairchatConfig, PairchatError, PairchatResult,
    Profile, Timestamp,
};
