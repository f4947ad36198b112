//! Channel Module
//!
//! This module contains the CSP channel infrastructure the engine speaks:
//! - `communication`: commands, events, effects, and notices
//! - `utils`: channel aliases, constructors, and send helpers

pub mod communication;
pub mod utils;

// Re-export communication types
pub use communication::{
    Actor, Command, Effect, Event, Notice, QueueSnapshot, RouteOutcome, SessionEntry,
    StatsReport, COMMAND_PREFIX,
};

// Re-export utility types
pub use utils::{
    create_command_channel, create_effect_channel, create_effect_receiver, create_event_channel,
    ChannelError, CommandReceiver, CommandSender, EffectReceiver, EffectSender, EventReceiver,
    EventSender, NonBlockingSend,
};
