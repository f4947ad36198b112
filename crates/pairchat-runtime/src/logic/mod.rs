//! Engine Logic
//!
//! This module contains the engine state, the command/event handlers, and
//! the serialized engine task.

pub mod handlers;
pub mod state;
pub mod task;

pub use handlers::CommandHandlers;
pub use state::{CoreState, CoreStats};
pub use task::EngineTask;
