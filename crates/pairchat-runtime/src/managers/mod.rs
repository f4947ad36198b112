//! State managers owned by the engine task
//!
//! Each manager wraps one of the engine's stores behind a narrow API. They
//! hold no locks and spawn no tasks: the engine task owns them exclusively
//! and serializes every mutation.

pub mod moderation;
pub mod pairs;
pub mod queue;
pub mod roster;

pub use moderation::{BanList, BanRecord, Blocklist};
pub use pairs::PairRegistry;
pub use queue::WaitQueues;
pub use roster::Roster;
