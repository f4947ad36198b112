//! Engine Task Implementation
//!
//! The engine task is the single owner of all mutable state. It drains two
//! mailboxes — commands from the transport and events from timer tasks —
//! strictly one message at a time, so a match transaction (queue pop plus
//! link creation) can never interleave with another operation.
//!
//! Outbound effects are broadcast fire-and-forget: a notifier that lags or
//! disappears is logged and never rolls back a state transition.

use tracing::{debug, info, warn};

use pairchat_core::channel::{
    Command, CommandReceiver, Effect, Event, EventReceiver, EventSender, EffectSender,
};
use pairchat_core::{ChatId, DurableStore, PairchatConfig, PairchatResult};

use super::handlers::CommandHandlers;
use super::state::CoreState;
use crate::managers::BanRecord;
use crate::timers::SearchTimers;

// ----------------------------------------------------------------------------
// Durable store keys
// ----------------------------------------------------------------------------

const BAN_KEY_PREFIX: &str = "ban:";

fn ban_key(id: ChatId) -> String {
    format!("{BAN_KEY_PREFIX}{id}")
}

fn id_from_ban_key(key: &str) -> Option<ChatId> {
    key.strip_prefix(BAN_KEY_PREFIX)?.parse().ok()
}

// ----------------------------------------------------------------------------
// Engine Task
// ----------------------------------------------------------------------------

/// The engine task that processes all commands and events
pub struct EngineTask {
    /// Consolidated engine state
    state: CoreState,
    /// Engine configuration
    config: PairchatConfig,
    /// Armed search timers, keyed by participant
    timers: SearchTimers,
    /// Optional durable backing for ban records
    store: Option<Box<dyn DurableStore>>,
    /// Channel for receiving commands from the transport
    command_receiver: CommandReceiver,
    /// Channel for receiving events from timer tasks
    event_receiver: EventReceiver,
    /// Cloned into each armed timer so it can report back
    event_sender: EventSender,
    /// Channel for broadcasting effects to the notifier
    effect_sender: EffectSender,
    /// Whether the task should continue running
    running: bool,
}

impl EngineTask {
    /// Create a new engine task
    pub fn new(
        config: PairchatConfig,
        command_receiver: CommandReceiver,
        event_receiver: EventReceiver,
        event_sender: EventSender,
        effect_sender: EffectSender,
        store: Option<Box<dyn DurableStore>>,
    ) -> Self {
        let state = CoreState::new(&config);
        Self {
            state,
            config,
            timers: SearchTimers::new(),
            store,
            command_receiver,
            event_receiver,
            event_sender,
            effect_sender,
            running: true,
        }
    }

    /// Reload ban records from the durable store, if one is configured.
    /// Failures fail closed: unreadable or corrupt records are skipped and
    /// the engine starts with whatever loaded cleanly.
    pub async fn preload_bans(&mut self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let keys = match store.list_keys(BAN_KEY_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("failed to list ban records, starting with empty ban list: {e}");
                return;
            }
        };

        let mut loaded = 0usize;
        for key in keys {
            let Some(id) = id_from_ban_key(&key) else {
                warn!(%key, "skipping malformed ban key");
                continue;
            };
            match store.retrieve(&key).await {
                Ok(Some(data)) => match serde_json::from_slice::<BanRecord>(&data) {
                    Ok(record) => {
                        self.state.bans.insert_record(id, record);
                        loaded += 1;
                    }
                    Err(e) => warn!(%key, "skipping corrupt ban record: {e}"),
                },
                Ok(None) => {}
                Err(e) => warn!(%key, "failed to read ban record: {e}"),
            }
        }
        if loaded > 0 {
            info!(loaded, "reloaded ban records from durable store");
        }
    }

    /// Run the main engine task loop
    pub async fn run(&mut self) -> PairchatResult<()> {
        info!("engine task starting");

        while self.running {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(cmd) => {
                            debug!(?cmd, "processing command");
                            self.process_command(cmd).await;
                        }
                        None => {
                            info!("command channel closed, shutting down");
                            break;
                        }
                    }
                }
                event = self.event_receiver.recv() => {
                    match event {
                        Some(evt) => {
                            debug!(?evt, "processing event");
                            self.process_event(evt);
                        }
                        // The engine holds its own event sender, so this
                        // arm is unreachable until shutdown.
                        None => break,
                    }
                }
            }
        }

        info!("engine task stopped");
        Ok(())
    }

    /// Stop the engine task
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Process one command and apply its effects
    async fn process_command(&mut self, command: Command) {
        self.state.stats.commands_processed += 1;

        let effects = match command {
            Command::Register { id, profile } => {
                CommandHandlers::handle_register(&mut self.state, id, profile)
            }
            Command::Join { id, category } => {
                CommandHandlers::handle_join(&mut self.state, id, category)
            }
            Command::Text { id, text } => {
                let (_outcome, effects) = CommandHandlers::handle_text(&mut self.state, id, &text);
                effects
            }
            Command::EndChat { id } => CommandHandlers::handle_end_chat(&mut self.state, id),
            Command::CancelSearch { id } => {
                CommandHandlers::handle_cancel_search(&mut self.state, id)
            }
            Command::Ban {
                actor,
                target,
                reason,
            } => {
                let effects =
                    CommandHandlers::handle_ban(&mut self.state, actor, target, reason);
                if actor.is_admin {
                    self.persist_ban(target).await;
                }
                effects
            }
            Command::Unban { actor, target } => {
                let effects = CommandHandlers::handle_unban(&mut self.state, actor, target);
                if actor.is_admin {
                    self.persist_unban(target).await;
                }
                effects
            }
            Command::Stats { actor } => CommandHandlers::handle_stats(&self.state, actor),
            Command::Shutdown => {
                self.running = false;
                Vec::new()
            }
        };

        for effect in effects {
            self.apply_effect(effect);
        }
    }

    /// Process one event from a timer task
    fn process_event(&mut self, event: Event) {
        self.state.stats.events_processed += 1;

        let effects = match event {
            Event::SearchTimeout { id } => {
                CommandHandlers::handle_search_timeout(&mut self.state, id)
            }
        };

        for effect in effects {
            self.apply_effect(effect);
        }
    }

    /// Dispatch one effect: timer effects are handled locally, everything
    /// else goes out to the notifier.
    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ArmSearchTimer { id } => {
                self.timers.arm(
                    id,
                    self.config.matching.search_timeout(),
                    self.event_sender.clone(),
                );
            }
            Effect::CancelSearchTimer { id } => {
                self.timers.cancel(&id);
            }
            outbound => {
                self.state.stats.effects_emitted += 1;
                // Fire-and-forget: failures mean no notifier is subscribed.
                if let Err(e) = self.effect_sender.send(outbound) {
                    warn!("dropping outbound effect, no notifier subscribed: {e}");
                }
            }
        }
    }

    /// Write a ban record through to the durable store
    async fn persist_ban(&mut self, target: ChatId) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let Some(record) = self.state.bans.get(&target) else {
            return;
        };
        match serde_json::to_vec(record) {
            Ok(data) => {
                if let Err(e) = store.store(&ban_key(target), data).await {
                    warn!(%target, "failed to persist ban record: {e}");
                }
            }
            Err(e) => warn!(%target, "failed to encode ban record: {e}"),
        }
    }

    /// Remove a ban record from the durable store
    async fn persist_unban(&mut self, target: ChatId) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(e) = store.delete(&ban_key(target)).await {
            warn!(%target, "failed to remove persisted ban record: {e}");
        }
    }

    /// Current statistics
    pub fn stats(&self) -> &super::state::CoreStats {
        &self.state.stats
    }

    /// Number of currently armed search timers
    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
