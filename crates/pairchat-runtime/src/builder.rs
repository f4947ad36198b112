//! Runtime Builder API
//!
//! Provides a builder-style API for consumers (CLI/tests) to wire up the
//! engine task and get command/effect handles.

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::info;

use pairchat_core::channel::{
    create_command_channel, create_effect_channel, create_event_channel, Command, CommandSender,
    EffectReceiver, EffectSender,
};
use pairchat_core::{DurableStore, PairchatConfig, PairchatError, PairchatResult};

use crate::logic::EngineTask;

// ----------------------------------------------------------------------------
// Runtime Builder
// ----------------------------------------------------------------------------

/// Builder for creating a Pairchat runtime
pub struct RuntimeBuilder {
    config: PairchatConfig,
    store: Option<Box<dyn DurableStore>>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Create a new runtime builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PairchatConfig::default(),
            store: None,
        }
    }

    /// Set the engine configuration
    pub fn with_config(mut self, config: PairchatConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a durable backing store for ban records
    pub fn with_store(mut self, store: Box<dyn DurableStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build and start the runtime
    pub async fn build_and_start(self) -> PairchatResult<RuntimeHandle> {
        self.config.validate()?;
        info!("building pairchat runtime");

        let (command_sender, command_receiver) = create_command_channel(&self.config.channels);
        let (event_sender, event_receiver) = create_event_channel(&self.config.channels);
        let (effect_sender, _effect_receiver) = create_effect_channel(&self.config.channels);

        let mut engine = EngineTask::new(
            self.config,
            command_receiver,
            event_receiver,
            event_sender,
            effect_sender.clone(),
            self.store,
        );
        engine.preload_bans().await;

        let engine_handle = tokio::spawn(async move { engine.run().await });

        info!("pairchat runtime started");

        Ok(RuntimeHandle {
            command_sender,
            effect_sender,
            engine_handle: Some(engine_handle),
            running: true,
        })
    }
}

// ----------------------------------------------------------------------------
// Runtime Handle
// ----------------------------------------------------------------------------

/// Handle to a running Pairchat runtime instance
pub struct RuntimeHandle {
    command_sender: CommandSender,
    effect_sender: EffectSender,
    engine_handle: Option<JoinHandle<PairchatResult<()>>>,
    running: bool,
}

impl RuntimeHandle {
    /// Get a command sender for feeding the engine
    pub fn command_sender(&self) -> CommandSender {
        self.command_sender.clone()
    }

    /// Subscribe to outbound effects. Subscribe before sending commands or
    /// earlier effects will be missed.
    pub fn subscribe_effects(&self) -> EffectReceiver {
        self.effect_sender.subscribe()
    }

    /// Send a command to the engine
    pub async fn send_command(&self, command: Command) -> PairchatResult<()> {
        self.command_sender
            .send(command)
            .await
            .map_err(|_| PairchatError::channel_error("failed to send command to engine"))
    }

    /// Check if the engine is still running
    pub fn is_running(&self) -> bool {
        self.running
            && self
                .engine_handle
                .as_ref()
                .is_some_and(|h| !h.is_finished())
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(&mut self) -> PairchatResult<()> {
        info!("shutting down pairchat runtime");

        let _ = self.send_command(Command::Shutdown).await;

        if let Some(handle) = self.engine_handle.take() {
            if tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .is_err()
            {
                // The engine never blocks on I/O, so this is unexpected; the
                // task is detached rather than awaited further.
                return Err(PairchatError::channel_error(
                    "engine did not stop within shutdown timeout",
                ));
            }
        }

        self.running = false;
        info!("pairchat runtime shut down");
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Convenience Functions
// ----------------------------------------------------------------------------

/// Create a runtime with fast timeouts and large buffers for testing
pub async fn create_test_runtime() -> PairchatResult<RuntimeHandle> {
    RuntimeBuilder::new()
        .with_config(PairchatConfig::testing())
        .build_and_start()
        .await
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pairchat_core::{ChatId, Profile};

    #[tokio::test]
    async fn test_runtime_builder() {
        let mut runtime = create_test_runtime().await.expect("failed to build runtime");
        assert!(runtime.is_running());

        runtime
            .send_command(Command::Register {
                id: ChatId::new(1),
                profile: Profile::default(),
            })
            .await
            .expect("failed to send command");

        runtime.shutdown().await.expect("failed to shutdown");
        assert!(!runtime.is_running());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = PairchatConfig::default();
        config.matching.search_timeout_ms = 0;

        let result = RuntimeBuilder::new().with_config(config).build_and_start().await;
        assert!(result.is_err());
    }
}
