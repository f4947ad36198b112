//! Pairchat CLI Configuration Management
//!
//! Loads configuration from configuration files (pairchat.toml), environment
//! variables (PAIRCHAT_*), and command line arguments, with priority
//! ordering: CLI args > env vars > config file > defaults.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use pairchat_core::PairchatConfig;

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the Pairchat CLI application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliAppConfig {
    /// Engine configuration (channels, matching, moderation)
    pub engine: PairchatConfig,

    /// Console-specific configuration
    pub console: ConsoleConfig,

    /// Admin authorization configuration
    pub admin: AdminConfig,
}

/// Console-specific configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Prompt for the interactive interface
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            prompt: "pairchat> ".to_string(),
        }
    }
}

/// Admin authorization configuration.
///
/// The engine trusts a per-command boolean; the console derives that boolean
/// by comparing the issuing id against this configured admin id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Chat id treated as the administrator; admin commands are dropped when
    /// unset
    pub admin_id: Option<i64>,
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl CliAppConfig {
    /// Load configuration with the standard priority order:
    /// 1. Command line overrides (highest priority)
    /// 2. Environment variables (PAIRCHAT_*, `__` separates nesting)
    /// 3. Configuration file (pairchat.toml)
    /// 4. Default values (lowest priority)
    pub fn load_with_overrides(
        config_file: Option<&Path>,
        admin_id: Option<i64>,
        search_timeout_ms: Option<u64>,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        figment = match config_file {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file("pairchat.toml")),
        };

        figment = figment.merge(Env::prefixed("PAIRCHAT_").split("__"));

        if let Some(id) = admin_id {
            figment = figment.merge(("admin.admin_id", id));
        }
        if let Some(ms) = search_timeout_ms {
            figment = figment.merge(("engine.matching.search_timeout_ms", ms));
        }
        if verbose {
            figment = figment.merge(("console.verbose", true));
        }

        let config: CliAppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Loading(format!("failed to load configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Create example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| "# failed to generate example config".to_string())
    }
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
