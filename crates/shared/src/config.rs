//! Application configuration management.

use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
///
/// Every section has defaults, so an absent configuration file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Split allocation configuration.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Balance view configuration.
    #[serde(default)]
    pub balance: BalanceConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How leftover minor units are assigned when fractional parts tie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest user id wins ties, independent of roster order.
    #[default]
    ParticipantId,
    /// Earliest position in the participant list wins ties.
    InputOrder,
}

/// Split allocation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocationConfig {
    /// Tie-break rule for the largest-remainder distribution.
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Balance view configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceConfig {
    /// Only keep settlement pairs that involve the viewing user.
    #[serde(default = "default_restrict_pairs_to_user")]
    pub restrict_pairs_to_user: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            restrict_pairs_to_user: default_restrict_pairs_to_user(),
        }
    }
}

fn default_restrict_pairs_to_user() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "fairshare=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FAIRSHARE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
