use alloy::primitives::Address;
use config::{Config, ConfigError, File};
use log::LevelFilter;
use serde::Deserialize;
use std::time::Duration;

use crate::chain::DEFAULT_RPC_CALL_TIMEOUT;
use crate::position::PositionRequest;
use crate::utils::Precision;

/// Node connection settings.
#[derive(Debug, Deserialize, Clone)]
pub struct RpcSettings {
    #[serde(default = "default_rpc_url")]
    pub url: String,
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl RpcSettings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_call_timeout_secs() -> u64 {
    DEFAULT_RPC_CALL_TIMEOUT.as_secs()
}

/// Deployed contract addresses.
///
/// token0 is the quote token (USDC), token1 the base token (WETH).
#[derive(Debug, Deserialize, Clone)]
pub struct ContractSettings {
    pub token0: Address,
    pub token1: Address,
    pub pool: Address,
    pub manager: Address,
    pub quoter: Address,
}

/// Optional swap quote to run after planning.
#[derive(Debug, Deserialize, Clone)]
pub struct QuoteSettings {
    /// Input amount in whole tokens.
    pub amount: f64,
    /// true swaps token0 for token1.
    #[serde(default)]
    pub zero_for_one: bool,
    /// Price (token0 per token1) the swap may not cross.
    pub price_limit: f64,
}

/// Root application configuration.
///
/// Loaded from `config.yaml` in the working directory.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub rpc: RpcSettings,
    pub contracts: ContractSettings,
    pub position: PositionRequest,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub quote: Option<QuoteSettings>,
    /// Send the mint instead of only planning it.
    #[serde(default)]
    pub submit: bool,
    /// Node-managed account the mint is sent from. Required with `submit`.
    #[serde(default)]
    pub sender: Option<Address>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("config")
    }

    /// Load from a file name without extension; the format follows the
    /// extension found on disk.
    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(name))
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.submit && self.sender.is_none() {
            return Err(ConfigError::Message(
                "`sender` is required when `submit` is true".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Message(format!("invalid log_level `{}`", self.log_level)))
    }
}
