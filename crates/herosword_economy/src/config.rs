//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid simulated-mode configuration.
//!
//! ```toml
//! mode = "ledger"
//! starting_balance = 1000000000000
//! collection_path = "saves/collection.toml"
//! seed = 42
//!
//! [base_sword]
//! attack_power = 10
//! magic_power = 5
//! success_rate = 90
//! value = 1000000000
//!
//! [ledger]
//! network = "testnet"
//! remote_timeout_ms = 30000
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use herosword_shared::constants::{MAINNET_PACKAGE_ID, TESTNET_PACKAGE_ID};
use herosword_shared::{
    Mist, ObjectId, BASE_SUCCESS_RATE, MIN_SUCCESS_RATE, SIMULATED_STARTING_BALANCE,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EconomyError, EconomyResult};
use crate::sword::BaseStats;

/// Default bound on a single remote call.
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 30_000;

/// How state changes are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Local rolls, local balance.
    #[default]
    Simulated,
    /// Every state change is a contract call.
    Ledger,
}

/// Sui network the contract is deployed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// Public testnet.
    #[default]
    Testnet,
    /// Mainnet.
    Mainnet,
}

impl Network {
    /// Package id shipped with the client, if the contract is deployed.
    #[must_use]
    pub const fn default_package_id(self) -> Option<ObjectId> {
        match self {
            Self::Testnet => Some(TESTNET_PACKAGE_ID),
            Self::Mainnet => MAINNET_PACKAGE_ID,
        }
    }
}

/// `[ledger]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Target network.
    pub network: Network,
    /// Overrides the shipped package id (hex, optional `0x`).
    pub package_id: Option<String>,
    /// Bound on each remote call, in milliseconds.
    pub remote_timeout_ms: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            network: Network::default(),
            package_id: None,
            remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
        }
    }
}

impl LedgerSettings {
    /// Resolves the package the engine calls into.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the override does not parse or the network has no
    /// deployed package.
    pub fn package_id(&self) -> EconomyResult<ObjectId> {
        if let Some(raw) = &self.package_id {
            return ObjectId::from_str(raw.trim()).map_err(|e| {
                EconomyError::InvalidConfig(format!("package_id {raw:?}: {e}"))
            });
        }
        self.network.default_package_id().ok_or_else(|| {
            EconomyError::InvalidConfig(format!(
                "no contract deployed on {:?}, set ledger.package_id",
                self.network
            ))
        })
    }

    /// Per-call timeout.
    #[must_use]
    pub const fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Execution mode.
    pub mode: ExecutionMode,
    /// Opening balance in simulated mode.
    pub starting_balance: Mist,
    /// Stats of freshly minted swords.
    pub base_sword: BaseStats,
    /// Collection file. `None` keeps the collection in memory.
    pub collection_path: Option<PathBuf>,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Ledger-mode settings.
    pub ledger: LedgerSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            starting_balance: SIMULATED_STARTING_BALANCE,
            base_sword: BaseStats::default(),
            collection_path: None,
            seed: None,
            ledger: LedgerSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on syntax errors or failed validation.
    pub fn from_toml_str(content: &str) -> EconomyResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// `Persistence` if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read config");
            EconomyError::Persistence(format!("read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to parse config");
            e
        })
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` describing the first violation.
    pub fn validate(&self) -> EconomyResult<()> {
        let rate = self.base_sword.success_rate;
        if !(MIN_SUCCESS_RATE..=BASE_SUCCESS_RATE).contains(&rate) {
            return Err(EconomyError::InvalidConfig(format!(
                "base_sword.success_rate {rate} outside {MIN_SUCCESS_RATE}..={BASE_SUCCESS_RATE}"
            )));
        }
        if self.ledger.remote_timeout_ms == 0 {
            return Err(EconomyError::InvalidConfig(
                "ledger.remote_timeout_ms must be positive".to_string(),
            ));
        }
        if self.mode == ExecutionMode::Ledger {
            self.ledger.package_id()?;
        }
        Ok(())
    }
}
