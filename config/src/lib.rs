//! BLSCT Configuration
//!
//! Shared configuration crate for the BLSCT SDK and CLI.
//!
//! Handles loading configuration from:
//! 1. BLSCT_CONFIG env var (explicit path)
//! 2. ./blsct.toml (current directory)
//! 3. ~/.blsct/blsct.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{LazyLock, OnceLock};
use std::{env, fs};

/// Global config instance for convenience access
pub static GLOBAL_CONFIG: OnceLock<BlsctConfig> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "blsct.toml";
const CONFIG_DIR_NAME: &str = ".blsct";

// ============================================================================
// Default Constants
// ============================================================================

/// Fee charged per transaction input and per transaction output.
pub const DEFAULT_FEE_PER_COMPONENT: u64 = 200_000;

// ============================================================================
// Chain
// ============================================================================

/// Network the SDK produces addresses and transactions for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Mainnet, Chain::Testnet, Chain::Signet, Chain::Regtest];

    /// Human-readable part used by the address encoding.
    pub fn hrp(&self) -> &'static str {
        match self {
            Chain::Mainnet => "nav",
            Chain::Testnet | Chain::Signet => "tnav",
            Chain::Regtest => "nvrt",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chain::Mainnet => "mainnet",
            Chain::Testnet => "testnet",
            Chain::Signet => "signet",
            Chain::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Chain::Mainnet),
            "testnet" | "test" => Ok(Chain::Testnet),
            "signet" => Ok(Chain::Signet),
            "regtest" => Ok(Chain::Regtest),
            other => bail!("unknown chain: {other}"),
        }
    }
}

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlsctConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub address: AddressConfig,
}

/// Network selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub network: Chain,
}

/// Fee policy used by the transaction assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    #[serde(default = "default_fee_per_component")]
    pub per_component: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            per_component: DEFAULT_FEE_PER_COMPONENT,
        }
    }
}

fn default_fee_per_component() -> u64 {
    DEFAULT_FEE_PER_COMPONENT
}

/// Address encoding variant for TOML config
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AddressEncodingToml {
    Bech32,
    #[default]
    Bech32m,
}

/// Address text encoding configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressConfig {
    #[serde(default)]
    pub encoding: AddressEncodingToml,
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Set field from env var if present and parseable
fn env_parse<T: FromStr>(key: &str, field: &mut T) {
    if let Ok(v) = env::var(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("Ignoring unparseable value for {key}: {v}"),
        }
    }
}

// ============================================================================
// Implementation
// ============================================================================

impl BlsctConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("BLSCT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("BLSCT_CONFIG points to a missing file: {}", path.display());
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        dirs::home_dir()
            .map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        env_parse("BLSCT_CHAIN", &mut self.chain.network);
        env_parse("BLSCT_FEE_PER_COMPONENT", &mut self.fees.per_component);

        if let Ok(v) = env::var("BLSCT_ADDRESS_ENCODING") {
            self.address.encoding = match v.to_ascii_lowercase().as_str() {
                "bech32" => AddressEncodingToml::Bech32,
                _ => AddressEncodingToml::Bech32m,
            };
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        let mut sample = Self::default();
        sample.chain.network = Chain::Testnet;
        toml::to_string_pretty(&sample).unwrap_or_default()
    }

    /// Get the global config instance, initializing it if necessary.
    ///
    /// Falls back to defaults if loading fails.
    pub fn global() -> &'static BlsctConfig {
        GLOBAL_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                log::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Try to get the global config instance.
    ///
    /// Returns `None` if config hasn't been initialized yet.
    pub fn try_global() -> Option<&'static BlsctConfig> {
        GLOBAL_CONFIG.get()
    }

    /// Initialize the global config with a specific instance.
    ///
    /// Returns `Err(config)` if already initialized.
    pub fn set_global(config: BlsctConfig) -> Result<(), BlsctConfig> {
        GLOBAL_CONFIG.set(config)
    }
}

/// Shorthand for `BlsctConfig::global()`.
#[inline]
pub fn global_config() -> &'static BlsctConfig {
    BlsctConfig::global()
}

// ============================================================================
// Parsed Config (lazy-initialized constants)
// ============================================================================

/// Network configuration constant.
///
/// # Example
/// ```ignore
/// use blsct_config::NETWORK;
///
/// let hrp = NETWORK.hrp;  // &'static str
/// ```
pub static NETWORK: LazyLock<NetworkRuntime> = LazyLock::new(|| {
    let cfg = BlsctConfig::global();
    NetworkRuntime {
        chain: cfg.chain.network,
        hrp: cfg.chain.network.hrp(),
        address_encoding: cfg.address.encoding,
    }
});

pub struct NetworkRuntime {
    pub chain: Chain,
    /// Address human-readable part for `chain`
    pub hrp: &'static str,
    pub address_encoding: AddressEncodingToml,
}

/// Fee policy constant.
pub static FEES: LazyLock<FeesRuntime> = LazyLock::new(|| {
    let cfg = BlsctConfig::global();
    FeesRuntime {
        per_component: cfg.fees.per_component,
    }
});

pub struct FeesRuntime {
    pub per_component: u64,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlsctConfig::default();
        assert_eq!(config.chain.network, Chain::Mainnet);
        assert_eq!(config.fees.per_component, DEFAULT_FEE_PER_COMPONENT);
        assert_eq!(config.address.encoding, AddressEncodingToml::Bech32m);
    }

    #[test]
    fn test_generate_sample() {
        let sample = BlsctConfig::generate_sample();
        assert!(sample.contains("[chain]"));
        assert!(sample.contains("[fees]"));
        assert!(sample.contains("[address]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = BlsctConfig::generate_sample();
        let parsed: BlsctConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.chain.network, Chain::Testnet);
        assert_eq!(parsed.fees.per_component, DEFAULT_FEE_PER_COMPONENT);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: BlsctConfig = toml::from_str("[chain]\nnetwork = \"regtest\"\n").unwrap();
        assert_eq!(parsed.chain.network, Chain::Regtest);
        assert_eq!(parsed.fees.per_component, DEFAULT_FEE_PER_COMPONENT);
        assert_eq!(parsed.address.encoding, AddressEncodingToml::Bech32m);
    }

    #[test]
    fn test_chain_from_str() {
        assert_eq!("MainNet".parse::<Chain>().unwrap(), Chain::Mainnet);
        assert_eq!("regtest".parse::<Chain>().unwrap(), Chain::Regtest);
        assert!("moonnet".parse::<Chain>().is_err());
    }

    #[test]
    fn test_chain_hrps() {
        assert_eq!(Chain::Mainnet.hrp(), "nav");
        assert_eq!(Chain::Testnet.hrp(), Chain::Signet.hrp());
        assert_ne!(Chain::Mainnet.hrp(), Chain::Regtest.hrp());
        for chain in Chain::ALL {
            assert_eq!(chain.name().parse::<Chain>().unwrap(), chain);
        }
    }
}
