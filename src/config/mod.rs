//! Configuration management for the medianator oracle
//!
//! Loads defaults, optional config files and environment variables via .env

mod types;

pub use types::*;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::medianator::{
    DUMMY_ADDRESS, DUMMY_SIGNATURE, MEDIANATOR_FEE, MEDIANATOR_FUNCTION_NAME,
    MEDIANATOR_ORACLES_LENGTH, MEDIANATOR_PROGRAM_NAME,
};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub backend: BackendConfig,
    pub feed: FeedConfig,
    pub medianator: MedianatorConfig,
    pub signer: SignerConfig,
    pub executor: ExecutorConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Self::builder()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (MEDIANATOR_*)
            .add_source(Environment::with_prefix("MEDIANATOR").separator("__"))
            // Plain variables the oracle has always been deployed with
            .set_override_option("oracle.private_key", std::env::var("ORACLE_PRIVATE_KEY").ok())?
            .set_override_option("oracle.address", std::env::var("ORACLE_ADDRESS").ok())?
            .set_override_option("backend.trpc_url", std::env::var("TRPC_URL").ok())?
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            // Oracle defaults
            .set_default("oracle.private_key", "")?
            .set_default("oracle.address", "")?
            // Backend defaults
            .set_default("backend.trpc_url", "")?
            .set_default("backend.timeout_ms", 10_000)?
            // Feed defaults
            .set_default("feed.ticker_url", "https://api.binance.com/api/v3/ticker/price")?
            .set_default("feed.symbol", "BTCUSDT")?
            .set_default("feed.scaling_factor", "0.00001")?
            .set_default("feed.timeout_ms", 10_000)?
            // Medianator program defaults
            .set_default("medianator.program_name", MEDIANATOR_PROGRAM_NAME)?
            .set_default("medianator.function_name", MEDIANATOR_FUNCTION_NAME)?
            .set_default("medianator.fee", MEDIANATOR_FEE.to_string())?
            .set_default("medianator.oracles_length", MEDIANATOR_ORACLES_LENGTH as i64)?
            .set_default("medianator.dummy_address", DUMMY_ADDRESS)?
            .set_default("medianator.dummy_signature", DUMMY_SIGNATURE)?
            // Signer defaults
            .set_default("signer.path", "./sign")?
            // Executor defaults
            .set_default("executor.mode", "dry_run")?
            .set_default("executor.command", "snarkos")?
            .set_default("executor.args", Vec::<String>::new())?
            // Log defaults
            .set_default("log.json", false)?
            .set_default("log.filter", "info")?)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "oracle={} backend={} feed={}@{} program={}::{} fee={} slots={} executor={}",
            self.oracle.address,
            self.backend.trpc_url,
            self.feed.symbol,
            self.feed.ticker_url,
            self.medianator.program_name,
            self.medianator.function_name,
            self.medianator.fee,
            self.medianator.oracles_length,
            self.executor.mode
        )
    }

    /// Validate values the round cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.oracle.private_key.trim().is_empty() {
            bail!("ORACLE_PRIVATE_KEY (oracle.private_key) is not set");
        }
        if self.oracle.address.trim().is_empty() {
            bail!("ORACLE_ADDRESS (oracle.address) is not set");
        }

        let url = self.backend.trpc_url.as_str();
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or("");
        if host.is_empty() {
            bail!("TRPC_URL (backend.trpc_url) must be an http(s) URL, got {:?}", url);
        }

        let slots = self.medianator.oracles_length;
        if slots == 0 || slots > u8::MAX as usize {
            bail!("medianator.oracles_length must be within 1..=255, got {}", slots);
        }
        if self.medianator.fee.is_sign_negative() {
            bail!("medianator.fee must not be negative, got {}", self.medianator.fee);
        }
        if self.feed.scaling_factor <= rust_decimal::Decimal::ZERO {
            bail!("feed.scaling_factor must be positive, got {}", self.feed.scaling_factor);
        }

        Ok(())
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn defaults() -> AppConfig {
        AppConfig::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn valid() -> AppConfig {
        let mut config = defaults();
        config.oracle.private_key = "APrivateKey1zkpSecret".to_string();
        config.oracle.address = "aleo1oracle".to_string();
        config.backend.trpc_url = "https://backend.example/trpc".to_string();
        config
    }

    #[test]
    fn defaults_match_program_constants() {
        let config = defaults();
        assert_eq!(config.medianator.fee, dec!(0.15));
        assert_eq!(config.medianator.oracles_length, MEDIANATOR_ORACLES_LENGTH);
        assert_eq!(config.medianator.encoder_config(), crate::medianator::EncoderConfig::default());
        assert_eq!(config.medianator.call_target(), crate::medianator::CallTarget::default());
        assert_eq!(config.feed.scaling_factor, dec!(0.00001));
        assert_eq!(config.executor.mode, "dry_run");
    }

    #[test]
    fn defaults_require_secrets() {
        let err = defaults().validate().unwrap_err();
        assert!(err.to_string().contains("ORACLE_PRIVATE_KEY"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_backend() {
        let mut config = valid();
        config.backend.trpc_url = "ftp://backend".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_short_http_backend() {
        let mut config = valid();
        config.backend.trpc_url = "http://x".to_string();
        assert!(config.validate().is_ok());

        config.backend.trpc_url = "https://".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_capacity() {
        let mut config = valid();
        config.medianator.oracles_length = 256;
        assert!(config.validate().is_err());
    }

    #[test]
    fn digest_omits_private_key() {
        let config = valid();
        assert!(!config.digest().contains("APrivateKey1zkpSecret"));
        assert!(config.to_string().contains("aleo1oracle"));
    }
}
