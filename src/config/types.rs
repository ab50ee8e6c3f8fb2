//! Configuration sections

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::medianator::{CallTarget, EncoderConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Oracle private key handed to the signer (never logged)
    pub private_key: String,
    /// Address the signer must report back
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// tRPC endpoint of the price backend
    pub trpc_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Ticker price endpoint
    pub ticker_url: String,
    /// Ticker symbol (e.g. BTCUSDT)
    pub symbol: String,
    /// Multiplier from ticker price to reported price
    pub scaling_factor: Decimal,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedianatorConfig {
    pub program_name: String,
    pub function_name: String,
    /// Execution fee in credits
    pub fee: Decimal,
    /// Fixed array capacity of the median transition
    pub oracles_length: usize,
    pub dummy_address: String,
    pub dummy_signature: String,
}

impl MedianatorConfig {
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            oracles_length: self.oracles_length,
            dummy_address: self.dummy_address.clone(),
            dummy_signature: self.dummy_signature.clone(),
        }
    }

    pub fn call_target(&self) -> CallTarget {
        CallTarget {
            program_name: self.program_name.clone(),
            function_name: self.function_name.clone(),
            fee: self.fee,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignerConfig {
    /// Path of the signer executable
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    /// "dry_run" or "command"
    pub mode: String,
    /// Executable used in command mode
    pub command: String,
    /// Arguments placed before the program name
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Default filter when RUST_LOG is unset
    pub filter: String,
}
