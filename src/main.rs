//! Medianator oracle round
//!
//! Fetches the feed price, signs it, merges it into the backend median set
//! and submits the encoded median call. One round per invocation.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medianator::backend::TrpcClient;
use medianator::config::{AppConfig, LogConfig};
use medianator::executor;
use medianator::feed::{BinancePriceGetter, PriceFeed};
use medianator::medianator::{CallEncoder, MedianatorSdk, OracleReport};
use medianator::signer::{CommandSigner, PriceSigner};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log);
    config.validate()?;

    info!(config = %config, "Starting medianator oracle round");

    let feed = BinancePriceGetter::new(&config.feed)?;
    let price = feed
        .get_price()
        .await
        .with_context(|| format!("Failed to get {} price", feed.name()))?;

    let signer = CommandSigner::new(&config.signer, &config.oracle);
    let signature = signer.sign(&price).await.context("Failed to sign price")?;

    info!(
        oracle = %signer.oracle_address(),
        price = %price.to_exact(),
        signature = %signature,
        "Price signed"
    );

    let store = TrpcClient::new(&config.backend)?;
    let sdk = MedianatorSdk::new(
        store,
        CallEncoder::new(config.medianator.encoder_config()),
        config.medianator.call_target(),
    );
    let executor = executor::from_config(&config.executor)?;

    let report = OracleReport::new(signer.oracle_address(), signature, price);
    let update = sdk
        .set_median_price_for_oracle(executor.as_ref(), report)
        .await
        .context("Failed to set medianator price")?;

    info!(
        median = %update.median,
        oracles = update.sorted.len(),
        "✅ Oracle round complete"
    );

    Ok(())
}
