//! Binance ticker feed
//!
//! Reads the spot ticker (`/api/v3/ticker/price`) and rescales it into the
//! reported unit with exact decimal arithmetic.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use super::PriceFeed;
use crate::config::FeedConfig;
use crate::error::{MedianatorError, Result};
use crate::medianator::{OraclePrice, ORACLE_PRICE_DECIMALS};

const COLLABORATOR: &str = "binance";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

pub struct BinancePriceGetter {
    client: Client,
    ticker_url: String,
    symbol: String,
    scaling_factor: Decimal,
}

impl BinancePriceGetter {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ticker_url: config.ticker_url.clone(),
            symbol: config.symbol.clone(),
            scaling_factor: config.scaling_factor,
        })
    }

    async fn fetch_ticker(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.ticker_url)
            .query(&[("symbol", self.symbol.as_str())])
            .send()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to get price: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to read price: {}", e)))?;

        decode_ticker(status, &body)
    }
}

/// Ticker price string from a raw HTTP response
fn decode_ticker(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        return Err(MedianatorError::collaborator(
            COLLABORATOR,
            format!("failed to get price ({}): {}", status, body),
        ));
    }

    let ticker: TickerResponse = serde_json::from_str(body)
        .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("unexpected ticker shape: {}", e)))?;
    Ok(ticker.price)
}

#[async_trait]
impl PriceFeed for BinancePriceGetter {
    fn name(&self) -> &'static str {
        "Binance"
    }

    async fn get_price(&self) -> Result<OraclePrice> {
        let ticker = self.fetch_ticker().await?;
        let price = scale_price(&ticker, self.scaling_factor)?;

        tracing::info!(
            source = %self.name(),
            symbol = %self.symbol,
            ticker = %ticker,
            price = %price,
            "Fetched feed price"
        );
        Ok(price)
    }
}

/// `ticker * factor`, rounded half-up to the oracle precision
pub fn scale_price(ticker: &str, factor: Decimal) -> Result<OraclePrice> {
    let value = Decimal::from_str(ticker).map_err(|e| {
        MedianatorError::collaborator(COLLABORATOR, format!("ticker price {:?} is not a decimal: {}", ticker, e))
    })?;
    let scaled = value
        .checked_mul(factor)
        .ok_or_else(|| MedianatorError::collaborator(COLLABORATOR, format!("ticker price {} overflows", ticker)))?
        .round_dp_with_strategy(ORACLE_PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);

    OraclePrice::parse_user_price(&scaled.to_string())
}
