//! Market price feeds
//!
//! A feed produces the price this oracle signs and reports.

mod binance;

pub use binance::BinancePriceGetter;

use async_trait::async_trait;

use crate::error::Result;
use crate::medianator::OraclePrice;

#[async_trait]
pub trait PriceFeed: Send + Sync {
    fn name(&self) -> &'static str;

    /// Current price, already converted to the oracle's unit
    async fn get_price(&self) -> Result<OraclePrice>;
}
