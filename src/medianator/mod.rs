//! Medianator core - price set merge, median and fixed-width call encoding
//!
//! Takes the per-oracle price set held by the backend, folds one freshly
//! signed report into it, orders it by price and packs it into the
//! fixed-capacity arguments of the `medianator_set_median` transition.

mod encoder;
mod median;
mod merge;
mod price;
mod sdk;

pub use encoder::{
    encode, encode_address, encode_array, encode_bool, encode_signature, encode_u64, encode_u8,
    CallEncoder, EncodedCall, EncoderConfig,
};
pub use median::{calc_median, MedianResult};
pub use merge::{merge_prices, normalize_oracle, PriceSet};
pub use price::OraclePrice;
pub use sdk::{CallTarget, MedianUpdate, MedianatorSdk};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fractional digits of every oracle price
pub const ORACLE_PRICE_DECIMALS: u32 = 6;
/// 10^ORACLE_PRICE_DECIMALS
pub const ORACLE_PRICE_DENOMINATOR: i128 = 1_000_000;

/// Slots in each array argument of the median transition
pub const MEDIANATOR_ORACLES_LENGTH: usize = 16;
pub const MEDIANATOR_PROGRAM_NAME: &str = "medianator_ajhfoeiufhofoeuhh14.aleo";
pub const MEDIANATOR_FUNCTION_NAME: &str = "medianator_set_median";
/// Execution fee in credits
pub const MEDIANATOR_FEE: Decimal = dec!(0.15);

/// Filler for unused oracle slots
pub const DUMMY_ADDRESS: &str = "aleo1kepmevud07adjx89sgte6755mmanscsj6fc3yn8dkp0qupld659qlcusq2";

/// Filler for unused signature slots
pub const DUMMY_SIGNATURE: &str = "sign17cwzkfm53fevma7r0g0lg5mxx5zhmengquqq74yhaegfjcalf5py8a646zcsxpecwpsczwf9warcy2n9xlvcwxmvz48vw4a9e2uuyq3jglyxezm98ra2q6v7kj4fw0ujrxrlgmp6mgr9ds8eu56azuvgpxfa65gxpcpq38xf7pvcx0rzkl4g7ssa8d4yrk5366dpzdrzexxsclwnmcq";

/// One oracle's signed price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReport {
    pub oracle: String,
    pub signature: String,
    pub price: OraclePrice,
}

impl OracleReport {
    pub fn new(oracle: impl Into<String>, signature: impl Into<String>, price: OraclePrice) -> Self {
        Self {
            oracle: oracle.into(),
            signature: signature.into(),
            price,
        }
    }

    /// Oracle identity used for deduplication
    pub fn oracle_key(&self) -> String {
        normalize_oracle(&self.oracle)
    }
}
