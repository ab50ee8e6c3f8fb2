//! Median over a price set
//!
//! Upper-median convention: the element at `len / 2` of the ascending order,
//! never an average of the two middle prices.

use super::{OraclePrice, OracleReport};
use crate::error::{MedianatorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedianResult {
    /// All reports, ascending by price; equal prices keep their input order
    pub sorted: Vec<OracleReport>,
    pub median: OraclePrice,
}

pub fn calc_median(mut prices: Vec<OracleReport>) -> Result<MedianResult> {
    if prices.is_empty() {
        return Err(MedianatorError::EmptyInput);
    }

    prices.sort_by_key(|report| report.price.raw_units());
    let median = prices[prices.len() / 2].price;

    Ok(MedianResult {
        sorted: prices,
        median,
    })
}
