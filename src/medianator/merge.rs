//! Per-oracle price set
//!
//! Holds at most one report per oracle. A new report from an oracle replaces
//! its previous one instead of accumulating next to it.

use std::collections::BTreeMap;

use super::OracleReport;

/// Oracle identity as compared across the system (case-insensitive)
pub fn normalize_oracle(oracle: &str) -> String {
    oracle.to_lowercase()
}

/// Reports keyed by normalized oracle address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSet {
    reports: BTreeMap<String, OracleReport>,
}

impl PriceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the report of `report.oracle`, returning the old one
    pub fn insert(&mut self, report: OracleReport) -> Option<OracleReport> {
        self.reports.insert(report.oracle_key(), report)
    }

    pub fn get(&self, oracle: &str) -> Option<&OracleReport> {
        self.reports.get(&normalize_oracle(oracle))
    }

    /// Reports ordered by normalized oracle address
    pub fn into_reports(self) -> Vec<OracleReport> {
        self.reports.into_values().collect()
    }
}

impl FromIterator<OracleReport> for PriceSet {
    fn from_iter<I: IntoIterator<Item = OracleReport>>(iter: I) -> Self {
        let mut set = Self::new();
        for report in iter {
            set.insert(report);
        }
        set
    }
}

/// Fold `new_price` into the current set, replacing any earlier report from
/// the same oracle.
pub fn merge_prices(prices: Vec<OracleReport>, new_price: OracleReport) -> Vec<OracleReport> {
    let mut set: PriceSet = prices.into_iter().collect();
    if let Some(previous) = set.insert(new_price) {
        tracing::debug!(
            oracle = %previous.oracle,
            price = %previous.price,
            "Replacing previous report"
        );
    }
    set.into_reports()
}
