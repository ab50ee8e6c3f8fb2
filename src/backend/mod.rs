//! Backend price store
//!
//! The backend keeps the current per-oracle price set and brokers reads and
//! writes of it. Every response is checked against the expected shape before
//! any value reaches the core.

mod trpc;

pub use trpc::TrpcClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MedianatorError, Result};
use crate::medianator::{OraclePrice, OracleReport};

const COLLABORATOR: &str = "backend";

/// Remote store of the median price set
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Current price set, possibly empty
    async fn get_prices(&self) -> Result<Vec<OracleReport>>;

    /// Replace the stored set with `prices`
    async fn add_price(&self, prices: &[OracleReport]) -> Result<()>;
}

/// `getPrices` result
#[derive(Debug, Clone, Deserialize)]
pub struct GetPricesResponse {
    #[serde(default)]
    pub median: Option<MedianSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedianSnapshot {
    #[serde(default)]
    pub prices: Option<Vec<StoredPrice>>,
}

/// One entry as the backend stores it; `price` is in raw units
#[derive(Debug, Clone, Deserialize)]
pub struct StoredPrice {
    pub oracle: String,
    pub price: serde_json::Value,
    #[serde(default)]
    pub signature: Option<String>,
}

impl StoredPrice {
    fn into_report(self) -> Result<OracleReport> {
        let price = OraclePrice::from_raw_value(&self.price).map_err(|e| {
            MedianatorError::collaborator(
                COLLABORATOR,
                format!("invalid price for oracle {}: {}", self.oracle, e),
            )
        })?;
        let signature = self.signature.ok_or_else(|| {
            MedianatorError::collaborator(
                COLLABORATOR,
                format!("missing signature for oracle {}", self.oracle),
            )
        })?;
        Ok(OracleReport::new(self.oracle, signature, price))
    }
}

impl GetPricesResponse {
    /// Validate a raw `getPrices` payload
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            MedianatorError::collaborator(COLLABORATOR, format!("unexpected getPrices shape: {}", e))
        })
    }

    pub fn into_reports(self) -> Result<Vec<OracleReport>> {
        self.median
            .and_then(|m| m.prices)
            .unwrap_or_default()
            .into_iter()
            .map(StoredPrice::into_report)
            .collect()
    }
}

/// `addPrice` input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddPriceInput {
    pub prices: Vec<AddPriceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddPriceEntry {
    pub oracle: String,
    pub signature: String,
    /// Raw units as a decimal integer string
    pub price: String,
}

impl AddPriceInput {
    pub fn from_reports(reports: &[OracleReport]) -> Self {
        Self {
            prices: reports
                .iter()
                .map(|r| AddPriceEntry {
                    oracle: r.oracle.clone(),
                    signature: r.signature.clone(),
                    price: r.price.raw_units().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_from_valid_payload() {
        let payload = json!({
            "median": {
                "prices": [
                    { "oracle": "aleo1a", "price": "100000000", "signature": "sign1a" },
                    { "oracle": "aleo1b", "price": 102000000, "signature": "sign1b" }
                ]
            }
        });
        let reports = GetPricesResponse::from_json(payload)
            .unwrap()
            .into_reports()
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].price.raw_units(), 100_000_000);
        assert_eq!(reports[1].signature, "sign1b");
    }

    #[test]
    fn missing_or_null_median_is_empty() {
        for payload in [json!({}), json!({ "median": null }), json!({ "median": { "prices": null } })] {
            let reports = GetPricesResponse::from_json(payload)
                .unwrap()
                .into_reports()
                .unwrap();
            assert!(reports.is_empty());
        }
    }

    #[test]
    fn wrong_shape_is_collaborator_error() {
        let err = GetPricesResponse::from_json(json!({ "median": { "prices": [{ "price": 1 }] } }))
            .unwrap_err();
        assert!(matches!(err, MedianatorError::Collaborator { collaborator: "backend", .. }));
    }

    #[test]
    fn non_integer_price_is_collaborator_error() {
        let payload = json!({
            "median": { "prices": [{ "oracle": "aleo1a", "price": "1.5", "signature": "s" }] }
        });
        let err = GetPricesResponse::from_json(payload)
            .unwrap()
            .into_reports()
            .unwrap_err();
        assert!(err.to_string().contains("invalid price for oracle aleo1a"));
    }

    #[test]
    fn missing_signature_is_collaborator_error() {
        let payload = json!({ "median": { "prices": [{ "oracle": "aleo1a", "price": 5 }] } });
        let err = GetPricesResponse::from_json(payload)
            .unwrap()
            .into_reports()
            .unwrap_err();
        assert_eq!(
            err,
            MedianatorError::collaborator("backend", "missing signature for oracle aleo1a")
        );
    }

    #[test]
    fn add_price_input_carries_raw_units() {
        let reports = vec![OracleReport::new(
            "aleo1a",
            "sign1a",
            OraclePrice::parse_user_price("101").unwrap(),
        )];
        let input = AddPriceInput::from_reports(&reports);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "prices": [{ "oracle": "aleo1a", "signature": "sign1a", "price": "101000000" }] })
        );
    }
}
