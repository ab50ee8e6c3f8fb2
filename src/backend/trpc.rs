//! tRPC HTTP client for the backend
//!
//! Speaks the batch link protocol with SuperJSON payloads:
//! - query: `GET {url}/getPrices?batch=1&input={"0":{"json":{}}}`
//! - mutation: `POST {url}/addPrice?batch=1` with `{"0":{"json":..,"meta":..}}`
//!
//! Responses are arrays of `{"result":{"data":{"json":..}}}` or `{"error":..}`.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::{AddPriceInput, GetPricesResponse, PriceStore, COLLABORATOR};
use crate::config::BackendConfig;
use crate::error::{MedianatorError, Result};
use crate::medianator::OracleReport;

const GET_PRICES: &str = "getPrices";
const ADD_PRICE: &str = "addPrice";

#[derive(Debug, Deserialize)]
struct BatchItem {
    #[serde(default)]
    result: Option<BatchResult>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BatchResult {
    data: SuperJson,
}

#[derive(Debug, Deserialize)]
struct SuperJson {
    #[serde(default)]
    json: Value,
}

/// Backend client over tRPC
pub struct TrpcClient {
    client: Client,
    base_url: String,
}

impl TrpcClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.trpc_url.trim_end_matches('/').to_string(),
        })
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url, procedure)
    }

    async fn read_body(procedure: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("{}: failed to read body: {}", procedure, e)))?;

        decode_response(procedure, status, &body)
    }
}

#[async_trait]
impl PriceStore for TrpcClient {
    async fn get_prices(&self) -> Result<Vec<OracleReport>> {
        let input = json!({ "0": { "json": {} } }).to_string();

        tracing::debug!(url = %self.procedure_url(GET_PRICES), "Querying backend prices");

        let response = self
            .client
            .get(self.procedure_url(GET_PRICES))
            .query(&[("batch", "1"), ("input", input.as_str())])
            .send()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("{} request failed: {}", GET_PRICES, e)))?;

        let payload = Self::read_body(GET_PRICES, response).await?;
        let reports = GetPricesResponse::from_json(payload)?.into_reports()?;

        tracing::info!(count = reports.len(), "Fetched backend price set");
        Ok(reports)
    }

    async fn add_price(&self, prices: &[OracleReport]) -> Result<()> {
        let body = add_price_body(&AddPriceInput::from_reports(prices))?;

        let response = self
            .client
            .post(format!("{}?batch=1", self.procedure_url(ADD_PRICE)))
            .json(&body)
            .send()
            .await
            .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("{} request failed: {}", ADD_PRICE, e)))?;

        Self::read_body(ADD_PRICE, response).await?;

        tracing::info!(count = prices.len(), "Stored updated price set");
        Ok(())
    }
}

/// Batch body for `addPrice`; prices are tagged as SuperJSON bigints
fn add_price_body(input: &AddPriceInput) -> Result<Value> {
    let json = serde_json::to_value(input)
        .map_err(|e| MedianatorError::collaborator(COLLABORATOR, format!("failed to encode {}: {}", ADD_PRICE, e)))?;

    let values: Map<String, Value> = (0..input.prices.len())
        .map(|i| (format!("prices.{}.price", i), json!(["bigint"])))
        .collect();

    let mut entry = json!({ "json": json });
    if !values.is_empty() {
        entry["meta"] = json!({ "values": values });
    }
    Ok(json!({ "0": entry }))
}

/// Check the HTTP status, then unwrap the batch body
fn decode_response(procedure: &str, status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        let detail = batch_error_message(body).unwrap_or_else(|| body.trim().to_string());
        return Err(MedianatorError::collaborator(
            COLLABORATOR,
            format!("{} returned {}: {}", procedure, status, detail),
        ));
    }
    decode_batch_response(procedure, body)
}

fn batch_error_message(body: &str) -> Option<String> {
    let items: Vec<BatchItem> = serde_json::from_str(body).ok()?;
    let error = items.into_iter().next()?.error?;
    Some(error_message(&error))
}

fn error_message(error: &Value) -> String {
    error
        .pointer("/json/message")
        .or_else(|| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

/// Unwrap the first item of a batch response
fn decode_batch_response(procedure: &str, body: &str) -> Result<Value> {
    let items: Vec<BatchItem> = serde_json::from_str(body).map_err(|e| {
        MedianatorError::collaborator(
            COLLABORATOR,
            format!("{}: malformed batch response: {}", procedure, e),
        )
    })?;

    let item = items.into_iter().next().ok_or_else(|| {
        MedianatorError::collaborator(COLLABORATOR, format!("{}: empty batch response", procedure))
    })?;

    if let Some(error) = item.error {
        return Err(MedianatorError::collaborator(
            COLLABORATOR,
            format!("{}: {}", procedure, error_message(&error)),
        ));
    }

    item.result.map(|r| r.data.json).ok_or_else(|| {
        MedianatorError::collaborator(
            COLLABORATOR,
            format!("{}: response has neither result nor error", procedure),
        )
    })
}
