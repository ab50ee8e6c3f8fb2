//! Median aggregation round
//!
//! read backend set → merge new report → sort + median → write set back →
//! encode → (optionally) submit. Each step needs the previous one's output
//! and any failure aborts the round; rerunning with the same report is safe
//! because every write replaces the whole set.

use rust_decimal::Decimal;

use super::{
    calc_median, merge_prices, CallEncoder, EncodedCall, OraclePrice, OracleReport,
    MEDIANATOR_FEE, MEDIANATOR_FUNCTION_NAME, MEDIANATOR_PROGRAM_NAME,
};
use crate::backend::PriceStore;
use crate::error::Result;
use crate::executor::ProgramExecutor;

/// Program call the median is submitted through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub program_name: String,
    pub function_name: String,
    pub fee: Decimal,
}

impl Default for CallTarget {
    fn default() -> Self {
        Self {
            program_name: MEDIANATOR_PROGRAM_NAME.to_string(),
            function_name: MEDIANATOR_FUNCTION_NAME.to_string(),
            fee: MEDIANATOR_FEE,
        }
    }
}

/// Outcome of one aggregation round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedianUpdate {
    pub median: OraclePrice,
    pub sorted: Vec<OracleReport>,
    pub call: EncodedCall,
}

pub struct MedianatorSdk<S> {
    store: S,
    encoder: CallEncoder,
    target: CallTarget,
}

impl<S: PriceStore> MedianatorSdk<S> {
    pub fn new(store: S, encoder: CallEncoder, target: CallTarget) -> Self {
        Self {
            store,
            encoder,
            target,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge `report` into the backend set, store the result and encode it
    pub async fn aggregate(&self, report: OracleReport) -> Result<MedianUpdate> {
        let current = self.store.get_prices().await?;
        tracing::debug!(
            stored = current.len(),
            oracle = %report.oracle,
            price = %report.price,
            "Merging oracle report"
        );

        let merged = merge_prices(current, report);
        let result = calc_median(merged)?;

        self.store.add_price(&result.sorted).await?;

        let call = self.encoder.encode(&result.sorted)?;
        tracing::info!(
            oracles = result.sorted.len(),
            median = %result.median,
            "Median price set updated"
        );

        Ok(MedianUpdate {
            median: result.median,
            sorted: result.sorted,
            call,
        })
    }

    pub async fn submit(&self, executor: &dyn ProgramExecutor, call: &EncodedCall) -> Result<()> {
        executor
            .execute(
                &self.target.program_name,
                &self.target.function_name,
                self.target.fee,
                &call.inputs(),
            )
            .await
    }

    /// Full round: aggregate then submit the encoded call
    pub async fn set_median_price_for_oracle(
        &self,
        executor: &dyn ProgramExecutor,
        report: OracleReport,
    ) -> Result<MedianUpdate> {
        let update = self.aggregate(report).await?;
        self.submit(executor, &update.call).await?;
        tracing::info!(
            program = %self.target.program_name,
            count = update.call.oracle_count,
            "Median call submitted"
        );
        Ok(update)
    }
}
