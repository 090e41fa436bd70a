use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::reports::UnmatchedPolicy;
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use super::trends_model::{TrendGrouping, TrendSeries};

/// Trait defining the contract for sales trend analysis.
#[async_trait]
pub trait TrendServiceTrait: Send + Sync {
    /// Builds the sales trend series for the inclusive date range,
    /// bucketed by the requested grouping.
    async fn get_sales_trends(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        grouping: TrendGrouping,
    ) -> Result<TrendSeries>;
}

pub struct TrendService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    policy: UnmatchedPolicy,
}

impl TrendService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        TrendService {
            transaction_repository,
            policy: UnmatchedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl TrendServiceTrait for TrendService {
    async fn get_sales_trends(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        grouping: TrendGrouping,
    ) -> Result<TrendSeries> {
        debug!(
            "Building {} sales trends for {:?}..{:?}",
            grouping.as_str(),
            start_date,
            end_date
        );

        let records = self
            .transaction_repository
            .get_transactions_by_types(&[TransactionType::Sale], start_date, end_date)
            .await?;

        let mut series = TrendSeries::from_sales(&records, grouping, self.policy)?;
        if series.skipped > 0 {
            warn!(
                "{} sales skipped while building the {} trend series",
                series.skipped,
                grouping.as_str()
            );
        }

        for bucket in series.buckets.values_mut() {
            bucket.total_sales = bucket.total_sales.round_dp(DISPLAY_DECIMAL_PRECISION);
            bucket.average_sale = bucket.average_sale.round_dp(DISPLAY_DECIMAL_PRECISION);
        }

        debug!(
            "Trend series calculation completed with {} buckets",
            series.buckets.len()
        );
        Ok(series)
    }
}
