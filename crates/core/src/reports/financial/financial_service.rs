use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::reports::UnmatchedPolicy;
use crate::transactions::TransactionRepositoryTrait;
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use super::financial_model::FinancialSummary;

/// Trait defining the contract for financial report generation.
#[async_trait]
pub trait FinancialReportServiceTrait: Send + Sync {
    /// Builds the financial summary for the inclusive date range.
    /// An absent bound leaves that side unbounded.
    async fn get_financial_summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FinancialSummary>;
}

pub struct FinancialReportService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    policy: UnmatchedPolicy,
}

impl FinancialReportService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        FinancialReportService {
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
impl FinancialReportServiceTrait for FinancialReportService {
    async fn get_financial_summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FinancialSummary> {
        debug!(
            "Building financial summary for {:?}..{:?}",
            start_date, end_date
        );

        let records = self
            .transaction_repository
            .get_transactions_in_range(start_date, end_date)
            .await?;

        let mut summary = FinancialSummary::from_records(&records, self.policy)?;
        if summary.skipped > 0 {
            warn!(
                "{} transactions skipped while building the financial summary",
                summary.skipped
            );
        }
        if summary.is_empty() {
            debug!("No attributable transactions in the requested range");
        }

        // Round for display; profitability is recomputed from the rounded
        // totals so the revenue/expense identity survives rounding.
        summary.total_revenue = summary.total_revenue.round_dp(DISPLAY_DECIMAL_PRECISION);
        summary.total_expense = summary.total_expense.round_dp(DISPLAY_DECIMAL_PRECISION);
        summary.profitability = summary.total_revenue - summary.total_expense;
        for val in summary.sales_by_category.values_mut() {
            *val = val.round_dp(DISPLAY_DECIMAL_PRECISION);
        }
        for val in summary.expenses_by_category.values_mut() {
            *val = val.round_dp(DISPLAY_DECIMAL_PRECISION);
        }

        debug!("Financial summary calculation completed successfully");
        Ok(summary)
    }
}
