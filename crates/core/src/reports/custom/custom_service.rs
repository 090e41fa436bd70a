use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::reports::{ReportError, UnmatchedPolicy};
use crate::transactions::{TransactionRecord, TransactionRepositoryTrait};
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::custom_builder::build_rows;
use super::custom_model::{CustomReport, CustomReportRequest, OutputFormat, ReportStatus};
use super::custom_render;

/// Trait defining the contract for custom report generation.
#[async_trait]
pub trait CustomReportServiceTrait: Send + Sync {
    /// Builds a report from caller-defined grouping and aggregation
    /// parameters.
    async fn create_custom_report(&self, request: &CustomReportRequest) -> Result<CustomReport>;

    /// Serializes a generated report in the requested format.
    fn render_report(&self, report: &CustomReport, format: OutputFormat) -> Result<String>;
}

pub struct CustomReportService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    policy: UnmatchedPolicy,
}

impl CustomReportService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        CustomReportService {
            transaction_repository,
            policy: UnmatchedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn report_title(report_type: &str) -> String {
        let mut chars = report_type.chars();
        match chars.next() {
            Some(first) => format!("{}{} report", first.to_uppercase(), chars.as_str()),
            None => "Report".to_string(),
        }
    }
}

#[async_trait]
impl CustomReportServiceTrait for CustomReportService {
    async fn create_custom_report(&self, request: &CustomReportRequest) -> Result<CustomReport> {
        debug!(
            "Building custom report '{}' over {} data sources",
            request.report_type,
            request.data_sources.len()
        );

        let records = self
            .transaction_repository
            .get_transactions_by_types(&request.data_sources, request.start_date, request.end_date)
            .await?;

        // Partition the fetched range per named source; each source keeps
        // its own record sequence for grouping by `source`.
        let sources: Vec<(String, Vec<TransactionRecord>)> = request
            .data_sources
            .iter()
            .map(|transaction_type| {
                let matching = records
                    .iter()
                    .filter(|record| record.transaction_type == *transaction_type)
                    .cloned()
                    .collect();
                (transaction_type.as_str().to_string(), matching)
            })
            .collect();

        let mut report = CustomReport {
            id: Uuid::new_v4().to_string(),
            title: Self::report_title(&request.report_type),
            status: ReportStatus::Completed,
            created_at: Utc::now(),
            group_by: request.group_by.clone(),
            columns: request
                .aggregates
                .iter()
                .map(|spec| spec.column())
                .collect(),
            rows: Vec::new(),
            skipped: 0,
        };

        match build_rows(
            &sources,
            &request.group_by,
            &request.aggregates,
            &request.order_by,
            self.policy,
        ) {
            Ok((mut rows, skipped)) => {
                for row in &mut rows {
                    for value in row.values.values_mut() {
                        *value = value.round_dp(DISPLAY_DECIMAL_PRECISION);
                    }
                }
                if skipped > 0 {
                    warn!(
                        "{} transactions skipped while building report '{}'",
                        skipped, report.title
                    );
                }
                report.rows = rows;
                report.skipped = skipped;
            }
            Err(ReportError::UnmatchedTransaction { id, reason }) => {
                error!(
                    "Custom report '{}' failed: transaction {}: {}",
                    report.title, id, reason
                );
                report.status = ReportStatus::Failed;
            }
            Err(err) => return Err(err.into()),
        }

        debug!(
            "Custom report '{}' finished with {} groups",
            report.title,
            report.rows.len()
        );
        Ok(report)
    }

    fn render_report(&self, report: &CustomReport, format: OutputFormat) -> Result<String> {
        Ok(custom_render::render(report, format)?)
    }
}
