use crate::reports::ReportError;
use crate::transactions::{TransactionRepositoryTrait, TransactionType};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use super::sales_model::SaleRecord;

/// Trait defining the contract for sale record exports.
#[async_trait]
pub trait SalesDataServiceTrait: Send + Sync {
    /// Lists sale rows for the inclusive date range, skipping sales without
    /// a linked inventory item. Rows are ordered by date, then id.
    async fn get_sale_records(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SaleRecord>>;

    /// Renders sale rows as CSV for bookkeeping import.
    fn export_csv(&self, records: &[SaleRecord]) -> Result<String>;
}

pub struct SalesDataService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl SalesDataService {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        SalesDataService {
            transaction_repository,
        }
    }
}

fn write_csv(records: &[SaleRecord]) -> std::result::Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "transaction_id",
        "date",
        "amount",
        "product_name",
        "product_category",
    ])?;

    for record in records {
        writer.write_record([
            record.transaction_id.as_str(),
            &record.date.to_rfc3339(),
            &record.amount.to_string(),
            record.product_name.as_str(),
            record.product_category.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Render(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ReportError::Render(err.to_string()))
}

#[async_trait]
impl SalesDataServiceTrait for SalesDataService {
    async fn get_sale_records(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<SaleRecord>> {
        debug!("Listing sale records for {:?}..{:?}", start_date, end_date);

        let transactions = self
            .transaction_repository
            .get_transactions_by_types(&[TransactionType::Sale], start_date, end_date)
            .await?;

        let mut records: Vec<SaleRecord> = transactions
            .iter()
            .filter_map(SaleRecord::from_transaction)
            .collect();
        let dropped = transactions.len() - records.len();
        if dropped > 0 {
            debug!("{} sales without a linked item were not exported", dropped);
        }

        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(records)
    }

    fn export_csv(&self, records: &[SaleRecord]) -> Result<String> {
        Ok(write_csv(records)?)
    }
}
