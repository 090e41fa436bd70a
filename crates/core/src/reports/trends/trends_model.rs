//! Sales trend domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::reports::{ReportError, UnmatchedPolicy};
use crate::transactions::TransactionRecord;

/// Grouping dimension for sales trend analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGrouping {
    /// Bucket by calendar month of the transaction date
    Monthly,
    /// Bucket by linked inventory item name
    Product,
    /// Bucket by linked inventory item category
    Category,
}

impl TrendGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendGrouping::Monthly => "monthly",
            TrendGrouping::Product => "product",
            TrendGrouping::Category => "category",
        }
    }
}

impl FromStr for TrendGrouping {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(TrendGrouping::Monthly),
            "product" => Ok(TrendGrouping::Product),
            "category" => Ok(TrendGrouping::Category),
            _ => Err(ReportError::UnknownGrouping(s.to_string())),
        }
    }
}

/// Accumulated figures for one trend bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    pub total_sales: Decimal,
    pub transaction_count: u64,
    /// Computed after the pass; stays zero for buckets without transactions.
    pub average_sale: Decimal,
}

impl TrendBucket {
    fn new() -> Self {
        TrendBucket {
            total_sales: Decimal::ZERO,
            transaction_count: 0,
            average_sale: Decimal::ZERO,
        }
    }
}

/// Sales trend series keyed by month, product, or category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub grouping: TrendGrouping,
    pub buckets: HashMap<String, TrendBucket>,
    /// Transactions dropped because they could not be attributed.
    pub skipped: u64,
}

impl TrendSeries {
    pub fn new(grouping: TrendGrouping) -> Self {
        TrendSeries {
            grouping,
            buckets: HashMap::new(),
            skipped: 0,
        }
    }

    /// Bucket key for a sale under this grouping, `None` when unattributable.
    /// Non-sale transactions never get a bucket.
    fn bucket_key(&self, transaction: &TransactionRecord) -> Option<String> {
        if !transaction.is_sale() {
            return None;
        }
        match self.grouping {
            TrendGrouping::Monthly => Some(transaction.month_bucket()),
            TrendGrouping::Product => transaction.item_name().map(str::to_string),
            TrendGrouping::Category => transaction.item_category().map(str::to_string),
        }
    }

    /// Folds one sale into its bucket; unattributable records are skipped.
    pub fn add_sale(&mut self, transaction: &TransactionRecord) {
        match self.bucket_key(transaction) {
            Some(key) => {
                let bucket = self.buckets.entry(key).or_insert_with(TrendBucket::new);
                bucket.total_sales += transaction.amount;
                bucket.transaction_count += 1;
            }
            None => self.skipped += 1,
        }
    }

    /// Computes bucket averages; only buckets with transactions get one.
    pub fn finalize(&mut self) {
        for bucket in self.buckets.values_mut() {
            if bucket.transaction_count > 0 {
                bucket.average_sale = bucket.total_sales / Decimal::from(bucket.transaction_count);
            }
        }
    }

    /// Builds a series in a single pass over an already-filtered slice of
    /// sales. An empty slice yields an empty bucket map for any grouping.
    pub fn from_sales(
        records: &[TransactionRecord],
        grouping: TrendGrouping,
        policy: UnmatchedPolicy,
    ) -> std::result::Result<TrendSeries, ReportError> {
        let mut series = TrendSeries::new(grouping);
        for transaction in records {
            if policy == UnmatchedPolicy::Fail && series.bucket_key(transaction).is_none() {
                return Err(ReportError::UnmatchedTransaction {
                    id: transaction.id.clone(),
                    reason: format!(
                        "cannot derive a {} bucket for this transaction",
                        grouping.as_str()
                    ),
                });
            }
            series.add_sale(transaction);
        }
        series.finalize();
        Ok(series)
    }

    /// Bucket entries in ascending key order, for charting and export.
    pub fn sorted_points(&self) -> Vec<(&String, &TrendBucket)> {
        let mut points: Vec<_> = self.buckets.iter().collect();
        points.sort_by(|a, b| a.0.cmp(b.0));
        points
    }
}
