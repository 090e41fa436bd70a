//! Sale export row models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::TransactionRecord;

/// Flat sale row suitable for bookkeeping export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub product_name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
}

impl SaleRecord {
    /// Projects a sale with a linked item into an export row.
    /// Returns `None` for anything else.
    pub fn from_transaction(transaction: &TransactionRecord) -> Option<SaleRecord> {
        if !transaction.is_sale() {
            return None;
        }
        let item = transaction.inventory_item.as_ref()?;
        Some(SaleRecord {
            transaction_id: transaction.id.clone(),
            date: transaction.date,
            amount: transaction.amount,
            product_name: item.name.clone(),
            product_category: item.category.clone(),
        })
    }
}
