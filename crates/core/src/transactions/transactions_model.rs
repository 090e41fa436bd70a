//! Transaction ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::MONTH_BUCKET_FORMAT;

/// Enum representing the kinds of ledger transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Sale,
    Expense,
    Purchase, // Supply-chain history only, excluded from financial totals
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "SALE",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Purchase => "PURCHASE",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Case-insensitive; also accepts the plural data-source spellings
    /// used by the custom-report surface ("Sales", "Expenses", "Purchases").
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SALE" | "SALES" => Ok(TransactionType::Sale),
            "EXPENSE" | "EXPENSES" => Ok(TransactionType::Expense),
            "PURCHASE" | "PURCHASES" => Ok(TransactionType::Purchase),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Inventory item reference attached to sale/purchase transactions.
///
/// `category` is optional: manually entered items may not be categorised yet,
/// which makes them unattributable for category-level grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Domain model representing one immutable ledger entry.
///
/// Records are read-only inputs to the report services; nothing in this
/// crate writes them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItemRef>,
}

impl TransactionRecord {
    /// Returns the calendar date of this transaction
    pub fn effective_date(&self) -> NaiveDate {
        self.date.naive_utc().date()
    }

    /// Returns the month bucket key for trend grouping, e.g. "2023-01"
    pub fn month_bucket(&self) -> String {
        self.date.format(MONTH_BUCKET_FORMAT).to_string()
    }

    /// Check if this transaction is a sale
    pub fn is_sale(&self) -> bool {
        self.transaction_type == TransactionType::Sale
    }

    /// Returns the linked item's category, if the item exists and is categorised
    pub fn item_category(&self) -> Option<&str> {
        self.inventory_item
            .as_ref()
            .and_then(|item| item.category.as_deref())
    }

    /// Returns the linked item's name, if an item is linked
    pub fn item_name(&self) -> Option<&str> {
        self.inventory_item.as_ref().map(|item| item.name.as_str())
    }

    /// Inclusive date-range check. An absent bound leaves that side unbounded.
    pub fn in_range(&self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> bool {
        let date = self.effective_date();
        start_date.map_or(true, |start| date >= start) && end_date.map_or(true, |end| date <= end)
    }
}
