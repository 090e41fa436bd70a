//! Financial summary domain models.

use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::GENERAL_EXPENSE_CATEGORY;
use crate::reports::{ReportError, UnmatchedPolicy};
use crate::transactions::{TransactionRecord, TransactionType};

/// Aggregated financial summary over a slice of the transaction ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    /// Always equals `total_revenue - total_expense`.
    pub profitability: Decimal,
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub sales_by_category: HashMap<String, Decimal>,
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub expenses_by_category: HashMap<String, Decimal>,
    /// Transactions dropped because they could not be attributed.
    pub skipped: u64,
}

impl FinancialSummary {
    pub fn new() -> Self {
        FinancialSummary {
            total_revenue: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            profitability: Decimal::ZERO,
            sales_by_category: HashMap::new(),
            expenses_by_category: HashMap::new(),
            skipped: 0,
        }
    }

    /// True when no transaction contributed to the totals.
    pub fn is_empty(&self) -> bool {
        self.total_revenue == Decimal::zero() && self.total_expense == Decimal::zero()
    }

    /// Folds one transaction into the summary.
    ///
    /// Sales need a categorised linked item to be attributable; purchases
    /// belong to supply-chain history and land in neither bucket.
    pub fn add_transaction(&mut self, transaction: &TransactionRecord) {
        match transaction.transaction_type {
            TransactionType::Sale => match transaction.item_category() {
                Some(category) => {
                    self.total_revenue += transaction.amount;
                    *self
                        .sales_by_category
                        .entry(category.to_string())
                        .or_insert(Decimal::ZERO) += transaction.amount;
                    self.profitability = self.total_revenue - self.total_expense;
                }
                None => self.skipped += 1,
            },
            TransactionType::Expense => {
                self.total_expense += transaction.amount;
                *self
                    .expenses_by_category
                    .entry(GENERAL_EXPENSE_CATEGORY.to_string())
                    .or_insert(Decimal::ZERO) += transaction.amount;
                self.profitability = self.total_revenue - self.total_expense;
            }
            TransactionType::Purchase => {}
        }
    }

    /// Builds a summary in a single pass over an already-filtered slice.
    ///
    /// An empty slice yields the all-zero summary with empty breakdowns.
    pub fn from_records(
        records: &[TransactionRecord],
        policy: UnmatchedPolicy,
    ) -> std::result::Result<FinancialSummary, ReportError> {
        let mut summary = FinancialSummary::new();
        for transaction in records {
            if policy == UnmatchedPolicy::Fail {
                if let Some(reason) = unmatched_reason(transaction) {
                    return Err(ReportError::UnmatchedTransaction {
                        id: transaction.id.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
            summary.add_transaction(transaction);
        }
        Ok(summary)
    }
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a sale cannot be attributed to a revenue bucket, if it cannot.
fn unmatched_reason(transaction: &TransactionRecord) -> Option<&'static str> {
    if !transaction.is_sale() {
        return None;
    }
    match &transaction.inventory_item {
        None => Some("sale without a linked inventory item"),
        Some(item) if item.category.is_none() => Some("linked inventory item has no category"),
        Some(_) => None,
    }
}
