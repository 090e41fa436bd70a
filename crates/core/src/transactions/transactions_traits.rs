use super::transactions_model::{TransactionRecord, TransactionType};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait defining the contract for read-only transaction ledger access.
///
/// Storage backends implement this trait; report services depend on it and
/// never touch storage directly. All methods filter on the transaction date
/// with inclusive bounds, an absent bound meaning unbounded on that side.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Fetches all transactions within the date range.
    async fn get_transactions_in_range(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<TransactionRecord>>;

    /// Fetches transactions of the given types within the date range.
    async fn get_transactions_by_types(
        &self,
        types: &[TransactionType],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<TransactionRecord>>;
}
