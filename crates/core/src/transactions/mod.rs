//! Transactions module - ledger domain models and traits.

mod transactions_model;
mod transactions_traits;


pub use transactions_model::{InventoryItemRef, TransactionRecord, TransactionType};
pub use transactions_traits::TransactionRepositoryTrait;
