//! Shared report types.

use serde::{Deserialize, Serialize};

/// Policy for transactions that cannot be attributed to a report bucket:
/// a sale without a linked inventory item, or a linked item without a
/// category where the grouping needs one.
///
/// Purchases are excluded from financial totals by business rule, not by
/// this policy; they are never counted as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnmatchedPolicy {
    /// Drop the transaction from the report and count it in `skipped`.
    #[default]
    Skip,
    /// Abort the report build with `ReportError::UnmatchedTransaction`.
    Fail,
}
