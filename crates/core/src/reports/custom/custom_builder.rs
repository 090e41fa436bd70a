//! Single-pass grouping engine for custom reports.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::custom_model::{
    AggregateKind, AggregateSpec, CustomReportRow, GroupField, OrderBy, SortDirection,
};
use crate::reports::{ReportError, UnmatchedPolicy};
use crate::transactions::TransactionRecord;

/// Partial sums for one group, accumulated during the pass.
#[derive(Debug, Default)]
struct GroupAccumulator {
    count: u64,
    sums: BTreeMap<&'static str, Decimal>,
}

/// Groups every record of every named source by the cartesian combination
/// of `group_by` field values, then computes the requested aggregates per
/// group.
///
/// Returns the emitted rows plus the number of records skipped as
/// unattributable. Rows come out in ascending group-key order before
/// `order_by` is applied.
pub(super) fn build_rows(
    sources: &[(String, Vec<TransactionRecord>)],
    group_by: &[GroupField],
    aggregates: &[AggregateSpec],
    order_by: &[OrderBy],
    policy: UnmatchedPolicy,
) -> std::result::Result<(Vec<CustomReportRow>, u64), ReportError> {
    let mut groups: BTreeMap<Vec<String>, GroupAccumulator> = BTreeMap::new();
    let mut skipped = 0u64;

    for (source, records) in sources {
        for transaction in records {
            let mut keys = Vec::with_capacity(group_by.len());
            let mut unmatched = None;
            for field in group_by {
                match field.value_for(source, transaction) {
                    Some(value) => keys.push(value),
                    None => {
                        unmatched = Some(*field);
                        break;
                    }
                }
            }
            if let Some(field) = unmatched {
                if policy == UnmatchedPolicy::Fail {
                    return Err(ReportError::UnmatchedTransaction {
                        id: transaction.id.clone(),
                        reason: format!("no {} value for this transaction", field.as_str()),
                    });
                }
                skipped += 1;
                continue;
            }

            let group = groups.entry(keys).or_default();
            group.count += 1;
            for spec in aggregates {
                *group
                    .sums
                    .entry(spec.field.as_str())
                    .or_insert(Decimal::ZERO) += spec.field.value_for(transaction);
            }
        }
    }

    let mut rows: Vec<CustomReportRow> = groups
        .into_iter()
        .map(|(keys, group)| {
            let mut values = BTreeMap::new();
            for spec in aggregates {
                let sum = group
                    .sums
                    .get(spec.field.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let value = match spec.kind {
                    AggregateKind::Sum => sum,
                    AggregateKind::Average => {
                        if group.count > 0 {
                            sum / Decimal::from(group.count)
                        } else {
                            Decimal::ZERO
                        }
                    }
                    AggregateKind::Count => Decimal::from(group.count),
                };
                values.insert(spec.column(), value);
            }
            CustomReportRow { keys, values }
        })
        .collect();

    apply_order(&mut rows, group_by, aggregates, order_by)?;
    Ok((rows, skipped))
}

/// Stable sort of emitted rows by the requested criteria. A criterion can
/// name a group field or an aggregate column label.
fn apply_order(
    rows: &mut [CustomReportRow],
    group_by: &[GroupField],
    aggregates: &[AggregateSpec],
    order_by: &[OrderBy],
) -> std::result::Result<(), ReportError> {
    // Later criteria are subordinate: applying them first and the primary
    // criterion last keeps the overall order correct under stable sorting.
    for criterion in order_by.iter().rev() {
        if let Some(index) = group_by
            .iter()
            .position(|field| field.as_str() == criterion.field)
        {
            rows.sort_by(|a, b| {
                let ordering = a.keys[index].cmp(&b.keys[index]);
                match criterion.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        } else if aggregates
            .iter()
            .any(|spec| spec.column() == criterion.field)
        {
            rows.sort_by(|a, b| {
                let left = a.values.get(&criterion.field).copied().unwrap_or_default();
                let right = b.values.get(&criterion.field).copied().unwrap_or_default();
                let ordering = left.cmp(&right);
                match criterion.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        } else {
            return Err(ReportError::UnknownOrderField(criterion.field.clone()));
        }
    }
    Ok(())
}
