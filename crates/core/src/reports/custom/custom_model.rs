//! Custom report domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::reports::ReportError;
use crate::transactions::{TransactionRecord, TransactionType};

/// Field a custom report can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    /// Name of the data source the record came from
    Source,
    /// Transaction type label
    Type,
    /// Month bucket of the transaction date
    Month,
    /// Linked inventory item name
    Product,
    /// Linked inventory item category
    Category,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::Source => "source",
            GroupField::Type => "type",
            GroupField::Month => "month",
            GroupField::Product => "product",
            GroupField::Category => "category",
        }
    }

    /// Derives this field's value for one record, `None` when unattributable.
    pub fn value_for(&self, source: &str, transaction: &TransactionRecord) -> Option<String> {
        match self {
            GroupField::Source => Some(source.to_string()),
            GroupField::Type => Some(transaction.transaction_type.as_str().to_string()),
            GroupField::Month => Some(transaction.month_bucket()),
            GroupField::Product => transaction.item_name().map(str::to_string),
            GroupField::Category => transaction.item_category().map(str::to_string),
        }
    }
}

impl FromStr for GroupField {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(GroupField::Source),
            "type" => Ok(GroupField::Type),
            "month" => Ok(GroupField::Month),
            "product" => Ok(GroupField::Product),
            "category" => Ok(GroupField::Category),
            _ => Err(ReportError::UnknownGroupField(s.to_string())),
        }
    }
}

/// Numeric transaction field an aggregate runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateField {
    Amount,
}

impl AggregateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateField::Amount => "amount",
        }
    }

    pub fn value_for(&self, transaction: &TransactionRecord) -> Decimal {
        match self {
            AggregateField::Amount => transaction.amount,
        }
    }
}

impl FromStr for AggregateField {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amount" => Ok(AggregateField::Amount),
            _ => Err(ReportError::UnknownAggregateField(s.to_string())),
        }
    }
}

/// Aggregate function applied within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Sum,
    Average,
    Count,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Average => "average",
            AggregateKind::Count => "count",
        }
    }
}

impl FromStr for AggregateKind {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AggregateKind::Sum),
            "average" => Ok(AggregateKind::Average),
            "count" => Ok(AggregateKind::Count),
            _ => Err(ReportError::UnknownAggregateFunction(s.to_string())),
        }
    }
}

/// One requested aggregate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSpec {
    pub field: AggregateField,
    pub kind: AggregateKind,
}

impl AggregateSpec {
    /// Output column label, e.g. "amount_sum".
    pub fn column(&self) -> String {
        format!("{}_{}", self.field.as_str(), self.kind.as_str())
    }
}

/// Sort direction for emitted groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Group ordering criterion. The field may name a group field or an
/// aggregate column label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Parses the raw criterion; a leading '-' selects descending order
    /// (caller convention).
    pub fn parse(raw: &str) -> OrderBy {
        match raw.strip_prefix('-') {
            Some(field) => OrderBy {
                field: field.to_string(),
                direction: SortDirection::Descending,
            },
            None => OrderBy {
                field: raw.to_string(),
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Report serialization format; affects rendering only, never grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "CSV")]
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "JSON" => Ok(OutputFormat::Json),
            "CSV" => Ok(OutputFormat::Csv),
            _ => Err(ReportError::UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Lifecycle status of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Completed,
    Failed,
}

/// Parameters for a caller-defined report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReportRequest {
    pub report_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub data_sources: Vec<TransactionType>,
    pub group_by: Vec<GroupField>,
    pub order_by: Vec<OrderBy>,
    pub aggregates: Vec<AggregateSpec>,
    pub output_format: OutputFormat,
}

impl CustomReportRequest {
    /// Parses the raw, stringly request surface into the typed model,
    /// failing fast on any unknown value.
    ///
    /// Aggregate columns are sorted by label so the emitted report is
    /// deterministic regardless of the map's iteration order.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        report_type: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        data_sources: &[String],
        group_by: &[String],
        order_by: &[String],
        aggregate_functions: &HashMap<String, String>,
        output_format: &str,
    ) -> std::result::Result<CustomReportRequest, ReportError> {
        let data_sources = data_sources
            .iter()
            .map(|raw| {
                raw.parse::<TransactionType>()
                    .map_err(|_| ReportError::UnknownDataSource(raw.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let group_by = group_by
            .iter()
            .map(|raw| raw.parse())
            .collect::<std::result::Result<Vec<GroupField>, _>>()?;

        let order_by = order_by.iter().map(|raw| OrderBy::parse(raw)).collect();

        let mut aggregates = aggregate_functions
            .iter()
            .map(|(field, kind)| {
                Ok(AggregateSpec {
                    field: field.parse()?,
                    kind: kind.parse()?,
                })
            })
            .collect::<std::result::Result<Vec<_>, ReportError>>()?;
        aggregates.sort_by_key(|spec| spec.column());

        Ok(CustomReportRequest {
            report_type: report_type.to_string(),
            start_date,
            end_date,
            data_sources,
            group_by,
            order_by,
            aggregates,
            output_format: output_format.parse()?,
        })
    }
}

/// One emitted group row: its group-key values plus computed aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReportRow {
    /// Group-key values, aligned with the request's `group_by` order.
    pub keys: Vec<String>,
    /// Aggregate values keyed by column label.
    pub values: BTreeMap<String, Decimal>,
}

/// A generated custom report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReport {
    pub id: String,
    pub title: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub group_by: Vec<GroupField>,
    /// Aggregate column labels, in emission order.
    pub columns: Vec<String>,
    pub rows: Vec<CustomReportRow>,
    /// Transactions dropped because they could not be attributed.
    pub skipped: u64,
}
