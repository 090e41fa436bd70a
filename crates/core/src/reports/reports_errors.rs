use thiserror::Error;

/// Custom error type for report-building operations
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown grouping '{0}', expected one of: monthly, product, category")]
    UnknownGrouping(String),

    #[error("Unknown group field: {0}")]
    UnknownGroupField(String),

    #[error("Unknown aggregate function: {0}")]
    UnknownAggregateFunction(String),

    #[error("Unknown aggregate field: {0}")]
    UnknownAggregateField(String),

    #[error("Unknown order field: {0}")]
    UnknownOrderField(String),

    #[error("Unknown output format '{0}', expected JSON or CSV")]
    UnknownOutputFormat(String),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Transaction {id} cannot be attributed to a bucket: {reason}")]
    UnmatchedTransaction { id: String, reason: String },

    #[error("Failed to render report: {0}")]
    Render(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Render(err.to_string())
    }
}

impl From<ReportError> for String {
    fn from(error: ReportError) -> Self {
        error.to_string()
    }
}
