//! Report rendering at the serialization boundary.

use super::custom_model::{CustomReport, OutputFormat};
use crate::reports::ReportError;

/// Serializes a report in the requested format.
pub(super) fn render(
    report: &CustomReport,
    format: OutputFormat,
) -> std::result::Result<String, ReportError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| ReportError::Render(err.to_string())),
        OutputFormat::Csv => render_csv(report),
    }
}

/// One header row of group fields and aggregate columns, one row per group.
fn render_csv(report: &CustomReport) -> std::result::Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = report
        .group_by
        .iter()
        .map(|field| field.as_str())
        .chain(report.columns.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for row in &report.rows {
        let mut record = row.keys.clone();
        for column in &report.columns {
            let value = row.values.get(column).copied().unwrap_or_default();
            record.push(value.to_string());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Render(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ReportError::Render(err.to_string()))
}
