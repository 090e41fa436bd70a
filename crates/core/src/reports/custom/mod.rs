//! Custom report module - caller-defined grouping and aggregation.

mod custom_builder;
mod custom_model;
mod custom_render;
mod custom_service;

#[cfg(test)]
mod custom_service_tests;

pub use custom_model::{
    AggregateField, AggregateKind, AggregateSpec, CustomReport, CustomReportRequest,
    CustomReportRow, GroupField, OrderBy, OutputFormat, ReportStatus, SortDirection,
};
pub use custom_service::{CustomReportService, CustomReportServiceTrait};
