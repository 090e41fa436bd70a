pub mod financial_model;
pub mod financial_service;


pub use financial_model::FinancialSummary;
pub use financial_service::{FinancialReportService, FinancialReportServiceTrait};
