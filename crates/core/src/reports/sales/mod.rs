pub mod sales_model;
pub mod sales_service;

#[cfg(test)]
mod sales_service_tests;

pub use sales_model::SaleRecord;
pub use sales_service::{SalesDataService, SalesDataServiceTrait};
