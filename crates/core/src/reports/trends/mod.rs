pub mod trends_model;
pub mod trends_service;


pub use trends_model::{TrendBucket, TrendGrouping, TrendSeries};
pub use trends_service::{TrendService, TrendServiceTrait};
