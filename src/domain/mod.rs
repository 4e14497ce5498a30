//! Pure analytics pipeline: series preparation, return and covariance
//! estimation, portfolio aggregation and performance metrics.

pub mod asset;
pub mod price;
pub mod series;
pub mod returns;
pub mod portfolio;
pub mod metrics;
pub mod request;
pub mod pipeline;
pub mod error;
