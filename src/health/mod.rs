// src/health/mod.rs
mod report;
mod result;
mod status;

pub use report::{aggregate, AggregateReport, CheckEntry};
pub use result::CheckResult;
pub use status::HealthStatus;
