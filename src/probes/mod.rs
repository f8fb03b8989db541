// src/probes/mod.rs
//! Built-in probe implementations. Hosts can register anything implementing
//! `HealthCheck`; these cover the common cases.

mod http;
mod slow_dependency;

pub use http::HttpProbe;
pub use slow_dependency::SlowDependencyProbe;

use crate::health::CheckResult;
use crate::registry::HealthCheck;
use async_trait::async_trait;

/// Identity check: always Healthy. Used by liveness endpoints that only need
/// to prove the process is responding.
#[derive(Debug, Default)]
pub struct AlwaysHealthyProbe;

#[async_trait]
impl HealthCheck for AlwaysHealthyProbe {
    async fn check(&self) -> CheckResult {
        CheckResult::healthy()
    }
}
