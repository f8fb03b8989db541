// src/probes/slow_dependency.rs
use crate::health::CheckResult;
use crate::registry::HealthCheck;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Models a dependency with a long initialization window: Degraded while the
/// warm-up period since construction has not elapsed, Healthy afterwards.
/// Useful for readiness probes in orchestrated environments where the process
/// is alive before it can serve traffic.
#[derive(Debug)]
pub struct SlowDependencyProbe {
    started_at: Instant,
    warmup: Duration,
}

impl SlowDependencyProbe {
    pub const DEFAULT_WARMUP: Duration = Duration::from_secs(15);

    pub fn new(warmup: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            warmup,
        }
    }
}

impl Default for SlowDependencyProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WARMUP)
    }
}

#[async_trait]
impl HealthCheck for SlowDependencyProbe {
    async fn check(&self) -> CheckResult {
        let elapsed = self.started_at.elapsed();
        if elapsed >= self.warmup {
            CheckResult::healthy().with_description("dependency is ready")
        } else {
            let remaining = self.warmup - elapsed;
            CheckResult::degraded()
                .with_description("dependency is still initializing")
                .with_data("remaining_ms", remaining.as_millis() as u64)
        }
    }
}
