// src/executor/mod.rs
use crate::health::{CheckEntry, CheckResult, HealthStatus};
use crate::registry::CheckDescriptor;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a selected batch of checks concurrently, one task per check, each
/// under its own deadline. The batch always runs to completion: a failing or
/// slow check never aborts its siblings, and nothing short-circuits on the
/// first unhealthy result since every entry must be reported.
#[derive(Debug, Clone)]
pub struct Executor {
    default_timeout: Duration,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }
}

impl Executor {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    /// Fan out the selected checks and wait for all of them (or their
    /// timeouts). Output order is the input (registration) order, not
    /// completion order.
    ///
    /// Tasks are spawned detached: if the caller is cancelled mid-flight,
    /// in-progress checks run to completion or timeout in the background
    /// rather than being aborted partway through a dependency call.
    pub async fn run(&self, selected: &[&CheckDescriptor]) -> Vec<CheckEntry> {
        let mut handles = Vec::with_capacity(selected.len());

        for descriptor in selected {
            let name = descriptor.name.clone();
            let check = descriptor.check.clone();
            let deadline = descriptor.timeout.unwrap_or(self.default_timeout);

            let handle = tokio::spawn(async move {
                let start = Instant::now();
                match timeout(deadline, check.check()).await {
                    Ok(mut result) => {
                        result.duration = start.elapsed();
                        result
                    }
                    Err(_) => {
                        warn!(check = %name, ?deadline, "health check timed out");
                        let mut result = CheckResult::unhealthy().with_description("timeout");
                        result.duration = start.elapsed();
                        result
                    }
                }
            });
            handles.push((descriptor.name.clone(), handle));
        }

        let mut entries = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    // A panicking check is isolated here; siblings already
                    // run in their own tasks and are unaffected.
                    warn!(check = %name, error = %join_err, "health check panicked");
                    CheckResult::unhealthy()
                        .with_description("check panicked")
                        .with_error(join_err.to_string())
                }
            };

            match result.status {
                HealthStatus::Healthy => {
                    debug!(check = %name, duration = ?result.duration, "check healthy")
                }
                status => warn!(
                    check = %name,
                    %status,
                    description = result.description.as_deref().unwrap_or(""),
                    "check not healthy"
                ),
            }
            entries.push(CheckEntry::new(name, result));
        }

        let unhealthy = entries
            .iter()
            .filter(|e| e.result.status != HealthStatus::Healthy)
            .count();
        info!(
            total = entries.len(),
            unhealthy, "health check batch complete"
        );

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CheckDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    fn healthy_after(name: &str, delay: Duration) -> CheckDescriptor {
        CheckDescriptor::from_fn(name, move || async move {
            sleep(delay).await;
            CheckResult::healthy()
        })
    }

    #[tokio::test]
    async fn reports_in_registration_order_not_completion_order() {
        let slow = healthy_after("slow", Duration::from_millis(50));
        let fast = healthy_after("fast", Duration::from_millis(1));
        let selected = vec![&slow, &fast];

        let entries = Executor::default().run(&selected).await;
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn timed_out_check_is_synthesized_unhealthy() {
        let stuck = CheckDescriptor::from_fn("stuck", || async {
            sleep(Duration::from_secs(60)).await;
            CheckResult::healthy()
        })
        .with_timeout(Duration::from_millis(20));
        let selected = vec![&stuck];

        let entries = Executor::default().run(&selected).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].result.status, HealthStatus::Unhealthy);
        assert_eq!(entries[0].result.description.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn executor_default_timeout_applies_when_descriptor_has_none() {
        let stuck = CheckDescriptor::from_fn("stuck", || async {
            sleep(Duration::from_secs(60)).await;
            CheckResult::healthy()
        });
        let selected = vec![&stuck];

        let entries = Executor::new(Duration::from_millis(20)).run(&selected).await;
        assert_eq!(entries[0].result.status, HealthStatus::Unhealthy);
        assert_eq!(entries[0].result.description.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn panicking_check_does_not_suppress_siblings() {
        let broken = CheckDescriptor::from_fn("broken", || async {
            panic!("probe exploded");
        });
        let fine = healthy_after("fine", Duration::from_millis(1));
        let selected = vec![&broken, &fine];

        let entries = Executor::default().run(&selected).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].result.status, HealthStatus::Unhealthy);
        assert!(entries[0].result.error.is_some());
        assert_eq!(entries[1].result.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn checks_run_concurrently() {
        // Four checks sleeping 40ms each finish well under 160ms when run
        // in parallel.
        let checks: Vec<CheckDescriptor> = (0..4)
            .map(|i| healthy_after(&format!("check-{i}"), Duration::from_millis(40)))
            .collect();
        let selected: Vec<&CheckDescriptor> = checks.iter().collect();

        let start = Instant::now();
        let entries = Executor::default().run(&selected).await;
        let elapsed = start.elapsed();

        assert_eq!(entries.len(), 4);
        assert!(
            elapsed < Duration::from_millis(120),
            "expected parallel execution, took {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn slow_check_result_still_reported_after_sibling_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let counted = CheckDescriptor::from_fn("counted", move || {
            let calls = calls_clone.clone();
            async move {
                sleep(Duration::from_millis(30)).await;
                calls.fetch_add(1, Ordering::SeqCst);
                CheckResult::healthy()
            }
        });
        let failing = CheckDescriptor::from_fn("failing", || async {
            CheckResult::unhealthy().with_description("dependency down")
        });
        let selected = vec![&failing, &counted];

        let entries = Executor::default().run(&selected).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(entries[1].result.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn empty_selection_returns_no_entries() {
        let entries = Executor::default().run(&[]).await;
        assert!(entries.is_empty());
    }
}
