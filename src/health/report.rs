// src/health/report.rs
use crate::health::{CheckResult, HealthStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One named entry in an aggregate report. Order follows registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEntry {
    pub name: String,
    #[serde(flatten)]
    pub result: CheckResult,
}

impl CheckEntry {
    pub fn new(name: impl Into<String>, result: CheckResult) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }
}

/// Worst-wins reduction of a batch of check results, produced once per
/// invocation and returned to the caller. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub status: HealthStatus,
    pub entries: Vec<CheckEntry>,
    #[serde(with = "total_millis")]
    pub total_duration: Duration,
    pub checked_at: DateTime<Utc>,
}

/// Overall status is the maximum severity among entries; an empty batch is
/// Healthy (the "no checks gate this endpoint" configuration).
pub fn aggregate(entries: Vec<CheckEntry>, total_duration: Duration) -> AggregateReport {
    let status = entries
        .iter()
        .map(|e| e.result.status)
        .max()
        .unwrap_or(HealthStatus::Healthy);

    AggregateReport {
        status,
        entries,
        total_duration,
        checked_at: Utc::now(),
    }
}

mod total_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(name: &str, status: HealthStatus) -> CheckEntry {
        CheckEntry::new(name, CheckResult::new(status))
    }

    #[test]
    fn empty_batch_is_healthy() {
        let report = aggregate(Vec::new(), Duration::ZERO);
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn worst_status_wins() {
        let report = aggregate(
            vec![
                entry("db", HealthStatus::Healthy),
                entry("cache", HealthStatus::Unhealthy),
                entry("queue", HealthStatus::Degraded),
            ],
            Duration::from_millis(12),
        );
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.entries.len(), 3);
    }

    #[test]
    fn degraded_beats_healthy() {
        let report = aggregate(
            vec![
                entry("a", HealthStatus::Healthy),
                entry("b", HealthStatus::Degraded),
            ],
            Duration::ZERO,
        );
        assert_eq!(report.status, HealthStatus::Degraded);
    }

    #[test]
    fn entry_order_is_preserved() {
        let report = aggregate(
            vec![
                entry("first", HealthStatus::Healthy),
                entry("second", HealthStatus::Healthy),
                entry("third", HealthStatus::Healthy),
            ],
            Duration::ZERO,
        );
        let names: Vec<_> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    fn arb_status() -> impl Strategy<Value = HealthStatus> {
        prop_oneof![
            Just(HealthStatus::Healthy),
            Just(HealthStatus::Degraded),
            Just(HealthStatus::Unhealthy),
        ]
    }

    proptest! {
        #[test]
        fn overall_equals_max_severity(statuses in prop::collection::vec(arb_status(), 1..16)) {
            let expected = *statuses.iter().max().unwrap();
            let entries = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| entry(&format!("check-{i}"), *s))
                .collect();
            let report = aggregate(entries, Duration::ZERO);
            prop_assert_eq!(report.status, expected);
        }
    }
}
