// src/registry/mod.rs
mod descriptor;
mod predicate;

pub use descriptor::{CheckDescriptor, HealthCheck};
pub use predicate::Predicate;

use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("health check '{0}' is already registered")]
    DuplicateName(String),
}

/// Insertion-ordered set of check descriptors. Registration happens
/// single-threaded at startup; afterwards the registry is shared behind an
/// `Arc` and only read, so execution needs no locking.
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<CheckDescriptor>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails without modifying the registry if the name is taken.
    pub fn register(&mut self, descriptor: CheckDescriptor) -> Result<(), RegistryError> {
        if self.checks.iter().any(|c| c.name == descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        debug!(name = %descriptor.name, tags = ?descriptor.tags, "registered health check");
        self.checks.push(descriptor);
        Ok(())
    }

    /// All descriptors in registration order.
    pub fn all(&self) -> &[CheckDescriptor] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Descriptors matching the predicate, registration order preserved.
    /// An empty selection is a valid outcome, not an error.
    pub fn select(&self, predicate: &Predicate) -> Vec<&CheckDescriptor> {
        self.checks.iter().filter(|c| predicate.matches(c)).collect()
    }
}

/// Convenience alias for the shared, post-startup form of the registry.
pub type SharedRegistry = Arc<CheckRegistry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckResult;
    use std::time::Duration;

    fn descriptor(name: &str, tags: &[&str]) -> CheckDescriptor {
        CheckDescriptor::from_fn(name, || async { CheckResult::healthy() })
            .with_tags(tags.iter().map(|t| t.to_string()))
    }

    #[test]
    fn duplicate_name_is_rejected_and_state_unchanged() {
        let mut registry = CheckRegistry::new();
        registry.register(descriptor("db", &[])).unwrap();

        let err = registry.register(descriptor("db", &["other"])).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "db"));
        assert_eq!(registry.len(), 1);
        assert!(registry.all()[0].tags.is_empty());
    }

    #[test]
    fn all_preserves_insertion_order() {
        let mut registry = CheckRegistry::new();
        for name in ["c", "a", "b"] {
            registry.register(descriptor(name, &[])).unwrap();
        }
        let names: Vec<_> = registry.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn select_filters_by_tag_in_order() {
        let mut registry = CheckRegistry::new();
        registry.register(descriptor("db", &["ready"])).unwrap();
        registry.register(descriptor("self", &["live"])).unwrap();
        registry.register(descriptor("cache", &["ready"])).unwrap();

        let selected = registry.select(&Predicate::with_tag("ready"));
        let names: Vec<_> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["db", "cache"]);
    }

    #[test]
    fn select_none_yields_empty() {
        let mut registry = CheckRegistry::new();
        registry.register(descriptor("db", &["ready"])).unwrap();
        assert!(registry.select(&Predicate::none()).is_empty());
    }

    #[test]
    fn timeout_survives_registration() {
        let mut registry = CheckRegistry::new();
        registry
            .register(descriptor("db", &[]).with_timeout(Duration::from_secs(3)))
            .unwrap();
        assert_eq!(registry.all()[0].timeout, Some(Duration::from_secs(3)));
    }
}
