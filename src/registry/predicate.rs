// src/registry/predicate.rs
use crate::registry::CheckDescriptor;
use std::fmt;
use std::sync::Arc;

/// Stateless filter deciding which registered checks apply to an endpoint.
/// Captured at endpoint-registration time; a predicate that matches nothing
/// is the intended configuration for liveness endpoints.
#[derive(Clone)]
pub struct Predicate {
    filter: Arc<dyn Fn(&CheckDescriptor) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&CheckDescriptor) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Arc::new(filter),
        }
    }

    /// Every registered check.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    /// No checks at all; the aggregate for this selection is always Healthy.
    pub fn none() -> Self {
        Self::new(|_| false)
    }

    /// Checks carrying the given tag.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self::new(move |check| check.tags.contains(&tag))
    }

    pub fn matches(&self, check: &CheckDescriptor) -> bool {
        (self.filter)(check)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}
