// src/registry/descriptor.rs
use crate::health::CheckResult;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A single health probe. Implementations are assumed side-effect-free on
/// shared state so the executor can run them concurrently.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> CheckResult;
}

/// Adapter so plain async closures can be registered without a named type.
struct FnCheck<F>(F);

#[async_trait]
impl<F, Fut> HealthCheck for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = CheckResult> + Send,
{
    async fn check(&self) -> CheckResult {
        (self.0)().await
    }
}

/// Named check plus its selection tags and optional per-check deadline.
/// Immutable once handed to the registry.
#[derive(Clone)]
pub struct CheckDescriptor {
    pub name: String,
    pub tags: BTreeSet<String>,
    pub check: Arc<dyn HealthCheck>,
    pub timeout: Option<Duration>,
}

impl CheckDescriptor {
    pub fn new(name: impl Into<String>, check: Arc<dyn HealthCheck>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
            check,
            timeout: None,
        }
    }

    pub fn from_fn<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        Self::new(name, Arc::new(FnCheck(f)))
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
