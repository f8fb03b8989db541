// src/endpoint/mod.rs
mod render;

pub use render::{JsonRenderer, ReportRenderer, TextRenderer};

use crate::executor::Executor;
use crate::health::{aggregate, HealthStatus};
use crate::registry::{Predicate, SharedRegistry};
use hyper::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("no endpoint registered for tag '{0}'")]
    UnknownTag(String),

    #[error("endpoint tag '{0}' is already registered")]
    DuplicateTag(String),
}

/// Per-endpoint policy: which checks gate it, how Degraded maps to a
/// transport code, and how the report is rendered.
pub struct EndpointSpec {
    pub predicate: Predicate,
    pub degraded_status: StatusCode,
    pub renderer: Box<dyn ReportRenderer>,
}

impl EndpointSpec {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            degraded_status: StatusCode::OK,
            renderer: Box::new(TextRenderer),
        }
    }

    /// Hosts that want Degraded to fail the probe can override the default
    /// 200 mapping here.
    pub fn with_degraded_status(mut self, status: StatusCode) -> Self {
        self.degraded_status = status;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Rendered outcome of one probe invocation, ready for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status_code: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

/// Maps invocation tags to endpoint specs and drives the
/// select → execute → aggregate → render pipeline. This is the only seam
/// between the core and the HTTP layer.
pub struct EndpointTable {
    registry: SharedRegistry,
    executor: Executor,
    endpoints: HashMap<String, EndpointSpec>,
}

impl EndpointTable {
    pub fn new(registry: SharedRegistry, executor: Executor) -> Self {
        Self {
            registry,
            executor,
            endpoints: HashMap::new(),
        }
    }

    /// Registers an endpoint under a tag. Happens at startup, before the
    /// table is shared; duplicate tags are a configuration error.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        spec: EndpointSpec,
    ) -> Result<(), EndpointError> {
        let tag = tag.into();
        if self.endpoints.contains_key(&tag) {
            return Err(EndpointError::DuplicateTag(tag));
        }
        self.endpoints.insert(tag, spec);
        Ok(())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    /// Runs the checks gating `tag` and renders the aggregate. Concurrent
    /// invocations are independent; only the registry is read.
    pub async fn handle(&self, tag: &str) -> Result<ProbeResponse, EndpointError> {
        let spec = self
            .endpoints
            .get(tag)
            .ok_or_else(|| EndpointError::UnknownTag(tag.to_string()))?;

        let selected = self.registry.select(&spec.predicate);
        debug!(tag, selected = selected.len(), "running probe endpoint");

        let start = Instant::now();
        let entries = self.executor.run(&selected).await;
        let report = aggregate(entries, start.elapsed());

        let status_code = match report.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Degraded => spec.degraded_status,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        info!(
            tag,
            status = %report.status,
            code = status_code.as_u16(),
            duration = ?report.total_duration,
            "probe complete"
        );

        Ok(ProbeResponse {
            status_code,
            content_type: spec.renderer.content_type(),
            body: spec.renderer.render(&report),
        })
    }
}

/// Shared, post-startup form of the table, handed to the HTTP handler.
pub type SharedEndpoints = Arc<EndpointTable>;
