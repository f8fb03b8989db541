// src/config/models.rs
use crate::endpoint::{EndpointError, EndpointSpec, EndpointTable, JsonRenderer};
use crate::executor::{Executor, DEFAULT_CHECK_TIMEOUT};
use crate::probes::{AlwaysHealthyProbe, HttpProbe, SlowDependencyProbe};
use crate::registry::{CheckDescriptor, CheckRegistry, Predicate};
use anyhow::{bail, Context, Result};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Fallback deadline for checks without their own `timeout_secs`.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
    pub endpoints: Vec<EndpointConfig>,
}

fn default_listen() -> SocketAddr {
    ([0, 0, 0, 0], 8080).into()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CHECK_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub kind: CheckKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckKind {
    AlwaysHealthy,
    SlowDependency {
        #[serde(default = "default_warmup_secs")]
        warmup_secs: u64,
    },
    Http {
        url: Url,
    },
}

fn default_warmup_secs() -> u64 {
    SlowDependencyProbe::DEFAULT_WARMUP.as_secs()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Request path, also used as the endpoint tag (e.g. `/health/ready`).
    pub path: String,
    #[serde(default)]
    pub select: CheckSelection,
    #[serde(default)]
    pub format: ResponseFormat,
    /// HTTP status for a Degraded aggregate; 200 when omitted.
    #[serde(default)]
    pub degraded_status: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSelection {
    #[default]
    All,
    None,
    Tag(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            bail!("at least one endpoint must be configured");
        }

        let mut names = HashSet::new();
        for check in &self.checks {
            if !names.insert(check.name.as_str()) {
                bail!("duplicate check name '{}'", check.name);
            }
        }

        let mut paths = HashSet::new();
        for endpoint in &self.endpoints {
            if !endpoint.path.starts_with('/') {
                bail!("endpoint path '{}' must start with '/'", endpoint.path);
            }
            if !paths.insert(endpoint.path.as_str()) {
                bail!("duplicate endpoint path '{}'", endpoint.path);
            }
            if let Some(code) = endpoint.degraded_status {
                StatusCode::from_u16(code)
                    .with_context(|| format!("invalid degraded_status {code}"))?;
            }
        }

        Ok(())
    }

    /// Instantiate all configured checks into a registry.
    pub fn build_registry(&self) -> Result<CheckRegistry> {
        let mut registry = CheckRegistry::new();
        for check in &self.checks {
            let mut descriptor = match &check.kind {
                CheckKind::AlwaysHealthy => {
                    CheckDescriptor::new(&check.name, Arc::new(AlwaysHealthyProbe))
                }
                CheckKind::SlowDependency { warmup_secs } => CheckDescriptor::new(
                    &check.name,
                    Arc::new(SlowDependencyProbe::new(Duration::from_secs(*warmup_secs))),
                ),
                CheckKind::Http { url } => {
                    let timeout = check
                        .timeout_secs
                        .map(Duration::from_secs)
                        .unwrap_or(DEFAULT_CHECK_TIMEOUT);
                    let probe = HttpProbe::new(url.clone(), timeout)
                        .with_context(|| format!("building http probe '{}'", check.name))?;
                    CheckDescriptor::new(&check.name, Arc::new(probe))
                }
            };
            descriptor = descriptor.with_tags(check.tags.iter().cloned());
            if let Some(secs) = check.timeout_secs {
                descriptor = descriptor.with_timeout(Duration::from_secs(secs));
            }
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Wire the configured endpoints onto a registry.
    pub fn build_endpoints(&self, registry: Arc<CheckRegistry>) -> Result<EndpointTable> {
        let executor = Executor::new(Duration::from_secs(self.default_timeout_secs));
        let mut table = EndpointTable::new(registry, executor);

        for endpoint in &self.endpoints {
            let predicate = match &endpoint.select {
                CheckSelection::All => Predicate::all(),
                CheckSelection::None => Predicate::none(),
                CheckSelection::Tag(tag) => Predicate::with_tag(tag.clone()),
            };

            // Text rendering is the EndpointSpec default.
            let mut spec = EndpointSpec::new(predicate);
            if endpoint.format == ResponseFormat::Json {
                spec = spec.with_renderer(Box::new(JsonRenderer));
            }
            if let Some(code) = endpoint.degraded_status {
                // validate() already checked the code parses
                spec = spec.with_degraded_status(StatusCode::from_u16(code)?);
            }

            table
                .register(endpoint.path.clone(), spec)
                .map_err(|e: EndpointError| anyhow::anyhow!(e))?;
        }

        Ok(table)
    }
}
