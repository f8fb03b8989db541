// src/probes/http.rs
use crate::health::CheckResult;
use crate::registry::HealthCheck;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Probes an external HTTP dependency with a GET request. 2xx maps to
/// Healthy, any other status to Degraded with the code attached, and a
/// transport failure to Unhealthy with the error captured.
#[derive(Debug)]
pub struct HttpProbe {
    url: Url,
    client: Client,
}

impl HttpProbe {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl HealthCheck for HttpProbe {
    async fn check(&self) -> CheckResult {
        debug!(url = %self.url, "probing dependency");
        match self.client.get(self.url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    CheckResult::healthy().with_data("status_code", status.as_u16())
                } else {
                    CheckResult::degraded()
                        .with_description("dependency returned non-success status")
                        .with_data("status_code", status.as_u16())
                }
            }
            Err(err) => CheckResult::unhealthy()
                .with_description("dependency unreachable")
                .with_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthStatus;

    fn probe_for(server: &mockito::ServerGuard) -> HttpProbe {
        let url = Url::parse(&server.url()).unwrap();
        HttpProbe::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn success_response_is_healthy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/").with_status(200).create_async().await;

        let result = probe_for(&server).check().await;
        assert_eq!(result.status, HealthStatus::Healthy);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_degraded_with_status_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(500).create_async().await;

        let result = probe_for(&server).check().await;
        assert_eq!(result.status, HealthStatus::Degraded);
        assert_eq!(
            result.data.get("status_code"),
            Some(&serde_json::json!(500))
        );
    }

    #[tokio::test]
    async fn unreachable_dependency_is_unhealthy() {
        // Nothing listens on this port.
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let probe = HttpProbe::new(url, Duration::from_millis(200)).unwrap();

        let result = probe.check().await;
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert!(result.error.is_some());
    }
}
