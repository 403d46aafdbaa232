//! Service probe plumbing.
//!
//! A probe is a no-throw async operation: it always resolves to a
//! `Health` value, folding connection errors, non-2xx responses, and
//! timeouts into `Down` with diagnostic detail. Callers are never
//! handed an error from a probe.

use std::sync::Arc;
use std::time::Duration;

use http_body_util::BodyExt;
use serde_json::Value;
use tracing::debug;

use crate::status::Health;

/// Boxed future returned by a service probe.
pub type ProbeFuture = std::pin::Pin<Box<dyn std::future::Future<Output = Health> + Send>>;

/// A zero-argument health probe for one remote service.
pub type ServiceProbe = Arc<dyn Fn() -> ProbeFuture + Send + Sync>;

/// Configuration for the built-in HTTP service probe.
#[derive(Debug, Clone)]
pub struct HttpProbeConfig {
    /// Remote address (host:port) to connect to.
    pub address: String,
    /// Health endpoint path (e.g., "/webcontroller/HealthCheck").
    pub path: String,
    /// Budget for the whole probe (connect + request + body).
    pub timeout: Duration,
    /// Minimum compatible remote version; older versions fold to `Down`.
    pub min_version: Option<semver::Version>,
}

impl HttpProbeConfig {
    fn url(&self) -> String {
        format!("http://{}{}", self.address, self.path)
    }
}

/// Build a `ServiceProbe` that performs an HTTP GET against
/// `http://{address}{path}` on every invocation.
pub fn http_service_probe(config: HttpProbeConfig) -> ServiceProbe {
    Arc::new(move || {
        let config = config.clone();
        Box::pin(async move { http_probe(&config).await })
    })
}

/// Perform one HTTP probe, folding every failure into a status value.
async fn http_probe(config: &HttpProbeConfig) -> Health {
    let url = config.url();

    let result = tokio::time::timeout(config.timeout, async {
        let stream = match tokio::net::TcpStream::connect(&config.address).await {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, %url, "service probe connection failed");
                return Health::down()
                    .with_detail("url", url.as_str())
                    .with_detail("error", e.to_string());
            }
        };

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, %url, "service probe handshake failed");
                return Health::down()
                    .with_detail("url", url.as_str())
                    .with_detail("error", e.to_string());
            }
        };

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = match http::Request::builder()
            .method("GET")
            .uri(&url)
            .header("host", &config.address)
            .header("user-agent", "bridge-health/0.1")
            .body(http_body_util::Empty::<bytes::Bytes>::new())
        {
            Ok(req) => req,
            Err(e) => {
                return Health::down()
                    .with_detail("url", url.as_str())
                    .with_detail("error", e.to_string());
            }
        };

        let resp = match sender.send_request(req).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(error = %e, %url, "service probe request failed");
                return Health::down()
                    .with_detail("url", url.as_str())
                    .with_detail("error", e.to_string());
            }
        };

        if !resp.status().is_success() {
            debug!(status = %resp.status(), %url, "service probe non-2xx");
            return Health::down()
                .with_detail("url", url.as_str())
                .with_detail("error", format!("unexpected status {}", resp.status()));
        }

        // The remote may report its version in the health body.
        let version = match resp.into_body().collect().await {
            Ok(body) => serde_json::from_slice::<Value>(&body.to_bytes())
                .ok()
                .and_then(|v| {
                    v.get("version")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                }),
            Err(_) => None,
        };

        healthy_response(config, version.as_deref())
    })
    .await;

    match result {
        Ok(health) => health,
        Err(_) => {
            debug!(%url, "service probe timed out");
            Health::down()
                .with_detail("url", url.as_str())
                .with_detail("error", "timed out")
        }
    }
}

/// Fold a 2xx response into a judgment, applying the minimum-version gate.
///
/// An unparsable or absent remote version is reported in detail but does
/// not fail the probe; only a parsed version below the minimum does.
fn healthy_response(config: &HttpProbeConfig, version: Option<&str>) -> Health {
    if let (Some(min), Some(v)) = (&config.min_version, version) {
        if let Ok(parsed) = semver::Version::parse(v) {
            if parsed < *min {
                return Health::down()
                    .with_detail("url", config.url())
                    .with_detail("error", "incompatible version")
                    .with_detail("version", v)
                    .with_detail("minimum", min.to_string());
            }
        }
    }

    let mut health = Health::up().with_detail("url", config.url());
    if let Some(v) = version {
        health = health.with_detail("version", v);
    }
    health
}
