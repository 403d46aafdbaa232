//! Asynchronously refreshed composite indicator.
//!
//! Holds the latest `AggregateSnapshot` in an `ArcSwap` cell. Readers
//! load the current snapshot without blocking, regardless of whether a
//! refresh is in flight; the refresh task is the single writer and
//! publishes each new snapshot whole.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::aggregator::BridgeHealthAggregator;
use crate::applications::ApplicationsHealthIndicator;
use crate::services::CompositeServiceHealthIndicator;
use crate::status::{AggregateSnapshot, Health};

/// Cached composite indicator refreshed on a schedule.
pub struct AsyncCompositeHealthIndicator {
    services: Arc<CompositeServiceHealthIndicator>,
    applications: Arc<ApplicationsHealthIndicator>,
    aggregator: BridgeHealthAggregator,
    /// Bridge version reported in every computed snapshot.
    version: String,
    snapshot: ArcSwap<AggregateSnapshot>,
}

impl AsyncCompositeHealthIndicator {
    /// Create the indicator seeded with the placeholder snapshot
    /// (`UNKNOWN` / "Unknown Version") until the first refresh runs.
    pub fn new(
        services: Arc<CompositeServiceHealthIndicator>,
        applications: Arc<ApplicationsHealthIndicator>,
        aggregator: BridgeHealthAggregator,
        version: impl Into<String>,
    ) -> Self {
        Self {
            services,
            applications,
            aggregator,
            version: version.into(),
            snapshot: ArcSwap::from_pointee(AggregateSnapshot::placeholder()),
        }
    }

    /// Latest published snapshot. Never blocks, never fails.
    pub fn health(&self) -> Arc<AggregateSnapshot> {
        self.snapshot.load_full()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Recompute the aggregate from the current sub-indicator states and
    /// publish it atomically.
    pub async fn refresh(&self) {
        let services = self.services.health().await;
        let applications = self.applications.health();
        self.publish(&services, &applications);
    }

    /// Publish a new snapshot from sub-results. On a malformed sub-result
    /// the previous snapshot stays published and the fault is only logged.
    fn publish(&self, services: &Health, applications: &Health) {
        match self.aggregator.aggregate(services, applications, &self.version) {
            Ok(snapshot) => {
                debug!(status = %snapshot.status, message = %snapshot.message, "health snapshot published");
                self.snapshot.store(Arc::new(snapshot));
            }
            Err(e) => {
                error!(error = %e, "health refresh failed, keeping previous snapshot");
            }
        }
    }

    /// Scheduled refresh loop.
    ///
    /// Runs an immediate refresh, then one per interval until shutdown.
    /// Runs never overlap: a single task owns the loop, and a late
    /// refresh simply publishes late.
    pub async fn run(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        debug!(?interval, "health refresh loop starting");
        self.refresh().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    self.refresh().await;
                }
                _ = shutdown.changed() => {
                    debug!("health refresh loop shutting down");
                    break;
                }
            }
        }
    }
}
