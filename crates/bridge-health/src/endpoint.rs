//! On-demand read model over the cached aggregate.
//!
//! The endpoint starts from the async indicator's cached snapshot, then
//! re-probes both composite indicators live and re-runs the merge. It is
//! a freshness upgrade for explicit reads: the scheduled cache and this
//! path are independent producers and never write each other's state.

use std::sync::Arc;

use tracing::warn;

use crate::aggregator::BridgeHealthAggregator;
use crate::applications::ApplicationsHealthIndicator;
use crate::async_indicator::AsyncCompositeHealthIndicator;
use crate::services::CompositeServiceHealthIndicator;
use crate::status::AggregateSnapshot;

/// Externally exposed health read model.
pub struct AsyncCompositeHealthEndpoint {
    indicator: Arc<AsyncCompositeHealthIndicator>,
    services: Arc<CompositeServiceHealthIndicator>,
    applications: Arc<ApplicationsHealthIndicator>,
    aggregator: BridgeHealthAggregator,
}

impl AsyncCompositeHealthEndpoint {
    pub fn new(
        indicator: Arc<AsyncCompositeHealthIndicator>,
        services: Arc<CompositeServiceHealthIndicator>,
        applications: Arc<ApplicationsHealthIndicator>,
        aggregator: BridgeHealthAggregator,
    ) -> Self {
        Self {
            indicator,
            services,
            applications,
            aggregator,
        }
    }

    /// Synchronously recompute the aggregate from live sub-results,
    /// reusing the cached version string as baseline metadata.
    ///
    /// Never mutates the async indicator's cache. On the defensive
    /// malformed-sub-result case the cached snapshot is served instead —
    /// the read path always answers.
    pub async fn invoke(&self) -> AggregateSnapshot {
        let cached = self.indicator.health();

        let services = self.services.health().await;
        let applications = self.applications.health();

        match self
            .aggregator
            .aggregate(&services, &applications, &cached.version)
        {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(error = %e, "live health merge failed, serving cached snapshot");
                (*cached).clone()
            }
        }
    }

    /// The cached snapshot, untouched by live probing.
    pub fn cached(&self) -> Arc<AggregateSnapshot> {
        self.indicator.health()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::ApplicationRegistry;
    use crate::probe::ServiceProbe;
    use crate::status::{Health, HealthStatus, IntegrationHealth};

    struct FixedRegistry(Vec<IntegrationHealth>);

    impl ApplicationRegistry for FixedRegistry {
        fn applications(&self) -> Vec<IntegrationHealth> {
            self.0.clone()
        }
    }

    fn static_probe(health: Health) -> ServiceProbe {
        Arc::new(move || {
            let health = health.clone();
            Box::pin(async move { health })
        })
    }

    fn active_app() -> IntegrationHealth {
        IntegrationHealth {
            id: "jira".to_string(),
            name: "Jira".to_string(),
            status: HealthStatus::Up,
            message: None,
        }
    }

    fn test_endpoint(
        service_status: HealthStatus,
        applications: Vec<IntegrationHealth>,
    ) -> AsyncCompositeHealthEndpoint {
        let mut services = CompositeServiceHealthIndicator::new();
        services.register("pod", static_probe(Health::new(service_status)));
        let services = Arc::new(services);

        let applications = Arc::new(ApplicationsHealthIndicator::new(Arc::new(FixedRegistry(
            applications,
        ))));

        let indicator = Arc::new(AsyncCompositeHealthIndicator::new(
            services.clone(),
            applications.clone(),
            BridgeHealthAggregator,
            "0.1.0",
        ));

        AsyncCompositeHealthEndpoint::new(indicator, services, applications, BridgeHealthAggregator)
    }

    #[tokio::test]
    async fn down_applications() {
        let endpoint = test_endpoint(HealthStatus::Up, Vec::new());
        let health = endpoint.invoke().await;

        assert_eq!(health.status, HealthStatus::Down);
        assert_eq!(health.message, "There is no active Integration");
    }

    #[tokio::test]
    async fn down_connectivity() {
        let endpoint = test_endpoint(HealthStatus::Down, vec![active_app()]);
        let health = endpoint.invoke().await;

        assert_eq!(health.status, HealthStatus::Down);
        assert_eq!(health.message, "Required services are not available");
    }

    #[tokio::test]
    async fn up() {
        let endpoint = test_endpoint(HealthStatus::Up, vec![active_app()]);
        let health = endpoint.invoke().await;

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(health.message, "Success");
        assert_eq!(health.services.len(), 1);
        assert_eq!(health.applications.len(), 1);
    }

    #[tokio::test]
    async fn reports_the_cached_version_as_baseline() {
        let endpoint = test_endpoint(HealthStatus::Up, vec![active_app()]);

        // Before any refresh the cache still holds the placeholder.
        let health = endpoint.invoke().await;
        assert_eq!(health.version, AggregateSnapshot::UNKNOWN_VERSION);

        endpoint.indicator.refresh().await;
        let health = endpoint.invoke().await;
        assert_eq!(health.version, "0.1.0");
    }

    #[tokio::test]
    async fn invoke_does_not_feed_back_into_the_cache() {
        let endpoint = test_endpoint(HealthStatus::Up, vec![active_app()]);

        let live = endpoint.invoke().await;
        assert_eq!(live.status, HealthStatus::Up);

        // The cache still holds the placeholder.
        let cached = endpoint.cached();
        assert_eq!(*cached, AggregateSnapshot::placeholder());
    }
}
