//! Composite indicator over remote service probes.
//!
//! Folds every registered service into a single judgment with a strict
//! AND rule: the bridge is only as available as the least available of
//! the services it depends on.

use serde_json::{Map, Value};
use tracing::debug;

use crate::probe::ServiceProbe;
use crate::status::{Health, HealthStatus};

/// Detail key holding the per-service health map.
pub const SERVICES: &str = "services";

/// Aggregates all registered service probes.
///
/// Stateless across calls: every `health()` re-probes every service.
#[derive(Default)]
pub struct CompositeServiceHealthIndicator {
    /// Registered probes in registration order.
    probes: Vec<(String, ServiceProbe)>,
}

impl CompositeServiceHealthIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service probe. Registration order determines the order
    /// of entries in the detail map.
    pub fn register(&mut self, name: impl Into<String>, probe: ServiceProbe) {
        let name = name.into();
        debug!(service = %name, "service probe registered");
        self.probes.push((name, probe));
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Probe every registered service and fold into one judgment.
    ///
    /// `Up` iff every service reports `Up`; zero registered services is
    /// the vacuous conjunction and reports `Up`. Anything else is `Down` —
    /// there is no partial state at this layer.
    pub async fn health(&self) -> Health {
        let mut services = Map::new();
        let mut all_up = true;

        for (name, probe) in &self.probes {
            let health = probe().await;
            all_up &= health.status == HealthStatus::Up;
            services.insert(
                name.clone(),
                serde_json::to_value(&health).unwrap_or(Value::Null),
            );
        }

        let status = if all_up {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        Health::new(status).with_detail(SERVICES, Value::Object(services))
    }
}
