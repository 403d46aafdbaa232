//! Applications composite indicator.
//!
//! Classifies the set of registered integration applications: the bridge
//! has a reason to exist only while at least one integration is active,
//! so an empty (or fully inactive) set reports `Down`.

use std::sync::Arc;

use serde_json::Value;

use crate::status::{Health, HealthStatus, IntegrationHealth};

/// Detail key holding the per-application record list.
pub const APPLICATIONS: &str = "applications";

/// Source of the current set of registered applications.
///
/// Implementations return records in registration order.
pub trait ApplicationRegistry: Send + Sync {
    fn applications(&self) -> Vec<IntegrationHealth>;
}

/// Folds registry records into one judgment.
pub struct ApplicationsHealthIndicator {
    registry: Arc<dyn ApplicationRegistry>,
}

impl ApplicationsHealthIndicator {
    pub fn new(registry: Arc<dyn ApplicationRegistry>) -> Self {
        Self { registry }
    }

    /// `Down` iff no application is active at all; a partially healthy
    /// set still reports `Up`, with per-application records preserved in
    /// detail for visibility. "Active" means status `Up` — an `Unknown`
    /// record does not count.
    pub fn health(&self) -> Health {
        let applications = self.registry.applications();
        let any_active = applications
            .iter()
            .any(|app| app.status == HealthStatus::Up);

        let status = if any_active {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        Health::new(status).with_detail(
            APPLICATIONS,
            serde_json::to_value(&applications).unwrap_or(Value::Null),
        )
    }
}
