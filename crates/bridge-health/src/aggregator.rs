//! Pure merge of the two composite judgments into one snapshot.
//!
//! No I/O and no mutable state: the aggregator turns
//! (services health, applications health, version) into an
//! `AggregateSnapshot` with a priority-ordered rule.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use thiserror::Error;

use crate::applications::APPLICATIONS;
use crate::services::SERVICES;
use crate::status::{AggregateSnapshot, Health, HealthStatus, IntegrationHealth};

/// Message when no integration application is active.
pub const NO_ACTIVE_INTEGRATION: &str = "There is no active Integration";
/// Message when a required remote service is unavailable.
pub const SERVICES_NOT_AVAILABLE: &str = "Required services are not available";
/// Message when everything is up.
pub const SUCCESS: &str = "Success";

/// Errors from merging malformed sub-results.
///
/// Defensive only: the composite indicators always produce well-formed
/// detail bags. Callers log these and keep the previous good snapshot.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("sub-result is missing the `{0}` detail")]
    MissingDetail(&'static str),

    #[error("sub-result `{0}` detail is malformed: {1}")]
    MalformedDetail(&'static str, String),
}

/// Combines the services and applications judgments.
#[derive(Debug, Default, Clone, Copy)]
pub struct BridgeHealthAggregator;

impl BridgeHealthAggregator {
    /// Merge the two sub-results into one snapshot.
    ///
    /// Applications are checked before services: a bridge with no active
    /// integration is the more actionable condition and is reported
    /// preferentially when both sub-systems are unhealthy.
    pub fn aggregate(
        &self,
        services: &Health,
        applications: &Health,
        version: &str,
    ) -> Result<AggregateSnapshot, AggregateError> {
        let service_map = match services.detail(SERVICES) {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(AggregateError::MalformedDetail(
                    SERVICES,
                    format!("expected an object, got {other}"),
                ));
            }
            None => return Err(AggregateError::MissingDetail(SERVICES)),
        };

        let records: Vec<IntegrationHealth> = match applications.detail(APPLICATIONS) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| AggregateError::MalformedDetail(APPLICATIONS, e.to_string()))?,
            None => return Err(AggregateError::MissingDetail(APPLICATIONS)),
        };

        let (status, message) = if applications.status == HealthStatus::Down {
            (HealthStatus::Down, NO_ACTIVE_INTEGRATION)
        } else if services.status == HealthStatus::Down {
            (HealthStatus::Down, SERVICES_NOT_AVAILABLE)
        } else {
            (HealthStatus::Up, SUCCESS)
        };

        Ok(AggregateSnapshot {
            status,
            version: version.to_string(),
            message: message.to_string(),
            services: service_map,
            applications: records,
            computed_at: epoch_secs(),
        })
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
