//! bridge-health — health aggregation engine for the integration bridge.
//!
//! Polls the remote services the bridge depends on and the set of
//! registered integration applications, reconciles both into one
//! composite judgment, and keeps the result in an atomically-swapped
//! snapshot so readers never block on live probing.
//!
//! # Architecture
//!
//! ```text
//! ServiceProbe (×N)          ApplicationRegistry
//!        │                           │
//!        ▼                           ▼
//! CompositeServiceHealthIndicator   ApplicationsHealthIndicator
//!        │                           │
//!        └────────────┬──────────────┘
//!                     ▼
//!          BridgeHealthAggregator (pure merge)
//!                     │
//!        ┌────────────┴──────────────┐
//!        ▼                           ▼
//! AsyncCompositeHealthIndicator   AsyncCompositeHealthEndpoint
//! (scheduled refresh → ArcSwap)   (live re-probe on demand)
//! ```
//!
//! # Reliability contract
//!
//! Probes never fail: every failure is folded into a `Down` or `Unknown`
//! status with diagnostic detail. The read path always answers — a
//! malformed sub-result keeps the previous snapshot published instead of
//! surfacing an error to callers.

pub mod aggregator;
pub mod applications;
pub mod async_indicator;
pub mod endpoint;
pub mod probe;
pub mod services;
pub mod status;

pub use aggregator::{AggregateError, BridgeHealthAggregator};
pub use applications::{ApplicationRegistry, ApplicationsHealthIndicator};
pub use async_indicator::AsyncCompositeHealthIndicator;
pub use endpoint::AsyncCompositeHealthEndpoint;
pub use probe::{HttpProbeConfig, ServiceProbe, http_service_probe};
pub use services::CompositeServiceHealthIndicator;
pub use status::{AggregateSnapshot, Health, HealthStatus, IntegrationHealth};
