//! Health status model shared across the bridge.
//!
//! All types are serializable to JSON for the health summary payload.
//! Detail maps keep insertion order (serde_json `preserve_order`) so a
//! recomputed snapshot compares equal to its predecessor when nothing
//! changed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tri-state status reported by probes and composite indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
    Unknown,
}

impl HealthStatus {
    /// Most-severe-wins merge: `Down` dominates `Unknown` dominates `Up`.
    ///
    /// The bridge aggregator uses its own priority-ordered rule instead;
    /// this lattice is for callers that fold same-kind statuses.
    pub fn worst(self, other: HealthStatus) -> HealthStatus {
        use HealthStatus::*;
        match (self, other) {
            (Down, _) | (_, Down) => Down,
            (Unknown, _) | (_, Unknown) => Unknown,
            (Up, Up) => Up,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Up => write!(f, "UP"),
            HealthStatus::Down => write!(f, "DOWN"),
            HealthStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A status plus a named bag of detail values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: HealthStatus,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Health {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            details: Map::new(),
        }
    }

    pub fn up() -> Self {
        Self::new(HealthStatus::Up)
    }

    pub fn down() -> Self {
        Self::new(HealthStatus::Down)
    }

    pub fn unknown() -> Self {
        Self::new(HealthStatus::Unknown)
    }

    /// Attach a detail value, keeping insertion order.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// One registered application's health record.
///
/// Produced by the application registry; read-only to the health engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationHealth {
    pub id: String,
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The unit cached by the async layer.
///
/// Immutable once published; a new snapshot replaces the old one whole,
/// so readers never observe a partially-merged result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub status: HealthStatus,
    pub version: String,
    pub message: String,
    pub services: Map<String, Value>,
    pub applications: Vec<IntegrationHealth>,
    /// Unix timestamp (seconds) when this snapshot was computed.
    pub computed_at: u64,
}

impl AggregateSnapshot {
    /// Version string reported before the first refresh completes.
    pub const UNKNOWN_VERSION: &'static str = "Unknown Version";

    /// The value published at startup, before any refresh has run.
    pub fn placeholder() -> Self {
        Self {
            status: HealthStatus::Unknown,
            version: Self::UNKNOWN_VERSION.to_string(),
            message: String::new(),
            services: Map::new(),
            applications: Vec::new(),
            computed_at: 0,
        }
    }
}
