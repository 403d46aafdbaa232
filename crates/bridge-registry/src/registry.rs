//! Registry storage and iteration-order semantics.

use std::sync::RwLock;

use tracing::debug;

use bridge_health::{ApplicationRegistry, HealthStatus, IntegrationHealth};

/// Insertion-ordered, lock-guarded application registry.
///
/// Writes are rare (registrations and health reports); reads take a
/// snapshot copy so callers never hold the lock across awaits.
#[derive(Default)]
pub struct InMemoryApplicationRegistry {
    records: RwLock<Vec<IntegrationHealth>>,
}

impl InMemoryApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a record by id. New ids append at the end; existing ids
    /// are replaced in place, keeping their original position.
    ///
    /// Returns `true` when the application was newly registered.
    pub fn register(&self, record: IntegrationHealth) -> bool {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                debug!(id = %record.id, status = %record.status, "application record updated");
                *existing = record;
                false
            }
            None => {
                debug!(id = %record.id, status = %record.status, "application registered");
                records.push(record);
                true
            }
        }
    }

    /// Update the status (and message) of one application.
    ///
    /// Returns `false` for unknown ids.
    pub fn set_status(&self, id: &str, status: HealthStatus, message: Option<String>) -> bool {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                record.message = message;
                true
            }
            None => false,
        }
    }

    /// Remove an application. Returns `false` for unknown ids.
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicationRegistry for InMemoryApplicationRegistry {
    fn applications(&self) -> Vec<IntegrationHealth> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
