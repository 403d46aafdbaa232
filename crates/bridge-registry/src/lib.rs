//! bridge-registry — in-memory registry of integration applications.
//!
//! Holds the current `IntegrationHealth` record for every registered
//! application, in registration order. Purely in-memory: the set is
//! rebuilt at process start and updated as integrations report in.

mod registry;

pub use registry::InMemoryApplicationRegistry;
