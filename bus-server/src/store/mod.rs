//! Reference dataset storage.
//!
//! The crawler writes through the narrow [`Datastore`] trait; read
//! access for the HTTP layer goes through the concrete store's own
//! methods. [`MemoryStore`] is the in-process implementation.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreStats};

use async_trait::async_trait;

use crate::domain::{BusRoute, BusService, BusStop};

/// Write boundary between the crawler and storage.
///
/// Each call persists one batch (one crawled page). Implementations
/// must upsert: crawls run repeatedly over the same datasets and the
/// latest version of a record wins.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Persist a batch of bus stops.
    async fn save_bus_stops(&self, stops: Vec<BusStop>) -> Result<(), StoreError>;

    /// Persist a batch of bus services.
    async fn save_bus_services(&self, services: Vec<BusService>) -> Result<(), StoreError>;

    /// Persist a batch of route entries.
    async fn save_bus_routes(&self, routes: Vec<BusRoute>) -> Result<(), StoreError>;
}
