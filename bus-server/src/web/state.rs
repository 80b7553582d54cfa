//! Application state for the web layer.

use std::sync::Arc;

use crate::crawler::BusApi;
use crate::scheduler::Scheduler;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Cloning is cheap; everything here is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Background task registry, exposed through the control endpoints
    pub scheduler: Arc<Scheduler>,

    /// Reference datasets the crawler keeps refreshed
    pub store: MemoryStore,

    /// Upstream client; live arrival lookups pass straight through
    pub api: Arc<dyn BusApi>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(scheduler: Arc<Scheduler>, store: MemoryStore, api: Arc<dyn BusApi>) -> Self {
        Self {
            scheduler,
            store,
            api,
        }
    }
}
