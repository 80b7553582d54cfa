//! In-memory reference dataset store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{BusRoute, BusService, BusStop, StopCode};

use super::error::StoreError;
use super::Datastore;

/// Record counts and freshness per dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    /// Number of stored bus stops
    pub stop_count: usize,
    /// Number of stored bus services
    pub service_count: usize,
    /// Number of stored route entries
    pub route_count: usize,
    /// When the stop dataset last received a write
    pub stops_refreshed_at: Option<DateTime<Utc>>,
    /// When the service dataset last received a write
    pub services_refreshed_at: Option<DateTime<Utc>>,
    /// When the route dataset last received a write
    pub routes_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    stops: HashMap<StopCode, BusStop>,
    services: HashMap<(String, u8), BusService>,
    routes: HashMap<(String, u8, u32), BusRoute>,
    stops_refreshed_at: Option<DateTime<Utc>>,
    services_refreshed_at: Option<DateTime<Utc>>,
    routes_refreshed_at: Option<DateTime<Utc>>,
}

/// Thread-safe in-memory store keyed by natural keys.
///
/// Writes upsert: a record with the same key replaces the previous
/// version, so repeated crawls converge on the latest dataset rather
/// than accumulating duplicates. Keys are the stop code for stops,
/// `(service_no, direction)` for services, and
/// `(service_no, direction, stop_sequence)` for route entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up stops, optionally filtered by a search string.
    ///
    /// The search matches case-insensitively against the stop code,
    /// road name, and description. Results are sorted by stop code and
    /// capped at `limit`.
    pub async fn search_stops(&self, search: Option<&str>, limit: usize) -> Vec<BusStop> {
        let guard = self.inner.read().await;

        let needle = search.map(str::to_lowercase);

        let mut stops: Vec<BusStop> = guard
            .stops
            .values()
            .filter(|stop| match &needle {
                Some(needle) => {
                    stop.code.as_str().contains(needle.as_str())
                        || stop.road_name.to_lowercase().contains(needle.as_str())
                        || stop.description.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();

        stops.sort_by(|a, b| a.code.cmp(&b.code));
        stops.truncate(limit);
        stops
    }

    /// All stored services, sorted by service number then direction.
    pub async fn services(&self) -> Vec<BusService> {
        let guard = self.inner.read().await;

        let mut services: Vec<BusService> = guard.services.values().cloned().collect();
        services.sort_by(|a, b| {
            a.service_no
                .cmp(&b.service_no)
                .then(a.direction.cmp(&b.direction))
        });
        services
    }

    /// Route entries for one service, in stop-sequence order.
    ///
    /// Pass a direction to restrict to one direction; otherwise both
    /// directions are returned, direction 1 first.
    pub async fn routes_for_service(
        &self,
        service_no: &str,
        direction: Option<u8>,
    ) -> Vec<BusRoute> {
        let guard = self.inner.read().await;

        let mut routes: Vec<BusRoute> = guard
            .routes
            .values()
            .filter(|route| {
                route.service_no == service_no
                    && direction.is_none_or(|d| route.direction == d)
            })
            .cloned()
            .collect();

        routes.sort_by(|a, b| {
            a.direction
                .cmp(&b.direction)
                .then(a.stop_sequence.cmp(&b.stop_sequence))
        });
        routes
    }

    /// Current counts and freshness timestamps.
    pub async fn stats(&self) -> StoreStats {
        let guard = self.inner.read().await;

        StoreStats {
            stop_count: guard.stops.len(),
            service_count: guard.services.len(),
            route_count: guard.routes.len(),
            stops_refreshed_at: guard.stops_refreshed_at,
            services_refreshed_at: guard.services_refreshed_at,
            routes_refreshed_at: guard.routes_refreshed_at,
        }
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn save_bus_stops(&self, stops: Vec<BusStop>) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;

        for stop in stops {
            guard.stops.insert(stop.code, stop);
        }
        guard.stops_refreshed_at = Some(Utc::now());

        Ok(())
    }

    async fn save_bus_services(&self, services: Vec<BusService>) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;

        for service in services {
            guard
                .services
                .insert((service.service_no.clone(), service.direction), service);
        }
        guard.services_refreshed_at = Some(Utc::now());

        Ok(())
    }

    async fn save_bus_routes(&self, routes: Vec<BusRoute>) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;

        for route in routes {
            guard.routes.insert(
                (route.service_no.clone(), route.direction, route.stop_sequence),
                route,
            );
        }
        guard.routes_refreshed_at = Some(Utc::now());

        Ok(())
    }
}
