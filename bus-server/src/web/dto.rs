//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ArrivingService, BusArrival, BusRoute, BusService, BusStop, BusType, FrequencyRange, Load,
    NextBus,
};
use crate::scheduler::TaskSnapshot;
use crate::store::StoreStats;

/// Query for the stop search endpoint.
#[derive(Debug, Deserialize)]
pub struct StopsQuery {
    /// Substring matched against code, road name, and description
    pub search: Option<String>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

/// A bus stop in search results.
#[derive(Debug, Serialize)]
pub struct StopResult {
    /// Five-digit stop code
    pub code: String,

    /// Road the stop is on
    pub road_name: String,

    /// Stop description ("Opp Blk 123")
    pub description: String,

    /// WGS84 latitude
    pub latitude: f64,

    /// WGS84 longitude
    pub longitude: f64,
}

/// Stop search results.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<StopResult>,
}

/// One service direction in the services listing.
#[derive(Debug, Serialize)]
pub struct ServiceResult {
    /// Service number as displayed on the bus
    pub service_no: String,

    /// Operator code
    pub operator: String,

    /// Direction of travel, 1 or 2
    pub direction: u8,

    /// Service category
    pub category: String,

    /// First stop of this direction
    pub origin_code: String,

    /// Last stop of this direction
    pub destination_code: String,

    /// Morning peak headway, "min-max" minutes, absent when unpublished
    pub am_peak_freq: Option<String>,

    /// Morning off-peak headway
    pub am_offpeak_freq: Option<String>,

    /// Evening peak headway
    pub pm_peak_freq: Option<String>,

    /// Evening off-peak headway
    pub pm_offpeak_freq: Option<String>,

    /// Loop terminus description, present only for loop services
    pub loop_desc: Option<String>,
}

/// Services listing.
#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<ServiceResult>,
}

/// Query for the route listing endpoint.
#[derive(Debug, Deserialize)]
pub struct RoutesQuery {
    /// Service number to list the route of
    pub service: String,

    /// Optional direction filter (1 or 2)
    pub direction: Option<u8>,
}

/// One stop along a service's route.
#[derive(Debug, Serialize)]
pub struct RouteStopResult {
    /// Direction this entry belongs to
    pub direction: u8,

    /// Position along the route, starting at 1
    pub stop_sequence: u32,

    /// Stop code
    pub bus_stop_code: String,

    /// Cumulative distance from the origin in kilometres
    pub distance_km: f64,

    /// First/last bus times as "HH:MM", absent when not operated
    pub wd_first_bus: Option<String>,
    pub wd_last_bus: Option<String>,
    pub sat_first_bus: Option<String>,
    pub sat_last_bus: Option<String>,
    pub sun_first_bus: Option<String>,
    pub sun_last_bus: Option<String>,
}

/// Route listing for one service.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    /// The service the entries belong to
    pub service: String,

    pub routes: Vec<RouteStopResult>,
}

/// Query for the live arrivals endpoint.
#[derive(Debug, Deserialize)]
pub struct ArrivalsQuery {
    /// Bus stop code to look up
    pub stop: String,

    /// Optional service number filter
    pub service: Option<String>,
}

/// Live arrivals at one stop.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    /// The stop the lookup was for
    pub bus_stop_code: String,

    /// Services currently predicted to call here
    pub services: Vec<ArrivingServiceResult>,
}

/// One service with its upcoming buses.
#[derive(Debug, Serialize)]
pub struct ArrivingServiceResult {
    pub service_no: String,
    pub operator: String,

    /// Up to three predictions, soonest first
    pub next_buses: Vec<NextBusResult>,
}

/// One predicted bus.
#[derive(Debug, Serialize)]
pub struct NextBusResult {
    /// RFC 3339 arrival estimate, absent when the feed has none
    pub estimated_arrival: Option<String>,

    /// Whole minutes until arrival, clamped at zero
    pub minutes: Option<i64>,

    /// Whether the estimate comes from live vehicle tracking
    pub monitored: bool,

    /// Passenger load ("seats_available", "standing_available",
    /// "limited_standing")
    pub load: Option<&'static str>,

    /// Vehicle type ("single_deck", "double_deck", "bendy")
    pub bus_type: Option<&'static str>,

    /// Wheelchair accessible
    pub wheelchair_accessible: bool,

    /// First stop of the bus's trip
    pub origin_code: Option<String>,

    /// Last stop of the bus's trip
    pub destination_code: Option<String>,

    /// Current vehicle position, if tracked
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Which visit to this stop the prediction is for
    pub visit_number: Option<u32>,
}

/// A task in the scheduler listing.
#[derive(Debug, Serialize)]
pub struct TaskResult {
    /// Task id
    pub id: String,

    /// Cadence of the periodic driver in seconds
    pub interval_secs: u64,

    /// An execution is currently in flight
    pub running: bool,

    /// The periodic driver is ticking
    pub enabled: bool,
}

/// Scheduler task listing.
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskResult>,
}

/// Acknowledgement of a scheduler control action.
#[derive(Debug, Serialize)]
pub struct TaskActionResponse {
    /// The task the action applied to
    pub task: String,

    /// What happened: "triggered", "stopped", "enabled", "disabled"
    pub status: &'static str,
}

/// Health summary with per-dataset freshness.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub datasets: DatasetsStatus,
}

/// Per-dataset counts and refresh times.
#[derive(Debug, Serialize)]
pub struct DatasetsStatus {
    pub stops: DatasetStatus,
    pub services: DatasetStatus,
    pub routes: DatasetStatus,
}

/// Count and freshness of one stored dataset.
#[derive(Debug, Serialize)]
pub struct DatasetStatus {
    /// Number of stored records
    pub count: usize,

    /// RFC 3339 time of the last successful refresh
    pub refreshed_at: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl StopResult {
    /// Create from a domain BusStop.
    pub fn from_stop(stop: &BusStop) -> Self {
        Self {
            code: stop.code.as_str().to_string(),
            road_name: stop.road_name.clone(),
            description: stop.description.clone(),
            latitude: stop.latitude,
            longitude: stop.longitude,
        }
    }
}

impl ServiceResult {
    /// Create from a domain BusService.
    pub fn from_service(service: &BusService) -> Self {
        Self {
            service_no: service.service_no.clone(),
            operator: service.operator.clone(),
            direction: service.direction,
            category: service.category.clone(),
            origin_code: service.origin_code.as_str().to_string(),
            destination_code: service.destination_code.as_str().to_string(),
            am_peak_freq: published(service.am_peak_freq),
            am_offpeak_freq: published(service.am_offpeak_freq),
            pm_peak_freq: published(service.pm_peak_freq),
            pm_offpeak_freq: published(service.pm_offpeak_freq),
            loop_desc: service.loop_desc.clone(),
        }
    }
}

/// A headway as "min-max", or `None` when the operator publishes none.
fn published(freq: FrequencyRange) -> Option<String> {
    freq.is_known().then(|| freq.to_string())
}

impl RouteStopResult {
    /// Create from a domain BusRoute entry.
    pub fn from_route(route: &BusRoute) -> Self {
        let hhmm = |t: Option<chrono::NaiveTime>| t.map(|t| t.format("%H:%M").to_string());
        Self {
            direction: route.direction,
            stop_sequence: route.stop_sequence,
            bus_stop_code: route.bus_stop_code.as_str().to_string(),
            distance_km: route.distance_km,
            wd_first_bus: hhmm(route.wd_first_bus),
            wd_last_bus: hhmm(route.wd_last_bus),
            sat_first_bus: hhmm(route.sat_first_bus),
            sat_last_bus: hhmm(route.sat_last_bus),
            sun_first_bus: hhmm(route.sun_first_bus),
            sun_last_bus: hhmm(route.sun_last_bus),
        }
    }
}

impl ArrivalsResponse {
    /// Create from a domain BusArrival, computing minutes against `now`.
    pub fn from_arrival(arrival: &BusArrival, now: DateTime<Utc>) -> Self {
        Self {
            bus_stop_code: arrival.bus_stop_code.as_str().to_string(),
            services: arrival
                .services
                .iter()
                .map(|s| ArrivingServiceResult::from_service(s, now))
                .collect(),
        }
    }
}

impl ArrivingServiceResult {
    /// Create from a domain ArrivingService.
    pub fn from_service(service: &ArrivingService, now: DateTime<Utc>) -> Self {
        Self {
            service_no: service.service_no.clone(),
            operator: service.operator.clone(),
            next_buses: service
                .next_buses
                .iter()
                .map(|b| NextBusResult::from_next_bus(b, now))
                .collect(),
        }
    }
}

impl NextBusResult {
    /// Create from a domain NextBus.
    pub fn from_next_bus(bus: &NextBus, now: DateTime<Utc>) -> Self {
        Self {
            estimated_arrival: bus.estimated_arrival.map(|t| t.to_rfc3339()),
            minutes: bus.minutes_from(now),
            monitored: bus.monitored,
            load: bus.load.map(load_label),
            bus_type: bus.bus_type.map(bus_type_label),
            wheelchair_accessible: bus.wheelchair_accessible,
            origin_code: bus.origin_code.map(|c| c.as_str().to_string()),
            destination_code: bus.destination_code.map(|c| c.as_str().to_string()),
            latitude: bus.latitude,
            longitude: bus.longitude,
            visit_number: bus.visit_number,
        }
    }
}

fn load_label(load: Load) -> &'static str {
    match load {
        Load::SeatsAvailable => "seats_available",
        Load::StandingAvailable => "standing_available",
        Load::LimitedStanding => "limited_standing",
    }
}

fn bus_type_label(bus_type: BusType) -> &'static str {
    match bus_type {
        BusType::SingleDeck => "single_deck",
        BusType::DoubleDeck => "double_deck",
        BusType::Bendy => "bendy",
    }
}

impl TaskResult {
    /// Create from a scheduler snapshot.
    pub fn from_snapshot(task: &TaskSnapshot) -> Self {
        Self {
            id: task.id.clone(),
            interval_secs: task.interval.as_secs(),
            running: task.running,
            enabled: task.enabled,
        }
    }
}

impl HealthResponse {
    /// Create from store statistics.
    pub fn from_stats(stats: &StoreStats) -> Self {
        Self {
            status: "ok",
            datasets: DatasetsStatus {
                stops: DatasetStatus::new(stats.stop_count, stats.stops_refreshed_at),
                services: DatasetStatus::new(stats.service_count, stats.services_refreshed_at),
                routes: DatasetStatus::new(stats.route_count, stats.routes_refreshed_at),
            },
        }
    }
}

impl DatasetStatus {
    fn new(count: usize, refreshed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            count,
            refreshed_at: refreshed_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopCode;
    use chrono::{FixedOffset, TimeZone};
    use std::time::Duration;

    fn service(freq: FrequencyRange) -> BusService {
        BusService {
            service_no: "10".to_string(),
            operator: "SBST".to_string(),
            direction: 1,
            category: "TRUNK".to_string(),
            origin_code: StopCode::parse("75009").unwrap(),
            destination_code: StopCode::parse("16009").unwrap(),
            am_peak_freq: freq,
            am_offpeak_freq: FrequencyRange::UNKNOWN,
            pm_peak_freq: freq,
            pm_offpeak_freq: freq,
            loop_desc: None,
        }
    }

    #[test]
    fn service_result_renders_known_frequencies_only() {
        let result = ServiceResult::from_service(&service(FrequencyRange { min: 5, max: 8 }));
        assert_eq!(result.am_peak_freq.as_deref(), Some("5-8"));
        assert_eq!(result.am_offpeak_freq, None);
        assert_eq!(result.origin_code, "75009");
        assert_eq!(result.destination_code, "16009");
    }

    #[test]
    fn route_result_renders_times_with_a_colon() {
        let route = BusRoute {
            service_no: "10".to_string(),
            operator: "SBST".to_string(),
            direction: 1,
            stop_sequence: 3,
            bus_stop_code: StopCode::parse("76059").unwrap(),
            distance_km: 1.4,
            wd_first_bus: Some(chrono::NaiveTime::from_hms_opt(5, 30, 0).unwrap()),
            wd_last_bus: Some(chrono::NaiveTime::from_hms_opt(23, 5, 0).unwrap()),
            sat_first_bus: None,
            sat_last_bus: None,
            sun_first_bus: None,
            sun_last_bus: None,
        };

        let result = RouteStopResult::from_route(&route);
        assert_eq!(result.wd_first_bus.as_deref(), Some("05:30"));
        assert_eq!(result.wd_last_bus.as_deref(), Some("23:05"));
        assert_eq!(result.sat_first_bus, None);
        assert_eq!(result.bus_stop_code, "76059");
    }

    #[test]
    fn next_bus_result_minutes_and_labels() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let eta = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 20, 6, 30)
            .unwrap();

        let bus = NextBus {
            origin_code: Some(StopCode::parse("75009").unwrap()),
            destination_code: Some(StopCode::parse("16009").unwrap()),
            estimated_arrival: Some(eta),
            monitored: true,
            latitude: Some(1.32),
            longitude: Some(103.84),
            visit_number: Some(1),
            load: Some(Load::StandingAvailable),
            wheelchair_accessible: true,
            bus_type: Some(BusType::DoubleDeck),
        };

        let result = NextBusResult::from_next_bus(&bus, now);
        assert_eq!(result.minutes, Some(6));
        assert_eq!(result.load, Some("standing_available"));
        assert_eq!(result.bus_type, Some("double_deck"));
        assert_eq!(result.origin_code.as_deref(), Some("75009"));
        assert!(result.estimated_arrival.unwrap().starts_with("2024-06-01T20:06:30"));
    }

    #[test]
    fn padded_prediction_maps_to_absent_fields() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let bus = NextBus {
            origin_code: None,
            destination_code: None,
            estimated_arrival: None,
            monitored: false,
            latitude: None,
            longitude: None,
            visit_number: None,
            load: None,
            wheelchair_accessible: false,
            bus_type: None,
        };

        let result = NextBusResult::from_next_bus(&bus, now);
        assert_eq!(result.minutes, None);
        assert_eq!(result.estimated_arrival, None);
        assert_eq!(result.load, None);
        assert_eq!(result.bus_type, None);
    }

    #[test]
    fn task_result_from_snapshot() {
        let snapshot = TaskSnapshot {
            id: "lta-crawler".to_string(),
            interval: Duration::from_secs(900),
            running: true,
            enabled: false,
        };

        let result = TaskResult::from_snapshot(&snapshot);
        assert_eq!(result.id, "lta-crawler");
        assert_eq!(result.interval_secs, 900);
        assert!(result.running);
        assert!(!result.enabled);
    }

    #[test]
    fn health_response_tracks_freshness_per_dataset() {
        let refreshed = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
        let stats = StoreStats {
            stop_count: 5000,
            service_count: 600,
            route_count: 26000,
            stops_refreshed_at: Some(refreshed),
            services_refreshed_at: None,
            routes_refreshed_at: Some(refreshed),
        };

        let response = HealthResponse::from_stats(&stats);
        assert_eq!(response.status, "ok");
        assert_eq!(response.datasets.stops.count, 5000);
        assert!(
            response
                .datasets
                .stops
                .refreshed_at
                .as_deref()
                .unwrap()
                .starts_with("2024-06-01T03:00:00")
        );
        assert_eq!(response.datasets.services.refreshed_at, None);
        assert_eq!(response.datasets.routes.count, 26000);
    }
}
