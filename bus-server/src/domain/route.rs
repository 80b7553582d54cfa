//! Bus route types.

use chrono::NaiveTime;

use super::StopCode;

/// One stop on one direction of a bus service's route.
///
/// Routes are keyed by `(service_no, direction, stop_sequence)`; walking
/// the sequence in order reproduces the path the bus drives. First/last
/// bus times are `None` where the dataset has no valid time published
/// for that day type, which is distinct from a service that starts at
/// midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct BusRoute {
    /// Service number this route entry belongs to
    pub service_no: String,
    /// Operator code
    pub operator: String,
    /// Direction of travel, 1 or 2
    pub direction: u8,
    /// Position of this stop along the route, starting at 1
    pub stop_sequence: u32,
    /// The stop the bus calls at
    pub bus_stop_code: StopCode,
    /// Cumulative distance from the origin in kilometres
    pub distance_km: f64,
    /// First bus at this stop on weekdays
    pub wd_first_bus: Option<NaiveTime>,
    /// Last bus at this stop on weekdays
    pub wd_last_bus: Option<NaiveTime>,
    /// First bus at this stop on Saturdays
    pub sat_first_bus: Option<NaiveTime>,
    /// Last bus at this stop on Saturdays
    pub sat_last_bus: Option<NaiveTime>,
    /// First bus at this stop on Sundays
    pub sun_first_bus: Option<NaiveTime>,
    /// Last bus at this stop on Sundays
    pub sun_last_bus: Option<NaiveTime>,
}
