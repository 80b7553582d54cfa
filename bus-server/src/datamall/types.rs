//! DataMall API response DTOs.
//!
//! These types map directly to the LTA DataMall JSON payloads. Field
//! names on the wire are PascalCase with a handful of outliers
//! (`AM_Peak_Freq`, `WD_FirstBus`) that need explicit renames. The
//! arrival endpoint pads missing predictions with empty strings rather
//! than omitting fields, so those DTOs tolerate the empty forms.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// Envelope for the paginated reference datasets.
///
/// DataMall wraps every list response in an OData-style envelope with
/// the records under `value`. An empty `value` array marks the end of
/// the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    /// The records on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// One record from `BusStops`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusStopRecord {
    /// Five-digit stop code.
    pub bus_stop_code: String,

    /// Road the stop is on.
    pub road_name: String,

    /// Landmark description ("Opp Blk 21", "Tru-Marine").
    pub description: String,

    /// Stop latitude in decimal degrees.
    pub latitude: f64,

    /// Stop longitude in decimal degrees.
    pub longitude: f64,
}

/// One record from `BusServices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusServiceRecord {
    /// Service number as displayed on the bus.
    pub service_no: String,

    /// Operator code ("SBST", "SMRT", ...).
    pub operator: String,

    /// Direction of travel, 1 or 2.
    pub direction: u8,

    /// Service category ("TRUNK", "FEEDER", ...).
    pub category: String,

    /// Stop code of the first stop.
    pub origin_code: String,

    /// Stop code of the last stop.
    pub destination_code: String,

    /// Morning peak headway as a "min-max" string.
    #[serde(rename = "AM_Peak_Freq")]
    pub am_peak_freq: String,

    /// Morning off-peak headway.
    #[serde(rename = "AM_Offpeak_Freq")]
    pub am_offpeak_freq: String,

    /// Evening peak headway.
    #[serde(rename = "PM_Peak_Freq")]
    pub pm_peak_freq: String,

    /// Evening off-peak headway.
    #[serde(rename = "PM_Offpeak_Freq")]
    pub pm_offpeak_freq: String,

    /// Loop point description; empty for non-loop services.
    pub loop_desc: String,
}

/// One record from `BusRoutes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusRouteRecord {
    /// Service number this route entry belongs to.
    pub service_no: String,

    /// Operator code.
    pub operator: String,

    /// Direction of travel, 1 or 2.
    pub direction: u8,

    /// Position of this stop along the route, starting at 1.
    pub stop_sequence: u32,

    /// Stop code the bus calls at.
    pub bus_stop_code: String,

    /// Cumulative distance from the origin in kilometres.
    pub distance: f64,

    /// First bus on weekdays as an "HHMM" string.
    #[serde(rename = "WD_FirstBus")]
    pub wd_first_bus: String,

    /// Last bus on weekdays.
    #[serde(rename = "WD_LastBus")]
    pub wd_last_bus: String,

    /// First bus on Saturdays.
    #[serde(rename = "SAT_FirstBus")]
    pub sat_first_bus: String,

    /// Last bus on Saturdays.
    #[serde(rename = "SAT_LastBus")]
    pub sat_last_bus: String,

    /// First bus on Sundays.
    #[serde(rename = "SUN_FirstBus")]
    pub sun_first_bus: String,

    /// Last bus on Sundays.
    #[serde(rename = "SUN_LastBus")]
    pub sun_last_bus: String,
}

/// Response from `v3/BusArrival`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusArrivalResponse {
    /// The stop the lookup was for.
    pub bus_stop_code: String,

    /// Services currently calling at this stop.
    #[serde(default)]
    pub services: Vec<ArrivingServiceRecord>,
}

/// One service block in an arrival response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArrivingServiceRecord {
    /// Service number.
    pub service_no: String,

    /// Operator code.
    pub operator: String,

    /// Soonest predicted bus.
    #[serde(default)]
    pub next_bus: Option<NextBusRecord>,

    /// Second predicted bus.
    #[serde(default)]
    pub next_bus2: Option<NextBusRecord>,

    /// Third predicted bus.
    #[serde(default)]
    pub next_bus3: Option<NextBusRecord>,
}

/// One predicted bus slot.
///
/// Slots without a prediction arrive as objects whose fields are all
/// empty strings, so every field here defaults rather than erroring.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NextBusRecord {
    /// First stop of this bus's trip.
    pub origin_code: String,

    /// Last stop of this bus's trip.
    pub destination_code: String,

    /// Predicted arrival, RFC 3339 with a `+08:00` offset.
    /// Empty string when there is no prediction.
    #[serde(deserialize_with = "empty_or_rfc3339")]
    pub estimated_arrival: Option<DateTime<FixedOffset>>,

    /// 1 when the prediction comes from live vehicle tracking,
    /// 0 when it is timetable-only.
    pub monitored: i32,

    /// Vehicle latitude as a decimal string; "0" or "0.0" when
    /// untracked.
    pub latitude: String,

    /// Vehicle longitude as a decimal string.
    pub longitude: String,

    /// Which visit to this stop the prediction is for.
    pub visit_number: String,

    /// Passenger load code ("SEA", "SDA", "LSD").
    pub load: String,

    /// Vehicle feature; "WAB" marks wheelchair access.
    pub feature: String,

    /// Vehicle type code ("SD", "DD", "BD").
    #[serde(rename = "Type")]
    pub bus_type: String,
}

/// Deserialize an arrival timestamp that may be an empty string.
///
/// Malformed timestamps are treated the same as missing ones; a bad
/// prediction in one slot must not fail the whole response.
fn empty_or_rfc3339<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Ok(None);
    }
    Ok(DateTime::parse_from_rfc3339(&s).ok())
}
