//! Conversion from DataMall DTOs to domain types.
//!
//! This module normalizes the raw wire records: "min-max" frequency
//! strings become `FrequencyRange`s, "HHMM" first/last-bus strings
//! become `Option<NaiveTime>`, and the arrival endpoint's empty-string
//! padding is stripped out. Records whose stop codes fail validation
//! are skipped with a warning rather than failing the whole page.

use chrono::NaiveTime;
use tracing::warn;

use crate::domain::{
    ArrivingService, BusArrival, BusRoute, BusService, BusStop, BusType, FrequencyRange, Load,
    NextBus, StopCode,
};

use super::types::{
    ArrivingServiceRecord, BusArrivalResponse, BusRouteRecord, BusServiceRecord, BusStopRecord,
    NextBusRecord,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The arrival response names a stop code that fails validation
    #[error("invalid bus stop code: {0}")]
    InvalidStopCode(String),
}

/// Parse an "HHMM" time-of-day string.
///
/// The dataset's first/last-bus columns use four-digit times with no
/// separator ("0500", "2302"). Anything that is not exactly four
/// digits forming a valid time yields `None`; the columns also carry
/// placeholders like "-" for stops with no service that day, and those
/// are not errors.
///
/// # Examples
///
/// ```
/// use bus_server::datamall::parse_hhmm;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_hhmm("0510"), NaiveTime::from_hms_opt(5, 10, 0));
/// assert_eq!(parse_hhmm("2300"), NaiveTime::from_hms_opt(23, 0, 0));
///
/// assert_eq!(parse_hhmm("-"), None);
/// assert_eq!(parse_hhmm(""), None);
/// assert_eq!(parse_hhmm("2460"), None);
/// assert_eq!(parse_hhmm("0500-"), None);
/// ```
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    if s.len() != 4 {
        return None;
    }

    let bytes = s.as_bytes();

    let hour = parse_two_digits(&bytes[0..2])?;
    if hour > 23 {
        return None;
    }

    let minute = parse_two_digits(&bytes[2..4])?;
    if minute > 59 {
        return None;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Convert a page of bus stop records.
pub fn convert_stops(records: Vec<BusStopRecord>) -> Vec<BusStop> {
    let mut stops = Vec::with_capacity(records.len());

    for record in records {
        let code = match StopCode::parse(&record.bus_stop_code) {
            Ok(code) => code,
            Err(e) => {
                warn!(code = %record.bus_stop_code, error = %e, "skipping bus stop");
                continue;
            }
        };

        stops.push(BusStop {
            code,
            road_name: record.road_name,
            description: record.description,
            latitude: record.latitude,
            longitude: record.longitude,
        });
    }

    stops
}

/// Convert a page of bus service records.
///
/// The four frequency columns are split into `FrequencyRange`s and an
/// empty `LoopDesc` becomes `None`.
pub fn convert_services(records: Vec<BusServiceRecord>) -> Vec<BusService> {
    let mut services = Vec::with_capacity(records.len());

    for record in records {
        let origin_code = StopCode::parse(&record.origin_code);
        let destination_code = StopCode::parse(&record.destination_code);

        let (origin_code, destination_code) = match (origin_code, destination_code) {
            (Ok(origin), Ok(destination)) => (origin, destination),
            _ => {
                warn!(
                    service = %record.service_no,
                    direction = record.direction,
                    "skipping bus service with invalid terminus code"
                );
                continue;
            }
        };

        services.push(BusService {
            service_no: record.service_no,
            operator: record.operator,
            direction: record.direction,
            category: record.category,
            origin_code,
            destination_code,
            am_peak_freq: FrequencyRange::parse(&record.am_peak_freq),
            am_offpeak_freq: FrequencyRange::parse(&record.am_offpeak_freq),
            pm_peak_freq: FrequencyRange::parse(&record.pm_peak_freq),
            pm_offpeak_freq: FrequencyRange::parse(&record.pm_offpeak_freq),
            loop_desc: if record.loop_desc.is_empty() {
                None
            } else {
                Some(record.loop_desc)
            },
        });
    }

    services
}

/// Convert a page of bus route records.
///
/// First/last-bus columns go through `parse_hhmm`; an unparseable time
/// becomes `None` without dropping the record.
pub fn convert_routes(records: Vec<BusRouteRecord>) -> Vec<BusRoute> {
    let mut routes = Vec::with_capacity(records.len());

    for record in records {
        let bus_stop_code = match StopCode::parse(&record.bus_stop_code) {
            Ok(code) => code,
            Err(e) => {
                warn!(
                    service = %record.service_no,
                    code = %record.bus_stop_code,
                    error = %e,
                    "skipping route entry"
                );
                continue;
            }
        };

        routes.push(BusRoute {
            service_no: record.service_no,
            operator: record.operator,
            direction: record.direction,
            stop_sequence: record.stop_sequence,
            bus_stop_code,
            distance_km: record.distance,
            wd_first_bus: parse_hhmm(&record.wd_first_bus),
            wd_last_bus: parse_hhmm(&record.wd_last_bus),
            sat_first_bus: parse_hhmm(&record.sat_first_bus),
            sat_last_bus: parse_hhmm(&record.sat_last_bus),
            sun_first_bus: parse_hhmm(&record.sun_first_bus),
            sun_last_bus: parse_hhmm(&record.sun_last_bus),
        });
    }

    routes
}

/// Convert an arrival response.
///
/// Padded prediction slots (every field empty) are dropped; a bus with
/// a real prediction is kept even when its optional fields are blank.
pub fn convert_arrival(response: BusArrivalResponse) -> Result<BusArrival, ConversionError> {
    let bus_stop_code = StopCode::parse(&response.bus_stop_code)
        .map_err(|_| ConversionError::InvalidStopCode(response.bus_stop_code.clone()))?;

    let services = response
        .services
        .into_iter()
        .map(convert_arriving_service)
        .collect();

    Ok(BusArrival {
        bus_stop_code,
        services,
    })
}

fn convert_arriving_service(record: ArrivingServiceRecord) -> ArrivingService {
    let next_buses = [record.next_bus, record.next_bus2, record.next_bus3]
        .into_iter()
        .flatten()
        .map(convert_next_bus)
        .filter(|bus| !is_vacant(bus))
        .collect();

    ArrivingService {
        service_no: record.service_no,
        operator: record.operator,
        next_buses,
    }
}

fn convert_next_bus(record: NextBusRecord) -> NextBus {
    NextBus {
        origin_code: StopCode::parse(&record.origin_code).ok(),
        destination_code: StopCode::parse(&record.destination_code).ok(),
        estimated_arrival: record.estimated_arrival,
        monitored: record.monitored == 1,
        latitude: parse_coordinate(&record.latitude),
        longitude: parse_coordinate(&record.longitude),
        visit_number: record.visit_number.parse().ok(),
        load: Load::from_code(&record.load),
        wheelchair_accessible: record.feature == "WAB",
        bus_type: BusType::from_code(&record.bus_type),
    }
}

/// A slot the upstream padded out rather than a real prediction.
fn is_vacant(bus: &NextBus) -> bool {
    bus.estimated_arrival.is_none()
        && bus.origin_code.is_none()
        && bus.destination_code.is_none()
        && bus.latitude.is_none()
        && bus.longitude.is_none()
        && bus.load.is_none()
        && bus.bus_type.is_none()
}

/// Parse a vehicle coordinate string. The feed sends "0" or "0.0" when
/// no position is available; zero is treated as absent.
fn parse_coordinate(s: &str) -> Option<f64> {
    let value: f64 = s.parse().ok()?;
    if value == 0.0 { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Timelike};

    fn make_service_record(
        am_peak: &str,
        am_offpeak: &str,
        pm_peak: &str,
        pm_offpeak: &str,
    ) -> BusServiceRecord {
        BusServiceRecord {
            service_no: "13".to_string(),
            operator: "SBST".to_string(),
            direction: 2,
            category: "TRUNK".to_string(),
            origin_code: "94009".to_string(),
            destination_code: "55509".to_string(),
            am_peak_freq: am_peak.to_string(),
            am_offpeak_freq: am_offpeak.to_string(),
            pm_peak_freq: pm_peak.to_string(),
            pm_offpeak_freq: pm_offpeak.to_string(),
            loop_desc: String::new(),
        }
    }

    fn make_route_record(wd_first: &str, wd_last: &str) -> BusRouteRecord {
        BusRouteRecord {
            service_no: "10".to_string(),
            operator: "SBST".to_string(),
            direction: 1,
            stop_sequence: 1,
            bus_stop_code: "75009".to_string(),
            distance: 0.0,
            wd_first_bus: wd_first.to_string(),
            wd_last_bus: wd_last.to_string(),
            sat_first_bus: "0500".to_string(),
            sat_last_bus: "2300".to_string(),
            sun_first_bus: "0500".to_string(),
            sun_last_bus: "2300".to_string(),
        }
    }

    fn make_next_bus_record(eta: &str) -> NextBusRecord {
        NextBusRecord {
            origin_code: "75009".to_string(),
            destination_code: "16009".to_string(),
            estimated_arrival: if eta.is_empty() {
                None
            } else {
                Some(DateTime::parse_from_rfc3339(eta).unwrap())
            },
            monitored: 1,
            latitude: "1.3154918333333334".to_string(),
            longitude: "103.9059125".to_string(),
            visit_number: "1".to_string(),
            load: "SEA".to_string(),
            feature: "WAB".to_string(),
            bus_type: "DD".to_string(),
        }
    }

    #[test]
    fn hhmm_valid_times() {
        assert_eq!(parse_hhmm("0000"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_hhmm("0510"), NaiveTime::from_hms_opt(5, 10, 0));
        assert_eq!(parse_hhmm("2300"), NaiveTime::from_hms_opt(23, 0, 0));
        assert_eq!(parse_hhmm("2359"), NaiveTime::from_hms_opt(23, 59, 0));
    }

    #[test]
    fn hhmm_rejects_bad_input() {
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(parse_hhmm("-"), None);
        assert_eq!(parse_hhmm("520"), None);
        assert_eq!(parse_hhmm("05:10"), None);
        assert_eq!(parse_hhmm("0500-"), None);
        assert_eq!(parse_hhmm("2300wrong"), None);
        assert_eq!(parse_hhmm("2400"), None);
        assert_eq!(parse_hhmm("0560"), None);
        assert_eq!(parse_hhmm("ab00"), None);
    }

    #[test]
    fn stops_convert_in_order() {
        let records = vec![
            BusStopRecord {
                bus_stop_code: "23211".to_string(),
                road_name: "Benoi Sector".to_string(),
                description: "Mapletree Logistics Hub".to_string(),
                latitude: 1.31792061914698,
                longitude: 103.6892047185557,
            },
            BusStopRecord {
                bus_stop_code: "23219".to_string(),
                road_name: "Benoi Sector".to_string(),
                description: "Tru-Marine".to_string(),
                latitude: 1.31832727349422,
                longitude: 103.68852528629336,
            },
        ];

        let stops = convert_stops(records);

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].code.as_str(), "23211");
        assert_eq!(stops[0].description, "Mapletree Logistics Hub");
        assert_eq!(stops[1].code.as_str(), "23219");
    }

    #[test]
    fn stop_with_invalid_code_is_skipped() {
        let records = vec![
            BusStopRecord {
                bus_stop_code: "23211".to_string(),
                road_name: "Benoi Sector".to_string(),
                description: "Mapletree Logistics Hub".to_string(),
                latitude: 1.3,
                longitude: 103.7,
            },
            BusStopRecord {
                bus_stop_code: "2321".to_string(),
                road_name: "Benoi Sector".to_string(),
                description: "Short code".to_string(),
                latitude: 1.3,
                longitude: 103.7,
            },
        ];

        let stops = convert_stops(records);

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].code.as_str(), "23211");
    }

    #[test]
    fn service_frequencies_are_split() {
        let services = convert_services(vec![make_service_record(
            "10-13", "09-13", "08-10", "11-18",
        )]);

        assert_eq!(services.len(), 1);
        let service = &services[0];
        assert_eq!(service.service_no, "13");
        assert_eq!(service.origin_code.as_str(), "94009");
        assert_eq!(service.destination_code.as_str(), "55509");
        assert_eq!((service.am_peak_freq.min, service.am_peak_freq.max), (10, 13));
        assert_eq!(
            (service.am_offpeak_freq.min, service.am_offpeak_freq.max),
            (9, 13)
        );
        assert_eq!((service.pm_peak_freq.min, service.pm_peak_freq.max), (8, 10));
        assert_eq!(
            (service.pm_offpeak_freq.min, service.pm_offpeak_freq.max),
            (11, 18)
        );
        assert!(service.loop_desc.is_none());
    }

    #[test]
    fn service_placeholder_frequencies_are_unknown() {
        let services = convert_services(vec![make_service_record("-", "-", "-", "-")]);

        let service = &services[0];
        assert_eq!(service.am_peak_freq, FrequencyRange::UNKNOWN);
        assert_eq!(service.am_offpeak_freq, FrequencyRange::UNKNOWN);
        assert_eq!(service.pm_peak_freq, FrequencyRange::UNKNOWN);
        assert_eq!(service.pm_offpeak_freq, FrequencyRange::UNKNOWN);
    }

    #[test]
    fn service_with_invalid_terminus_is_skipped() {
        let mut record = make_service_record("10-13", "09-13", "08-10", "11-18");
        record.origin_code = "not-a-code".to_string();

        let services = convert_services(vec![record]);
        assert!(services.is_empty());
    }

    #[test]
    fn service_loop_desc_is_kept_when_present() {
        let mut record = make_service_record("10-13", "09-13", "08-10", "11-18");
        record.loop_desc = "Tampines Int".to_string();

        let services = convert_services(vec![record]);
        assert_eq!(services[0].loop_desc.as_deref(), Some("Tampines Int"));
        assert!(services[0].is_loop());
    }

    #[test]
    fn route_times_parse() {
        let routes = convert_routes(vec![make_route_record("0510", "2300")]);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].wd_first_bus, NaiveTime::from_hms_opt(5, 10, 0));
        assert_eq!(routes[0].wd_last_bus, NaiveTime::from_hms_opt(23, 0, 0));
    }

    #[test]
    fn route_bad_times_become_none() {
        let routes = convert_routes(vec![make_route_record("0500-", "2300wrong")]);

        assert_eq!(routes.len(), 1);
        assert!(routes[0].wd_first_bus.is_none());
        assert!(routes[0].wd_last_bus.is_none());
        // The rest of the record survives
        assert_eq!(routes[0].bus_stop_code.as_str(), "75009");
        assert_eq!(routes[0].sat_first_bus, NaiveTime::from_hms_opt(5, 0, 0));
    }

    #[test]
    fn route_with_invalid_stop_code_is_skipped() {
        let mut record = make_route_record("0500", "2300");
        record.bus_stop_code = "x".to_string();

        let routes = convert_routes(vec![record]);
        assert!(routes.is_empty());
    }

    #[test]
    fn arrival_converts_and_drops_padding() {
        let response = BusArrivalResponse {
            bus_stop_code: "75009".to_string(),
            services: vec![ArrivingServiceRecord {
                service_no: "10".to_string(),
                operator: "SBST".to_string(),
                next_bus: Some(make_next_bus_record("2024-10-12T14:23:00+08:00")),
                next_bus2: Some(make_next_bus_record("2024-10-12T14:38:00+08:00")),
                next_bus3: Some(NextBusRecord::default()),
            }],
        };

        let arrival = convert_arrival(response).unwrap();

        assert_eq!(arrival.bus_stop_code.as_str(), "75009");
        assert_eq!(arrival.services.len(), 1);

        let service = &arrival.services[0];
        assert_eq!(service.service_no, "10");
        // The all-empty third slot is dropped
        assert_eq!(service.next_buses.len(), 2);

        let first = &service.next_buses[0];
        assert_eq!(first.origin_code.unwrap().as_str(), "75009");
        assert_eq!(first.destination_code.unwrap().as_str(), "16009");
        assert!(first.monitored);
        assert!(first.wheelchair_accessible);
        assert_eq!(first.load, Some(Load::SeatsAvailable));
        assert_eq!(first.bus_type, Some(BusType::DoubleDeck));
        assert_eq!(first.visit_number, Some(1));

        // Offset survives conversion
        let eta = first.estimated_arrival.unwrap();
        assert_eq!(eta.offset().local_minus_utc(), 8 * 3600);
        assert_eq!(eta.hour(), 14);
    }

    #[test]
    fn arrival_unmonitored_bus_has_no_position() {
        let mut record = make_next_bus_record("2024-10-12T14:23:00+08:00");
        record.monitored = 0;
        record.latitude = "0.0".to_string();
        record.longitude = "0.0".to_string();

        let response = BusArrivalResponse {
            bus_stop_code: "75009".to_string(),
            services: vec![ArrivingServiceRecord {
                service_no: "10".to_string(),
                operator: "SBST".to_string(),
                next_bus: Some(record),
                next_bus2: None,
                next_bus3: None,
            }],
        };

        let arrival = convert_arrival(response).unwrap();
        let bus = &arrival.services[0].next_buses[0];

        assert!(!bus.monitored);
        assert!(bus.latitude.is_none());
        assert!(bus.longitude.is_none());
        // Still a real prediction
        assert!(bus.estimated_arrival.is_some());
    }

    #[test]
    fn arrival_with_invalid_stop_code_fails() {
        let response = BusArrivalResponse {
            bus_stop_code: "nope".to_string(),
            services: vec![],
        };

        let err = convert_arrival(response).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn arrival_unknown_codes_become_none() {
        let mut record = make_next_bus_record("2024-10-12T14:23:00+08:00");
        record.load = "XYZ".to_string();
        record.bus_type = "??".to_string();
        record.feature = String::new();

        let response = BusArrivalResponse {
            bus_stop_code: "75009".to_string(),
            services: vec![ArrivingServiceRecord {
                service_no: "10".to_string(),
                operator: "SBST".to_string(),
                next_bus: Some(record),
                next_bus2: None,
                next_bus3: None,
            }],
        };

        let arrival = convert_arrival(response).unwrap();
        let bus = &arrival.services[0].next_buses[0];

        assert!(bus.load.is_none());
        assert!(bus.bus_type.is_none());
        assert!(!bus.wheelchair_accessible);
    }
}
