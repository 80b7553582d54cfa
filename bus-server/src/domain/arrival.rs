//! Live bus arrival types.
//!
//! An arrival lookup returns, for one stop, the services calling there
//! and up to three predicted buses per service. Unlike the reference
//! datasets these are real-time values and are never stored; they pass
//! straight through to the serving layer.

use chrono::{DateTime, FixedOffset, Utc};

use super::StopCode;

/// Passenger load of an approaching bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    /// Seats available ("SEA")
    SeatsAvailable,
    /// Standing room only ("SDA")
    StandingAvailable,
    /// Nearly full ("LSD")
    LimitedStanding,
}

impl Load {
    /// Map a DataMall load code. Unknown or empty codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SEA" => Some(Load::SeatsAvailable),
            "SDA" => Some(Load::StandingAvailable),
            "LSD" => Some(Load::LimitedStanding),
            _ => None,
        }
    }
}

/// Vehicle type of an approaching bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusType {
    /// Single deck ("SD")
    SingleDeck,
    /// Double deck ("DD")
    DoubleDeck,
    /// Articulated ("BD")
    Bendy,
}

impl BusType {
    /// Map a DataMall vehicle type code. Unknown or empty codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SD" => Some(BusType::SingleDeck),
            "DD" => Some(BusType::DoubleDeck),
            "BD" => Some(BusType::Bendy),
            _ => None,
        }
    }
}

/// One predicted bus on an arriving service.
///
/// Every field may be absent: the upstream feed pads predictions with
/// empty strings, and predictions for unmonitored buses carry schedule
/// data only.
#[derive(Debug, Clone, PartialEq)]
pub struct NextBus {
    /// First stop of the bus's trip
    pub origin_code: Option<StopCode>,
    /// Last stop of the bus's trip
    pub destination_code: Option<StopCode>,
    /// Predicted arrival at the looked-up stop
    pub estimated_arrival: Option<DateTime<FixedOffset>>,
    /// True when the prediction comes from live vehicle tracking rather
    /// than the timetable
    pub monitored: bool,
    /// Current vehicle latitude, if tracked
    pub latitude: Option<f64>,
    /// Current vehicle longitude, if tracked
    pub longitude: Option<f64>,
    /// Which visit to this stop the prediction is for (loop services
    /// pass a stop more than once)
    pub visit_number: Option<u32>,
    /// Passenger load
    pub load: Option<Load>,
    /// Wheelchair accessible
    pub wheelchair_accessible: bool,
    /// Vehicle type
    pub bus_type: Option<BusType>,
}

impl NextBus {
    /// Whole minutes until the predicted arrival, measured from `now`.
    ///
    /// Returns `None` when there is no prediction; clamps to 0 for buses
    /// that are due or already past the prediction.
    pub fn minutes_from(&self, now: DateTime<Utc>) -> Option<i64> {
        let eta = self.estimated_arrival?;
        Some((eta.with_timezone(&Utc) - now).num_minutes().max(0))
    }
}

/// One service with live predictions at a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivingService {
    /// Service number
    pub service_no: String,
    /// Operator code
    pub operator: String,
    /// Up to three upcoming buses, soonest first
    pub next_buses: Vec<NextBus>,
}

/// Live arrival snapshot for one stop.
#[derive(Debug, Clone, PartialEq)]
pub struct BusArrival {
    /// The stop the lookup was for
    pub bus_stop_code: StopCode,
    /// Services currently predicted to call here
    pub services: Vec<ArrivingService>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bus_at(eta: Option<DateTime<FixedOffset>>) -> NextBus {
        NextBus {
            origin_code: None,
            destination_code: None,
            estimated_arrival: eta,
            monitored: true,
            latitude: None,
            longitude: None,
            visit_number: Some(1),
            load: Some(Load::SeatsAvailable),
            wheelchair_accessible: true,
            bus_type: Some(BusType::DoubleDeck),
        }
    }

    #[test]
    fn load_codes() {
        assert_eq!(Load::from_code("SEA"), Some(Load::SeatsAvailable));
        assert_eq!(Load::from_code("SDA"), Some(Load::StandingAvailable));
        assert_eq!(Load::from_code("LSD"), Some(Load::LimitedStanding));
        assert_eq!(Load::from_code(""), None);
        assert_eq!(Load::from_code("sea"), None);
        assert_eq!(Load::from_code("FULL"), None);
    }

    #[test]
    fn bus_type_codes() {
        assert_eq!(BusType::from_code("SD"), Some(BusType::SingleDeck));
        assert_eq!(BusType::from_code("DD"), Some(BusType::DoubleDeck));
        assert_eq!(BusType::from_code("BD"), Some(BusType::Bendy));
        assert_eq!(BusType::from_code(""), None);
        assert_eq!(BusType::from_code("TRAM"), None);
    }

    #[test]
    fn minutes_from_future_eta() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let eta = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 20, 7, 30)
            .unwrap();

        let bus = bus_at(Some(eta));
        assert_eq!(bus.minutes_from(now), Some(7));
    }

    #[test]
    fn minutes_from_past_eta_clamps_to_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let eta = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 19, 55, 0)
            .unwrap();

        let bus = bus_at(Some(eta));
        assert_eq!(bus.minutes_from(now), Some(0));
    }

    #[test]
    fn minutes_from_no_eta() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let bus = bus_at(None);
        assert_eq!(bus.minutes_from(now), None);
    }
}
