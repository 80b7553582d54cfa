//! Bus service types.
//!
//! A `BusService` describes one direction of a numbered service as listed
//! in the DataMall service dataset, including its scheduled headways for
//! the four daily frequency windows.

use std::fmt;

use super::StopCode;

/// A scheduled headway window in minutes.
///
/// DataMall publishes frequencies as "min-max" strings ("10-13" means a
/// bus every 10 to 13 minutes). Services without a published frequency
/// use placeholder strings such as "-"; those normalize to `(0, 0)`,
/// which this type treats as "unknown".
///
/// # Examples
///
/// ```
/// use bus_server::domain::FrequencyRange;
///
/// let freq = FrequencyRange::parse("10-13");
/// assert_eq!((freq.min, freq.max), (10, 13));
/// assert!(freq.is_known());
///
/// // Placeholder and malformed inputs become (0, 0)
/// assert_eq!(FrequencyRange::parse("-"), FrequencyRange::UNKNOWN);
/// assert_eq!(FrequencyRange::parse(""), FrequencyRange::UNKNOWN);
/// assert_eq!(FrequencyRange::parse("10"), FrequencyRange::UNKNOWN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequencyRange {
    /// Shortest headway in minutes (0 when unknown)
    pub min: u16,
    /// Longest headway in minutes (0 when unknown)
    pub max: u16,
}

impl FrequencyRange {
    /// The placeholder value for services with no published frequency.
    pub const UNKNOWN: FrequencyRange = FrequencyRange { min: 0, max: 0 };

    /// Parse a "min-max" frequency string.
    ///
    /// The input must split on `-` into exactly two parts; each part that
    /// fails to parse as a number contributes 0. Inputs that do not split
    /// into two parts at all ("", "-5-10", "10") yield `UNKNOWN`. This
    /// never fails: upstream placeholder conventions vary, and a missing
    /// frequency is not an error.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(min), Some(max), None) => FrequencyRange {
                min: min.parse().unwrap_or(0),
                max: max.parse().unwrap_or(0),
            },
            _ => FrequencyRange::UNKNOWN,
        }
    }

    /// Returns true if a frequency was actually published.
    pub fn is_known(&self) -> bool {
        *self != FrequencyRange::UNKNOWN
    }
}

impl fmt::Display for FrequencyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}-{}", self.min, self.max)
        } else {
            f.write_str("-")
        }
    }
}

/// One direction of a numbered bus service.
///
/// Services are keyed by `(service_no, direction)`: a two-way service
/// appears as two records with directions 1 and 2, a loop service as a
/// single record with direction 1 and a `loop_desc`.
#[derive(Debug, Clone, PartialEq)]
pub struct BusService {
    /// Service number as displayed on the bus ("13", "974", "NR7")
    pub service_no: String,
    /// Operator code ("SBST", "SMRT", ...)
    pub operator: String,
    /// Direction of travel, 1 or 2
    pub direction: u8,
    /// Service category ("TRUNK", "FEEDER", "EXPRESS", ...)
    pub category: String,
    /// First stop of this direction
    pub origin_code: StopCode,
    /// Last stop of this direction
    pub destination_code: StopCode,
    /// Headway during the morning peak
    pub am_peak_freq: FrequencyRange,
    /// Headway between the peaks
    pub am_offpeak_freq: FrequencyRange,
    /// Headway during the evening peak
    pub pm_peak_freq: FrequencyRange,
    /// Headway after the evening peak
    pub pm_offpeak_freq: FrequencyRange,
    /// Loop point description for loop services, absent otherwise
    pub loop_desc: Option<String>,
}

impl BusService {
    /// Returns true if this is a loop service (single direction, returns
    /// to its origin via the loop point).
    pub fn is_loop(&self) -> bool {
        self.loop_desc.is_some()
    }
}
