//! Bus stop code types.

use std::fmt;

/// Error returned when parsing an invalid bus stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bus stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// A valid 5-digit bus stop code.
///
/// LTA bus stop codes are always 5 ASCII digits, with leading zeros
/// significant ("01012" and "1012" are different codes). This type
/// guarantees that any `StopCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopCode;
///
/// let code = StopCode::parse("75009").unwrap();
/// assert_eq!(code.as_str(), "75009");
///
/// // Leading zeros are preserved
/// let code = StopCode::parse("01012").unwrap();
/// assert_eq!(code.as_str(), "01012");
///
/// // Wrong length is rejected
/// assert!(StopCode::parse("7500").is_err());
/// assert!(StopCode::parse("750090").is_err());
///
/// // Non-digits are rejected
/// assert!(StopCode::parse("75O09").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopCode([u8; 5]);

impl StopCode {
    /// Parse a bus stop code from a string.
    ///
    /// The input must be exactly 5 ASCII digits (0-9).
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidStopCode {
                reason: "must be exactly 5 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_digit() {
                return Err(InvalidStopCode {
                    reason: "must be ASCII digits 0-9",
                });
            }
        }

        Ok(StopCode([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]))
    }

    /// Returns the stop code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII digits
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.as_str())
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bus stop with its location and road description.
///
/// Produced by the stops crawl and keyed by stop code in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct BusStop {
    /// 5-digit stop code
    pub code: StopCode,
    /// Road the stop is on
    pub road_name: String,
    /// Human-readable stop description (usually the nearest landmark)
    pub description: String,
    /// WGS84 latitude
    pub latitude: f64,
    /// WGS84 longitude
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StopCode::parse("75009").is_ok());
        assert!(StopCode::parse("00000").is_ok());
        assert!(StopCode::parse("99999").is_ok());
        assert!(StopCode::parse("01012").is_ok());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StopCode::parse("").is_err());
        assert!(StopCode::parse("7").is_err());
        assert!(StopCode::parse("7500").is_err());
        assert!(StopCode::parse("750090").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(StopCode::parse("75O09").is_err());
        assert!(StopCode::parse("7500a").is_err());
        assert!(StopCode::parse("75 09").is_err());
        assert!(StopCode::parse("75-09").is_err());
        assert!(StopCode::parse("７５００９").is_err());
    }

    #[test]
    fn as_str_roundtrip() {
        let code = StopCode::parse("75009").unwrap();
        assert_eq!(code.as_str(), "75009");
    }

    #[test]
    fn leading_zeros_preserved() {
        let code = StopCode::parse("00481").unwrap();
        assert_eq!(code.as_str(), "00481");
        assert_eq!(code.to_string(), "00481");
    }

    #[test]
    fn display() {
        let code = StopCode::parse("23211").unwrap();
        assert_eq!(format!("{}", code), "23211");
    }

    #[test]
    fn debug() {
        let code = StopCode::parse("23219").unwrap();
        assert_eq!(format!("{:?}", code), "StopCode(23219)");
    }

    #[test]
    fn equality() {
        let a = StopCode::parse("75009").unwrap();
        let b = StopCode::parse("75009").unwrap();
        let c = StopCode::parse("75019").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_matches_string_order() {
        let a = StopCode::parse("01012").unwrap();
        let b = StopCode::parse("75009").unwrap();
        assert!(a < b);
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StopCode::parse("75009").unwrap());
        assert!(set.contains(&StopCode::parse("75009").unwrap()));
        assert!(!set.contains(&StopCode::parse("23211").unwrap()));
    }
}
