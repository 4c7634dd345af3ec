//! GPS fix validation.

use crate::packet::PacketVersion;

/// Decides whether a converted coordinate pair is a usable fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixValidator {
    /// 2017 frames carry no fix quality; any finite pair is accepted.
    Legacy,
    /// Finite, within range, and not the `(0, 0)` no-fix placeholder.
    CoordinateSanity,
}

impl FixValidator {
    pub fn for_version(version: PacketVersion) -> Self {
        match version {
            PacketVersion::V2017 => Self::Legacy,
            PacketVersion::V2018 | PacketVersion::V2019 => Self::CoordinateSanity,
        }
    }

    /// `latitude` and `longitude` are in decimal degrees.
    pub fn is_valid(self, latitude: f64, longitude: f64) -> bool {
        let finite = latitude.is_finite() && longitude.is_finite();
        match self {
            Self::Legacy => finite,
            Self::CoordinateSanity => {
                finite
                    && latitude.abs() <= 90.0
                    && longitude.abs() <= 180.0
                    && !(latitude == 0.0 && longitude == 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_accepts_any_finite_pair() {
        let validator = FixValidator::Legacy;
        assert!(validator.is_valid(0.0, 0.0));
        assert!(validator.is_valid(3259.4, 10657.9));
        assert!(!validator.is_valid(f64::NAN, 1.0));
        assert!(!validator.is_valid(1.0, f64::INFINITY));
    }

    #[test]
    fn test_coordinate_sanity() {
        let validator = FixValidator::CoordinateSanity;
        assert!(validator.is_valid(32.99, -106.97));
        assert!(validator.is_valid(-90.0, 180.0));
        assert!(!validator.is_valid(0.0, 0.0));
        assert!(!validator.is_valid(90.5, 10.0));
        assert!(!validator.is_valid(10.0, -181.0));
        assert!(!validator.is_valid(f64::NAN, -106.97));
    }

    #[test]
    fn test_validator_per_version() {
        assert_eq!(
            FixValidator::for_version(PacketVersion::V2017),
            FixValidator::Legacy
        );
        assert_eq!(
            FixValidator::for_version(PacketVersion::V2018),
            FixValidator::CoordinateSanity
        );
    }
}
