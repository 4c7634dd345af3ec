//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! Forward projection only, using the classic series expansion (Snyder,
//! *Map Projections: A Working Manual*, eq. 8-9 to 8-10). Accuracy is well
//! under a millimeter inside a zone, far below GPS noise.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// WGS84 semi-major axis in meters.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Scale factor on the central meridian.
const K0: f64 = 0.9996;

const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

/// Invalid UTM zone designation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid UTM zone '{0}': expected a number from 1 to 60 optionally followed by N or S")]
pub struct ZoneError(pub String);

/// A UTM zone, e.g. `13N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    number: u8,
    hemisphere: Hemisphere,
}

impl UtmZone {
    pub fn new(number: u8, hemisphere: Hemisphere) -> Result<Self, ZoneError> {
        if !(1..=60).contains(&number) {
            return Err(ZoneError(number.to_string()));
        }
        Ok(Self { number, hemisphere })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Longitude of the zone's central meridian, in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }
}

impl Default for UtmZone {
    /// Zone 13N, home of Spaceport America.
    fn default() -> Self {
        Self {
            number: 13,
            hemisphere: Hemisphere::North,
        }
    }
}

impl FromStr for UtmZone {
    type Err = ZoneError;

    /// Parses `"13"`, `"13N"` or `"19s"`. A bare number means north.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, hemisphere) = match trimmed.chars().last() {
            Some('N') | Some('n') => (&trimmed[..trimmed.len() - 1], Hemisphere::North),
            Some('S') | Some('s') => (&trimmed[..trimmed.len() - 1], Hemisphere::South),
            _ => (trimmed, Hemisphere::North),
        };
        let number: u8 = digits.parse().map_err(|_| ZoneError(s.to_string()))?;
        Self::new(number, hemisphere).map_err(|_| ZoneError(s.to_string()))
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{}", self.number, letter)
    }
}

/// Planar coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPosition {
    pub easting: f64,
    pub northing: f64,
}

/// Projects geodetic coordinates into a fixed UTM zone.
///
/// Points outside the zone are still projected against its central meridian,
/// which keeps a flight that straddles a zone boundary in one frame.
#[derive(Debug, Clone, Copy)]
pub struct UtmConverter {
    zone: UtmZone,
    e2: f64,
    ep2: f64,
}

impl UtmConverter {
    pub fn new(zone: UtmZone) -> Self {
        let e2 = FLATTENING * (2.0 - FLATTENING);
        Self {
            zone,
            e2,
            ep2: e2 / (1.0 - e2),
        }
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Project a latitude/longitude pair given in decimal degrees.
    pub fn project(&self, latitude: f64, longitude: f64) -> PlanarPosition {
        let phi = latitude.to_radians();
        let delta_lambda = (longitude - self.zone.central_meridian()).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = SEMI_MAJOR_AXIS / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = cos_phi * delta_lambda;
        let m = self.meridian_arc(phi);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let easting = K0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0)
            + FALSE_EASTING;

        let mut northing = K0
            * (m + n
                * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6 / 720.0));

        if self.zone.hemisphere == Hemisphere::South {
            northing += FALSE_NORTHING_SOUTH;
        }

        PlanarPosition { easting, northing }
    }

    /// Distance along the meridian from the equator to latitude `phi`.
    fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        SEMI_MAJOR_AXIS
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(zone: &str) -> UtmConverter {
        UtmConverter::new(zone.parse().unwrap())
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!(
            "13N".parse::<UtmZone>(),
            Ok(UtmZone::new(13, Hemisphere::North).unwrap())
        );
        assert_eq!(
            " 56s ".parse::<UtmZone>(),
            Ok(UtmZone::new(56, Hemisphere::South).unwrap())
        );
        assert_eq!("19".parse::<UtmZone>().unwrap().hemisphere(), Hemisphere::North);
        assert!("0N".parse::<UtmZone>().is_err());
        assert!("61".parse::<UtmZone>().is_err());
        assert!("thirteen".parse::<UtmZone>().is_err());
        assert!("".parse::<UtmZone>().is_err());
    }

    #[test]
    fn test_zone_display_round_trips() {
        let zone: UtmZone = "7S".parse().unwrap();
        assert_eq!(zone.to_string(), "7S");
        assert_eq!(zone.central_meridian(), -141.0);
    }

    #[test]
    fn test_equator_on_central_meridian() {
        let position = converter("31N").project(0.0, 3.0);
        assert!((position.easting - 500_000.0).abs() < 1e-6);
        assert!(position.northing.abs() < 1e-6);
    }

    #[test]
    fn test_central_meridian_northing_is_scaled_meridian_arc() {
        // Meridian arc to 45°N on WGS84 is 4 984 944.378 m.
        let position = converter("31N").project(45.0, 3.0);
        assert!((position.easting - 500_000.0).abs() < 1e-6);
        assert!((position.northing - 4_982_950.400).abs() < 0.01);
    }

    #[test]
    fn test_eastings_are_symmetric_about_central_meridian() {
        let converter = converter("13N");
        let west = converter.project(32.99, -107.5);
        let east = converter.project(32.99, -102.5);

        assert!(((west.easting - 500_000.0) + (east.easting - 500_000.0)).abs() < 1e-6);
        assert!((west.northing - east.northing).abs() < 1e-6);
        assert!(west.easting < 500_000.0);
    }

    #[test]
    fn test_spaceport_america() {
        let position = converter("13N").project(32.99, -106.97);
        assert!((position.easting - 315_935.17).abs() < 0.05);
        assert!((position.northing - 3_651_901.72).abs() < 0.05);
    }

    #[test]
    fn test_southern_hemisphere_false_northing() {
        let position = converter("56S").project(-33.8688, 151.2093);
        assert!((position.easting - 334_368.63).abs() < 0.05);
        assert!((position.northing - 6_250_948.35).abs() < 0.05);
    }
}
