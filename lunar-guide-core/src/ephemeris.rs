//! Moon ephemeris adapters
//!
//! The ephemeris algorithm itself is an external capability (see
//! [`MoonEphemeris`]). This module only converts its output into the
//! crate's conventions and provides a deterministic stand-in for tests and
//! demos.
//!
//! ## Azimuth Convention
//!
//! Ephemeris libraries in the SunCalc family report azimuth in radians
//! measured from south, increasing toward west. Guidance compares azimuth
//! against a compass heading (north = 0°, clockwise), so:
//!
//! ```text
//! azimuth°  = (rad·180/π + 180) mod 360
//! altitude° =  rad·180/π
//! ```

use crate::{
    angle::{normalize_360, to_degrees_f64, HALF_TURN_DEG},
    orientation::{CelestialPosition, GeoPosition, MoonSnapshot},
    time::Timestamp,
    traits::{HorizontalCoordinates, MoonEphemeris},
};

/// Convert south-referenced radians to north-referenced degrees
pub fn celestial_from_horizontal(raw: HorizontalCoordinates) -> CelestialPosition {
    let azimuth = normalize_360((to_degrees_f64(raw.azimuth_rad) + HALF_TURN_DEG as f64) as f32);
    let altitude = to_degrees_f64(raw.altitude_rad) as f32;
    CelestialPosition::new(azimuth, altitude)
}

/// Compute a full Moon snapshot for an observer
///
/// Illumination is clamped to `[0, 1]`; a non-finite value reads as 0.
pub fn snapshot<E: MoonEphemeris + ?Sized>(
    ephemeris: &E,
    observer: GeoPosition,
    at: Timestamp,
) -> MoonSnapshot {
    let raw = ephemeris.position_of(at, observer.latitude, observer.longitude);
    let illumination = ephemeris.illumination_of(at);
    let illumination = if illumination.is_finite() {
        illumination.clamp(0.0, 1.0) as f32
    } else {
        0.0
    };

    MoonSnapshot {
        position: celestial_from_horizontal(raw),
        illumination,
        observer,
        computed_at: at,
    }
}

/// Ephemeris that always reports the same Moon
///
/// Takes north-referenced degrees and hands them out in the south-referenced
/// radian convention real providers use, so it exercises the same conversion
/// path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEphemeris {
    azimuth_deg: f64,
    altitude_deg: f64,
    illumination: f64,
}

impl FixedEphemeris {
    pub fn new(azimuth_deg: f64, altitude_deg: f64) -> Self {
        Self { azimuth_deg, altitude_deg, illumination: 1.0 }
    }

    pub fn with_illumination(mut self, fraction: f64) -> Self {
        self.illumination = fraction;
        self
    }
}

impl MoonEphemeris for FixedEphemeris {
    fn position_of(&self, _timestamp: Timestamp, _latitude: f64, _longitude: f64) -> HorizontalCoordinates {
        HorizontalCoordinates {
            azimuth_rad: (self.azimuth_deg - 180.0).to_radians(),
            altitude_rad: self.altitude_deg.to_radians(),
        }
    }

    fn illumination_of(&self, _timestamp: Timestamp) -> f64 {
        self.illumination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

    #[test]
    fn south_referenced_zero_is_due_south() {
        let pos = celestial_from_horizontal(HorizontalCoordinates {
            azimuth_rad: 0.0,
            altitude_rad: FRAC_PI_6,
        });
        assert!((pos.azimuth - 180.0).abs() < 1e-4);
        assert!((pos.altitude - 30.0).abs() < 1e-4);
    }

    #[test]
    fn west_and_north_map_correctly() {
        let west = celestial_from_horizontal(HorizontalCoordinates { azimuth_rad: FRAC_PI_2, altitude_rad: 0.0 });
        assert!((west.azimuth - 270.0).abs() < 1e-4);

        let north = celestial_from_horizontal(HorizontalCoordinates { azimuth_rad: PI, altitude_rad: 0.0 });
        assert!(north.azimuth.abs() < 1e-4);
    }

    #[test]
    fn negative_altitude_is_below_horizon() {
        let pos = celestial_from_horizontal(HorizontalCoordinates { azimuth_rad: 0.0, altitude_rad: -0.1 });
        assert!(!pos.is_above_horizon());
    }

    #[test]
    fn fixed_ephemeris_round_trips_through_conversion() {
        let eph = FixedEphemeris::new(200.0, 30.0).with_illumination(0.75);
        let snap = snapshot(&eph, GeoPosition::new(48.2, 16.4), 1_000);

        assert!((snap.position.azimuth - 200.0).abs() < 1e-3);
        assert!((snap.position.altitude - 30.0).abs() < 1e-3);
        assert_eq!(snap.illumination, 0.75);
        assert_eq!(snap.computed_at, 1_000);
    }

    #[test]
    fn illumination_is_clamped() {
        let eph = FixedEphemeris::new(0.0, 0.0).with_illumination(1.7);
        assert_eq!(snapshot(&eph, GeoPosition::new(0.0, 0.0), 0).illumination, 1.0);

        let eph = FixedEphemeris::new(0.0, 0.0).with_illumination(f64::NAN);
        assert_eq!(snapshot(&eph, GeoPosition::new(0.0, 0.0), 0).illumination, 0.0);
    }
}
