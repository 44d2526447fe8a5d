//! Value types flowing through the guidance pipeline
//!
//! ```text
//! OrientationSample ──→ OrientationFilter ──→ Orientation (smoothed) ──┐
//!                                                                      ├─→ GuidanceResult
//! GeoPosition ──→ MoonEphemeris ──→ CelestialPosition ─────────────────┘
//! ```
//!
//! All angles are degrees. Absence of a sensor axis is modelled with
//! `Option`, never with `0.0`: a compass that has not reported yet is not
//! pointing north.

use crate::time::Timestamp;

/// Device orientation in degrees
///
/// - `heading`: compass heading, `[0, 360)`, north = 0, clockwise
/// - `pitch`: front-to-back tilt; 90° = upright facing the horizon, 0° = flat facing up
/// - `roll`: left-to-right tilt; carried through smoothing but unused by guidance
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub heading: Option<f32>,
    pub pitch: Option<f32>,
    pub roll: Option<f32>,
}

impl Orientation {
    /// Orientation with every axis unknown
    pub const UNKNOWN: Self = Self { heading: None, pitch: None, roll: None };

    pub const fn new(heading: Option<f32>, pitch: Option<f32>, roll: Option<f32>) -> Self {
        Self { heading, pitch, roll }
    }

    /// Fully known orientation
    pub const fn known(heading: f32, pitch: f32, roll: f32) -> Self {
        Self { heading: Some(heading), pitch: Some(pitch), roll: Some(roll) }
    }

    /// Heading and pitch, if both are known and finite
    ///
    /// These are the two axes guidance needs; a non-finite reading is treated
    /// as unknown.
    pub fn aim(&self) -> Option<(f32, f32)> {
        match (self.heading, self.pitch) {
            (Some(h), Some(p)) if h.is_finite() && p.is_finite() => Some((h, p)),
            _ => None,
        }
    }
}

/// A raw orientation reading as delivered by the device sensor stream
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationSample {
    pub orientation: Orientation,
    pub timestamp: Timestamp,
}

impl OrientationSample {
    pub const fn new(orientation: Orientation, timestamp: Timestamp) -> Self {
        Self { orientation, timestamp }
    }
}

/// Observer position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude within [-90, 90], longitude within [-180, 180], both finite
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A location fix as delivered by the location watch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationFix {
    pub position: GeoPosition,
    /// When the position was measured (not when it was delivered)
    pub measured_at: Timestamp,
}

impl LocationFix {
    pub const fn new(position: GeoPosition, measured_at: Timestamp) -> Self {
        Self { position, measured_at }
    }
}

/// Moon position in the observer's horizontal frame
///
/// - `azimuth`: `[0, 360)`, north-referenced, clockwise
/// - `altitude`: `[-90, 90]`, negative below the horizon
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CelestialPosition {
    pub azimuth: f32,
    pub altitude: f32,
}

impl CelestialPosition {
    pub const fn new(azimuth: f32, altitude: f32) -> Self {
        Self { azimuth, altitude }
    }

    pub fn is_finite(&self) -> bool {
        self.azimuth.is_finite() && self.altitude.is_finite()
    }

    /// Whether the Moon is above the horizon
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Moon state computed for one observer position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoonSnapshot {
    pub position: CelestialPosition,
    /// Illuminated fraction of the disc, `[0, 1]`
    pub illumination: f32,
    /// Observer position the snapshot was computed for
    pub observer: GeoPosition,
    pub computed_at: Timestamp,
}
