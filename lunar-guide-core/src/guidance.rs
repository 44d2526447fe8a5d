//! Guidance Calculator
//!
//! ## Overview
//!
//! Turns a smoothed device orientation and the Moon's horizontal position
//! into screen guidance:
//!
//! ```text
//!                 ┌────────────────────────────┐
//! heading, pitch ─┤ ΔAz  = wrap180(az - heading) ├─→ in view?   |ΔAz| < 5 ∧ |ΔAlt| < 5
//! azimuth, alt  ──┤ ΔAlt = alt - (90 - pitch)    ├─→ marker     (x, y) ∈ [5, 95]²
//!                 └────────────────────────────┘─→ arrow      atan2(-ΔAlt, ΔAz) + 90
//! ```
//!
//! ## Device Altitude
//!
//! The camera's aim altitude comes from pitch as `90 - pitch`: a device held
//! upright (pitch 90°) looks at the horizon, a device lying flat (pitch 0°)
//! looks at the zenith.
//!
//! ## Screen Mapping
//!
//! Angular error is scaled so that half the field of view spans half the
//! screen, then clamped to the screen margin. The marker therefore sits at
//! the edge pointing the right way even when the Moon is behind the user.
//! The pointer arrow is computed independently of the clamp and keeps
//! rotating continuously far outside the field of view.
//!
//! ## Neutral Result
//!
//! Sensor data is sparse at startup. Missing heading, pitch, or Moon
//! position is not an error: the calculator returns
//! [`GuidanceResult::NEUTRAL`] (not in view, marker centered, no rotation).
//! Non-finite inputs are treated the same way.
//!
//! ## Usage Example
//!
//! ```rust
//! use lunar_guide_core::guidance::GuidanceCalculator;
//! use lunar_guide_core::ephemeris::FixedEphemeris;
//! use lunar_guide_core::orientation::{GeoPosition, Orientation};
//!
//! let calculator = GuidanceCalculator::with_defaults(FixedEphemeris::new(200.0, 30.0));
//! let moon = calculator.moon_snapshot(GeoPosition::new(51.5, -0.1), 0);
//!
//! let aim = Orientation::known(200.0, 60.0, 0.0);
//! let result = calculator.compute(&aim, Some(&moon.position));
//! assert!(result.in_view);
//! ```

use core::fmt;

use crate::{
    angle::{atan2_deg, wrap_180},
    config::GuidanceConfig,
    constants::guidance::{DEVICE_UPRIGHT_PITCH_DEG, POINTER_UP_OFFSET_DEG, SCREEN_CENTER_PCT, SCREEN_MARGIN_PCT},
    ephemeris,
    errors::ConfigResult,
    orientation::{CelestialPosition, GeoPosition, MoonSnapshot, Orientation},
    time::Timestamp,
    traits::MoonEphemeris,
};

/// Screen guidance derived from one orientation and one Moon position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuidanceResult {
    /// Whether both inputs were present; false for the neutral result
    pub ready: bool,
    /// Moon within the view threshold on both axes
    pub in_view: bool,
    /// Signed azimuth error in `[-180, 180]`; positive means turn right
    pub delta_az: f32,
    /// Signed altitude error; positive means tilt up
    pub delta_alt: f32,
    /// Marker x position, percent of screen width
    pub screen_x: f32,
    /// Marker y position, percent of screen height
    pub screen_y: f32,
    /// Arrow rotation in degrees, clockwise, 0 = pointing up
    pub pointer_rotation_deg: f32,
}

impl GuidanceResult {
    /// "Not yet ready": nothing in view, marker centered, no rotation
    pub const NEUTRAL: Self = Self {
        ready: false,
        in_view: false,
        delta_az: 0.0,
        delta_alt: 0.0,
        screen_x: SCREEN_CENTER_PCT,
        screen_y: SCREEN_CENTER_PCT,
        pointer_rotation_deg: 0.0,
    };

    /// Where the presentation layer should draw the marker
    ///
    /// Snaps to the center once the Moon is in view.
    pub fn marker_position(&self) -> (f32, f32) {
        if self.in_view {
            (SCREEN_CENTER_PCT, SCREEN_CENTER_PCT)
        } else {
            (self.screen_x, self.screen_y)
        }
    }

    /// Turn/tilt instructions for errors larger than `threshold_deg`
    pub fn hint(&self, threshold_deg: f32) -> DirectionHint {
        if !self.ready || self.in_view {
            return DirectionHint::NONE;
        }

        let horizontal = if self.delta_az > threshold_deg {
            Some(Turn::Right)
        } else if self.delta_az < -threshold_deg {
            Some(Turn::Left)
        } else {
            None
        };

        let vertical = if self.delta_alt > threshold_deg {
            Some(Tilt::Up)
        } else if self.delta_alt < -threshold_deg {
            Some(Tilt::Down)
        } else {
            None
        };

        DirectionHint { horizontal, vertical }
    }
}

impl Default for GuidanceResult {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Horizontal instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Left,
    Right,
}

/// Vertical instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tilt {
    Up,
    Down,
}

/// Human-readable direction hint, e.g. "Turn Right & Tilt Up"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionHint {
    pub horizontal: Option<Turn>,
    pub vertical: Option<Tilt>,
}

impl DirectionHint {
    pub const NONE: Self = Self { horizontal: None, vertical: None };

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

impl fmt::Display for DirectionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let turn = self.horizontal.map(|t| match t {
            Turn::Left => "Turn Left",
            Turn::Right => "Turn Right",
        });
        let tilt = self.vertical.map(|t| match t {
            Tilt::Up => "Tilt Up",
            Tilt::Down => "Tilt Down",
        });

        match (turn, tilt) {
            (Some(turn), Some(tilt)) => write!(f, "{turn} & {tilt}"),
            (Some(only), None) | (None, Some(only)) => f.write_str(only),
            (None, None) => Ok(()),
        }
    }
}

/// Map an angular error to clamped screen percentages
///
/// NaN maps to the screen center; infinities clamp to the margin like any
/// other out-of-range error. An unvalidated margin is held to `[0, 50]`, NaN
/// falls back to the default margin.
pub fn screen_position(delta_az: f32, delta_alt: f32, config: &GuidanceConfig) -> (f32, f32) {
    let half = SCREEN_CENTER_PCT;
    let margin = if config.screen_margin_pct.is_nan() {
        SCREEN_MARGIN_PCT
    } else {
        config.screen_margin_pct.max(0.0).min(half)
    };
    let lo = margin;
    let hi = 100.0 - margin;

    let x = half + delta_az / (config.horizontal_fov_deg / 2.0) * half;
    let y = half - delta_alt / (config.vertical_fov_deg / 2.0) * half;

    let clamp = |v: f32| if v.is_nan() { half } else { v.max(lo).min(hi) };
    (clamp(x), clamp(y))
}

/// Compute guidance from already-smoothed orientation and a Moon position
pub fn compute_guidance(
    config: &GuidanceConfig,
    orientation: &Orientation,
    celestial: Option<&CelestialPosition>,
) -> GuidanceResult {
    let (heading, pitch) = match orientation.aim() {
        Some(aim) => aim,
        None => return GuidanceResult::NEUTRAL,
    };
    let moon = match celestial {
        Some(moon) if moon.is_finite() => moon,
        _ => return GuidanceResult::NEUTRAL,
    };

    let delta_az = wrap_180(moon.azimuth - heading);
    let device_altitude = DEVICE_UPRIGHT_PITCH_DEG - pitch;
    let delta_alt = moon.altitude - device_altitude;

    let threshold = config.view_threshold_deg;
    let in_view = libm::fabsf(delta_az) < threshold && libm::fabsf(delta_alt) < threshold;

    let (screen_x, screen_y) = screen_position(delta_az, delta_alt, config);
    let pointer_rotation_deg = atan2_deg(-delta_alt, delta_az) + POINTER_UP_OFFSET_DEG;

    GuidanceResult {
        ready: true,
        in_view,
        delta_az,
        delta_alt,
        screen_x,
        screen_y,
        pointer_rotation_deg,
    }
}

/// Guidance calculator bound to an ephemeris capability
#[derive(Debug, Clone)]
pub struct GuidanceCalculator<E> {
    config: GuidanceConfig,
    ephemeris: E,
}

impl<E: MoonEphemeris> GuidanceCalculator<E> {
    /// Create a calculator from a validated config
    pub fn new(ephemeris: E, config: GuidanceConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config, ephemeris })
    }

    /// Calculator with the default camera geometry
    pub fn with_defaults(ephemeris: E) -> Self {
        Self { config: GuidanceConfig::default(), ephemeris }
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Moon position and illumination for an observer at a point in time
    pub fn moon_snapshot(&self, observer: GeoPosition, at: Timestamp) -> MoonSnapshot {
        ephemeris::snapshot(&self.ephemeris, observer, at)
    }

    /// Guidance for a smoothed orientation against a Moon position
    pub fn compute(&self, orientation: &Orientation, celestial: Option<&CelestialPosition>) -> GuidanceResult {
        compute_guidance(&self.config, orientation, celestial)
    }
}
