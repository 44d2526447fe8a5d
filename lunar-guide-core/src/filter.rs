//! Orientation Smoothing Filter
//!
//! ## Overview
//!
//! Phone orientation sensors report compass heading and tilt at display rate
//! with a few degrees of jitter. Feeding raw samples straight into guidance
//! makes the target marker shake. This filter is an exponential moving
//! average per axis:
//!
//! ```text
//! smoothed' = smoothed + (raw - smoothed)·α
//! ```
//!
//! ## Heading Wraparound
//!
//! Heading is an angle on a circle. A plain average of 350° and 10° is 180°,
//! the exact opposite direction. The heading step therefore uses the shortest
//! signed difference and re-normalizes:
//!
//! ```text
//! d         = wrap180(raw - smoothed)          // 10 - 350 = -340 → +20
//! smoothed' = (smoothed + d·α + 360) mod 360   // 350 + 1 = 351
//! ```
//!
//! ## Baseline Rules
//!
//! There is no smoothing without a valid baseline: if the previous estimate
//! is absent, or either the previous estimate or the new sample lacks heading
//! or pitch, the raw sample passes through unchanged and becomes the new
//! baseline. Roll is carried for completeness; unknown roll reads as 0°.
//!
//! ## Session Scope
//!
//! The filter is an owned value inside the session. [`OrientationFilter::reset`]
//! drops the baseline, so a new search never inherits a previous search's
//! smoothing memory.

use crate::{
    angle::{lerp, normalize_360, wrap_180, FULL_TURN_DEG},
    config::FilterConfig,
    constants::filter::UNKNOWN_ROLL_DEG,
    errors::ConfigResult,
    orientation::Orientation,
};

/// Exponential smoothing filter for device orientation
#[derive(Debug, Clone)]
pub struct OrientationFilter {
    alpha: f32,
    smoothed: Option<Orientation>,
    samples: u32,
}

impl Default for OrientationFilter {
    fn default() -> Self {
        Self {
            alpha: FilterConfig::default().alpha,
            smoothed: None,
            samples: 0,
        }
    }
}

impl OrientationFilter {
    /// Create a filter from a validated config
    pub fn new(config: FilterConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            ..Self::default()
        })
    }

    /// Smoothing factor in use
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Feed one raw sample and return the new smoothed orientation
    pub fn update(&mut self, raw: Orientation) -> Orientation {
        self.samples = self.samples.saturating_add(1);

        let next = match self.smoothed {
            Some(prev) => match (prev.aim(), raw.aim()) {
                (Some((prev_heading, prev_pitch)), Some((raw_heading, raw_pitch))) => {
                    self.blend(prev, prev_heading, prev_pitch, raw, raw_heading, raw_pitch)
                }
                _ => raw,
            },
            None => raw,
        };

        self.smoothed = Some(next);
        next
    }

    /// Current smoothed estimate, if any sample has been seen since the last reset
    pub fn current(&self) -> Option<Orientation> {
        self.smoothed
    }

    /// Samples processed since the last reset
    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    /// Drop the baseline; the next sample is adopted raw
    pub fn reset(&mut self) {
        self.smoothed = None;
        self.samples = 0;
    }

    fn blend(
        &self,
        prev: Orientation,
        prev_heading: f32,
        prev_pitch: f32,
        raw: Orientation,
        raw_heading: f32,
        raw_pitch: f32,
    ) -> Orientation {
        let delta = wrap_180(raw_heading - prev_heading);
        let heading = normalize_360(prev_heading + delta * self.alpha + FULL_TURN_DEG);
        let pitch = lerp(prev_pitch, raw_pitch, self.alpha);
        let roll = lerp(
            prev.roll.unwrap_or(UNKNOWN_ROLL_DEG),
            raw.roll.unwrap_or(UNKNOWN_ROLL_DEG),
            self.alpha,
        );

        Orientation::known(heading, pitch, roll)
    }
}
