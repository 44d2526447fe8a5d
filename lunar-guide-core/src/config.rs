//! Configuration for the guidance pipeline
//!
//! Each component takes its own small config struct; [`GuideConfig`] bundles
//! them for hosts that load everything from one document.
//!
//! ```rust
//! use lunar_guide_core::config::{GuideConfig, FilterConfig};
//!
//! let config = GuideConfig::default()
//!     .with_filter(FilterConfig::default().with_alpha(0.1));
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `std` feature, configs deserialize from JSON. Missing fields take
//! their defaults, so a document only needs to name what it overrides:
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use lunar_guide_core::config::GuideConfig;
//!
//! let config = GuideConfig::from_json_str(r#"{ "guidance": { "view_threshold_deg": 3.0 } }"#).unwrap();
//! assert_eq!(config.guidance.view_threshold_deg, 3.0);
//! assert_eq!(config.guidance.horizontal_fov_deg, 60.0);
//! # }
//! ```

use crate::{
    constants::{
        filter::{DEFAULT_SMOOTHING_ALPHA, MAX_SMOOTHING_ALPHA, MIN_SMOOTHING_ALPHA},
        guidance::{HORIZONTAL_FOV_DEG, SCREEN_MARGIN_PCT, VERTICAL_FOV_DEG, VIEW_THRESHOLD_DEG},
        time::{LOCATION_TIMEOUT_MS, MAX_FIX_AGE_MS},
    },
    errors::{ConfigError, ConfigResult},
};

/// Orientation smoothing configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Smoothing factor in (0, 1]; lower is smoother and slower
    pub alpha: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { alpha: DEFAULT_SMOOTHING_ALPHA }
    }
}

impl FilterConfig {
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let alpha = self.alpha;
        if !alpha.is_finite() || alpha <= MIN_SMOOTHING_ALPHA || alpha > MAX_SMOOTHING_ALPHA {
            return Err(ConfigError::InvalidAlpha { alpha });
        }
        Ok(())
    }
}

/// Guidance geometry configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuidanceConfig {
    /// Half-width of the in-view cone on each axis (degrees)
    pub view_threshold_deg: f32,
    /// Camera horizontal field of view (degrees)
    pub horizontal_fov_deg: f32,
    /// Camera vertical field of view (degrees)
    pub vertical_fov_deg: f32,
    /// Minimum distance of the target marker from each screen edge (percent)
    pub screen_margin_pct: f32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            view_threshold_deg: VIEW_THRESHOLD_DEG,
            horizontal_fov_deg: HORIZONTAL_FOV_DEG,
            vertical_fov_deg: VERTICAL_FOV_DEG,
            screen_margin_pct: SCREEN_MARGIN_PCT,
        }
    }
}

impl GuidanceConfig {
    pub fn with_view_threshold(mut self, degrees: f32) -> Self {
        self.view_threshold_deg = degrees;
        self
    }

    /// Set both fields of view, e.g. from the active camera's intrinsics
    pub fn with_field_of_view(mut self, horizontal_deg: f32, vertical_deg: f32) -> Self {
        self.horizontal_fov_deg = horizontal_deg;
        self.vertical_fov_deg = vertical_deg;
        self
    }

    pub fn with_screen_margin(mut self, percent: f32) -> Self {
        self.screen_margin_pct = percent;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let threshold = self.view_threshold_deg;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold { threshold });
        }

        for fov in [self.horizontal_fov_deg, self.vertical_fov_deg] {
            if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
                return Err(ConfigError::InvalidFieldOfView { fov });
            }
        }

        let margin = self.screen_margin_pct;
        if !margin.is_finite() || !(0.0..50.0).contains(&margin) {
            return Err(ConfigError::InvalidMargin { margin });
        }

        Ok(())
    }
}

/// Acquisition configuration for the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Bounded wait for the first location fix (milliseconds)
    pub location_timeout_ms: u64,
    /// How old a fix may be relative to the start of the search (milliseconds)
    pub max_fix_age_ms: u64,
    /// Ask the location source for its most accurate mode
    pub high_accuracy: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            location_timeout_ms: LOCATION_TIMEOUT_MS,
            max_fix_age_ms: MAX_FIX_AGE_MS,
            high_accuracy: true,
        }
    }
}

impl SessionConfig {
    pub fn with_location_timeout_ms(mut self, ms: u64) -> Self {
        self.location_timeout_ms = ms;
        self
    }

    pub fn with_max_fix_age_ms(mut self, ms: u64) -> Self {
        self.max_fix_age_ms = ms;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.location_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Complete configuration for a guided search
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuideConfig {
    pub filter: FilterConfig,
    pub guidance: GuidanceConfig,
    pub session: SessionConfig,
}

impl GuideConfig {
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_guidance(mut self, guidance: GuidanceConfig) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Validate every section, reporting the first problem found
    pub fn validate(&self) -> ConfigResult<()> {
        self.filter.validate()?;
        self.guidance.validate()?;
        self.session.validate()
    }

    /// Parse and validate a JSON document
    #[cfg(feature = "std")]
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    #[cfg(feature = "std")]
    pub fn load(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { kind: e.kind() })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GuideConfig::default().validate().is_ok());
    }

    #[test]
    fn alpha_bounds() {
        assert!(FilterConfig::default().with_alpha(1.0).validate().is_ok());
        assert!(matches!(
            FilterConfig::default().with_alpha(0.0).validate(),
            Err(ConfigError::InvalidAlpha { .. })
        ));
        assert!(FilterConfig::default().with_alpha(1.5).validate().is_err());
        assert!(FilterConfig::default().with_alpha(f32::NAN).validate().is_err());
    }

    #[test]
    fn field_of_view_must_be_a_proper_angle() {
        let config = GuidanceConfig::default().with_field_of_view(0.0, 80.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidFieldOfView { fov: 0.0 }));

        let config = GuidanceConfig::default().with_field_of_view(60.0, 180.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn margin_must_leave_room_on_screen() {
        assert!(GuidanceConfig::default().with_screen_margin(50.0).validate().is_err());
        assert!(GuidanceConfig::default().with_screen_margin(0.0).validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SessionConfig::default().with_location_timeout_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[cfg(feature = "std")]
    #[test]
    fn partial_json_keeps_defaults() {
        let config = GuideConfig::from_json_str(r#"{ "filter": { "alpha": 0.2 } }"#).unwrap();
        assert_eq!(config.filter.alpha, 0.2);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn invalid_json_reports_position() {
        let err = GuideConfig::from_json_str("{ \"filter\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn out_of_range_json_is_rejected() {
        let err = GuideConfig::from_json_str(r#"{ "filter": { "alpha": 2.0 } }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidAlpha { alpha: 2.0 });
    }

    #[cfg(feature = "std")]
    #[test]
    fn load_reads_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "session": {{ "location_timeout_ms": 5000 }} }}"#).unwrap();

        let config = GuideConfig::load(file.path()).unwrap();
        assert_eq!(config.session.location_timeout_ms, 5000);
        assert!(config.session.high_accuracy);
    }

    #[cfg(feature = "std")]
    #[test]
    fn missing_file_is_io_error() {
        let err = GuideConfig::load("/definitely/not/here.json").unwrap_err();
        assert_eq!(err, ConfigError::Io { kind: std::io::ErrorKind::NotFound });
    }
}
