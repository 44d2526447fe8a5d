//! Error Types for Acquisition, Session Misuse, and Configuration
//!
//! ## Design Philosophy
//!
//! The guidance pipeline itself never fails: the smoothing filter and the
//! guidance calculator degrade absent or malformed input to a neutral result.
//! Errors only exist at the edges:
//!
//! 1. **Acquisition**: The camera or location source reports a failure while
//!    a search is starting. These are classified into a three-way taxonomy
//!    that drives the user-facing message.
//! 2. **Session misuse**: The host asks for a transition the current state
//!    does not allow (e.g. `begin` while already calibrating).
//! 3. **Configuration**: A config value outside its meaningful range.
//! 4. **Blessing**: The text provider failed. Always recovered locally with
//!    the fallback blessing, never surfaced as a session failure.
//!
//! All error types are small `Copy` enums with `&'static str` payloads only,
//! so they can be stored in the session without an allocator.
//!
//! ## Acquisition Taxonomy
//!
//! ```text
//! origin    fault                         kind
//! ─────────────────────────────────────────────────────────────
//! Location  PermissionDenied           →  PermissionDenied
//! Location  PositionUnavailable        →  LocationUnavailable
//! Location  Timeout                    →  LocationUnavailable
//! Location  DeviceNotFound / Other     →  LocationUnavailable
//! Camera    PermissionDenied           →  PermissionDenied
//! Camera    anything else              →  Unexpected
//! ```
//!
//! Recovery is identical for every kind (manual retry), but the distinction
//! is kept because each kind tells the user something different to fix.

use thiserror_no_std::Error;

use crate::session::SessionState;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which acquisition raised a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcquisitionOrigin {
    /// Video capture stream
    Camera,
    /// Location watch
    Location,
}

/// Raw failure cause as reported by a platform source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionFault {
    /// The user or platform refused access
    PermissionDenied,
    /// The source is reachable but could not produce a value
    PositionUnavailable,
    /// The bounded wait elapsed
    Timeout,
    /// No capture or positioning hardware present
    DeviceNotFound,
    /// Anything else, with a short platform-provided description
    Other(&'static str),
}

/// User-facing failure classification stored by the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcquisitionErrorKind {
    /// Location acquisition rejected or timed out
    #[error("location unavailable")]
    LocationUnavailable,

    /// Camera or location permission refused
    #[error("permission denied")]
    PermissionDenied,

    /// Anything else
    #[error("unexpected acquisition error")]
    Unexpected,
}

impl AcquisitionErrorKind {
    /// Message shown to the user on the failure screen
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::LocationUnavailable => {
                "Could not get your location. Please enable location services."
            }
            Self::PermissionDenied => {
                "Camera and location access are required. Please grant permissions and refresh."
            }
            Self::Unexpected => "An unexpected error occurred. Please refresh the page.",
        }
    }
}

/// An acquisition failure reported while a search session is starting
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{origin:?} acquisition failed: {fault:?}")]
pub struct AcquisitionError {
    /// Which acquisition failed
    pub origin: AcquisitionOrigin,
    /// What the platform reported
    pub fault: AcquisitionFault,
}

impl AcquisitionError {
    /// Failure of the camera stream request
    pub const fn camera(fault: AcquisitionFault) -> Self {
        Self { origin: AcquisitionOrigin::Camera, fault }
    }

    /// Failure of the location watch
    pub const fn location(fault: AcquisitionFault) -> Self {
        Self { origin: AcquisitionOrigin::Location, fault }
    }

    /// Classify into the user-facing taxonomy
    pub const fn kind(&self) -> AcquisitionErrorKind {
        match (self.origin, self.fault) {
            (_, AcquisitionFault::PermissionDenied) => AcquisitionErrorKind::PermissionDenied,
            (AcquisitionOrigin::Location, _) => AcquisitionErrorKind::LocationUnavailable,
            (AcquisitionOrigin::Camera, _) => AcquisitionErrorKind::Unexpected,
        }
    }
}

/// Session operation rejected in the current state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The requested action is not a transition out of the current state
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        /// State the session was in
        state: SessionState,
        /// Action that was attempted
        action: &'static str,
    },

    /// Blessing requested while the Moon is not inside the view cone
    #[error("moon is not in view")]
    NotInView,

    /// A blessing fetch is already in flight
    #[error("a blessing request is already pending")]
    BlessingPending,
}

/// Configuration value outside its meaningful range
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Smoothing factor must lie in (0, 1]
    #[error("smoothing alpha {alpha} outside (0, 1]")]
    InvalidAlpha {
        /// Rejected value
        alpha: f32,
    },

    /// Field of view must lie in (0, 180)
    #[error("field of view {fov} outside (0, 180)")]
    InvalidFieldOfView {
        /// Rejected value in degrees
        fov: f32,
    },

    /// View threshold must be positive and finite
    #[error("view threshold {threshold} must be positive")]
    InvalidThreshold {
        /// Rejected value in degrees
        threshold: f32,
    },

    /// Screen margin must lie in [0, 50)
    #[error("screen margin {margin} outside [0, 50)")]
    InvalidMargin {
        /// Rejected value in percent
        margin: f32,
    },

    /// Location timeout must be non-zero
    #[error("location timeout must be non-zero")]
    ZeroTimeout,

    /// Config document could not be parsed
    #[error("config parse error at line {line}, column {column}")]
    Parse {
        /// 1-based line of the error, 0 if unknown
        line: usize,
        /// 1-based column of the error, 0 if unknown
        column: usize,
    },

    /// Config file could not be read
    #[cfg(feature = "std")]
    #[error("config file could not be read: {kind:?}")]
    Io {
        /// Underlying I/O failure kind
        kind: std::io::ErrorKind,
    },
}

/// Blessing provider failure, recovered with the fallback text
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlessingError {
    /// No credentials configured for the remote provider
    #[error("blessing provider not configured")]
    NotConfigured,

    /// Network or transport failure
    #[error("blessing transport failed: {reason}")]
    Transport {
        /// Short description of the failure
        reason: &'static str,
    },

    /// Remote service returned a non-success status
    #[error("blessing service returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Response did not contain usable text
    #[error("blessing response contained no text")]
    EmptyResponse,
}

#[cfg(feature = "defmt")]
impl defmt::Format for AcquisitionErrorKind {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::LocationUnavailable => defmt::write!(fmt, "LocationUnavailable"),
            Self::PermissionDenied => defmt::write!(fmt, "PermissionDenied"),
            Self::Unexpected => defmt::write!(fmt, "Unexpected"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SessionError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidTransition { action, .. } =>
                defmt::write!(fmt, "Invalid transition: {}", action),
            Self::NotInView => defmt::write!(fmt, "Moon not in view"),
            Self::BlessingPending => defmt::write!(fmt, "Blessing pending"),
        }
    }
}
