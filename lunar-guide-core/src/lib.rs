//! Guidance core for Lunar Guide
//!
//! Turns noisy phone orientation and an observer position into on-screen
//! directions toward the Moon, and runs the search session around it.
//! Designed to run unchanged in a browser (via WASM), on a phone, or on a
//! `no_std` handheld.
//!
//! Key constraints:
//! - No heap allocation; collaborators are generic, text is bounded
//! - Absent sensor data degrades to neutral guidance, never to an error
//! - All state changes happen on one event timeline
//!
//! ```no_run
//! use lunar_guide_core::{GuidanceCalculator, FixedEphemeris, Orientation, GeoPosition};
//!
//! let calculator = GuidanceCalculator::with_defaults(FixedEphemeris::new(135.0, 42.0));
//! let moon = calculator.moon_snapshot(GeoPosition::new(35.68, 139.69), 0);
//!
//! let result = calculator.compute(&Orientation::known(120.0, 50.0, 0.0), Some(&moon.position));
//! println!("{}", result.hint(calculator.config().view_threshold_deg));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod acquisition;
pub mod angle;
pub mod blessing;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod errors;
pub mod events;
pub mod filter;
pub mod guidance;
pub mod inbox;
pub mod orientation;
pub mod session;
pub mod time;
pub mod traits;

// Public API
pub use acquisition::AttemptId;
pub use blessing::{fetch_or_fallback, BlessingText, BlessingTicket, FALLBACK_BLESSING};
pub use config::{FilterConfig, GuideConfig, GuidanceConfig, SessionConfig};
pub use ephemeris::FixedEphemeris;
pub use errors::{AcquisitionError, AcquisitionErrorKind, AcquisitionFault, BlessingError, ConfigError, SessionError};
pub use events::SessionEvent;
pub use filter::OrientationFilter;
pub use guidance::{DirectionHint, GuidanceCalculator, GuidanceResult};
pub use inbox::EventInbox;
pub use orientation::{CelestialPosition, GeoPosition, LocationFix, MoonSnapshot, Orientation, OrientationSample};
pub use session::{Readiness, Session, SessionState};
pub use traits::{BlessingProvider, CaptureDevice, LocationSource, LocationWatch, MediaStream, MoonEphemeris};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
