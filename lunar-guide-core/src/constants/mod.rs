//! Constants for Lunar Guide Core
//!
//! Centralized numeric defaults used throughout the guidance pipeline. Every
//! value here is a default only: the matching config types in
//! [`crate::config`] let a deployment override them.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Guidance**: Field of view, in-view tolerance, screen bounds
//! - **Filter**: Orientation smoothing parameters
//! - **Time**: Acquisition deadlines and unit conversions
//! - **Buffers**: Inbox and text capacities for heap-free builds
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Keep units in the name (`_DEG`, `_PCT`, `_MS`)
//! 3. Group related constants together

/// Angular tolerances and screen mapping parameters.
pub mod guidance;

/// Orientation smoothing parameters.
pub mod filter;

/// Time-related constants for acquisition deadlines.
pub mod time;

/// Buffer sizes for the event inbox and blessing text.
pub mod buffers;

// Re-export commonly used constants for convenience
pub use guidance::{
    VIEW_THRESHOLD_DEG, HORIZONTAL_FOV_DEG, VERTICAL_FOV_DEG,
    SCREEN_CENTER_PCT, SCREEN_MARGIN_PCT,
};

pub use filter::DEFAULT_SMOOTHING_ALPHA;

pub use time::{MS_PER_SECOND, LOCATION_TIMEOUT_MS, MAX_FIX_AGE_MS};

pub use buffers::{DEFAULT_INBOX_CAPACITY, MAX_BLESSING_LEN};
