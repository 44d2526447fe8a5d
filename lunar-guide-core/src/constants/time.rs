//! Time-Related Constants
//!
//! Acquisition deadlines and unit conversions used by the session state
//! machine. Timestamps throughout the crate are milliseconds.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== ACQUISITION DEADLINES =====

/// Bounded wait for the first location fix (milliseconds).
///
/// Calibration fails with `LocationUnavailable` if no fix arrives within this
/// window after the search begins. Matches the geolocation timeout a browser
/// host passes to `watchPosition`.
pub const LOCATION_TIMEOUT_MS: u64 = 15 * MS_PER_SECOND;

/// Maximum age of a location fix at the moment the search began (milliseconds).
///
/// Zero means only fixes measured after the request are accepted: a cached
/// last-known position is never used to compute the Moon's position.
pub const MAX_FIX_AGE_MS: u64 = 0;
