//! Orientation Filter Constants

/// Default exponential smoothing factor.
///
/// Fraction of the gap between the smoothed value and a new raw sample that
/// is closed per sample. At typical 60 Hz orientation event rates, 0.05 gives
/// a time constant of roughly a third of a second: hand tremor is suppressed
/// while deliberate sweeps still track.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.05;

/// Smallest accepted smoothing factor (exclusive).
///
/// An alpha of 0 would freeze the estimate at the first sample forever.
pub const MIN_SMOOTHING_ALPHA: f32 = 0.0;

/// Largest accepted smoothing factor (inclusive). 1.0 disables smoothing.
pub const MAX_SMOOTHING_ALPHA: f32 = 1.0;

/// Value substituted for an unknown roll reading before interpolation.
pub const UNKNOWN_ROLL_DEG: f32 = 0.0;
