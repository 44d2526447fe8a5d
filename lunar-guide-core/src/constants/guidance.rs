//! Guidance Constants
//!
//! Angular tolerances and the mapping from angular error to screen space.
//! All angles are in degrees, all screen coordinates in percent of the
//! viewport (0 = left/top edge, 100 = right/bottom edge).

// ===== IN-VIEW TOLERANCE =====

/// Half-width of the tolerance cone in which the Moon counts as found.
///
/// The test is strict (`|error| < threshold`) on both axes, so an error of
/// exactly 5° is still "not in view".
pub const VIEW_THRESHOLD_DEG: f32 = 5.0;

// ===== CAMERA FIELD OF VIEW =====

/// Approximate horizontal field of view of a phone's rear camera.
pub const HORIZONTAL_FOV_DEG: f32 = 60.0;

/// Approximate vertical field of view of a phone's rear camera (portrait).
pub const VERTICAL_FOV_DEG: f32 = 80.0;

// ===== SCREEN MAPPING =====

/// Screen center, used for the neutral result and the "found" snap.
pub const SCREEN_CENTER_PCT: f32 = 50.0;

/// Distance the target marker keeps from every screen edge.
///
/// Screen coordinates are clamped to `[margin, 100 - margin]` so the marker
/// stays visible even when the angular error exceeds the field of view.
pub const SCREEN_MARGIN_PCT: f32 = 5.0;

/// Rotation added to the pointer angle so that an arrow drawn pointing up
/// needs zero rotation when the target is straight above.
pub const POINTER_UP_OFFSET_DEG: f32 = 90.0;

// ===== DEVICE GEOMETRY =====

/// Pitch at which the camera looks at the horizon (device held upright).
///
/// Device aim altitude is `DEVICE_UPRIGHT_PITCH_DEG - pitch`: a flat device
/// (pitch 0°) looks at the zenith.
pub const DEVICE_UPRIGHT_PITCH_DEG: f32 = 90.0;
