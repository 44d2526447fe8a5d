//! Angle arithmetic on the compass circle
//!
//! Headings live on a circle: 359° and 1° are two degrees apart, not 358.
//! Every difference between two headings in this crate goes through
//! [`wrap_180`] so that interpolation and error terms take the short arc.
//!
//! Uses `libm` so the same code runs on `no_std` targets.

/// Degrees per full turn
pub const FULL_TURN_DEG: f32 = 360.0;

/// Degrees per half turn
pub const HALF_TURN_DEG: f32 = 180.0;

/// Shortest signed angular difference, wrapped into `[-180, 180]`
///
/// Applies a single correction step (subtract or add one turn), which is
/// exact for any difference of two headings in `[0, 360)`. Larger inputs are
/// first reduced modulo 360 so the result is always in range.
///
/// ```rust
/// use lunar_guide_core::angle::wrap_180;
///
/// assert_eq!(wrap_180(10.0 - 350.0), 20.0);
/// assert_eq!(wrap_180(350.0 - 10.0), -20.0);
/// ```
pub fn wrap_180(delta: f32) -> f32 {
    let mut d = if libm::fabsf(delta) > FULL_TURN_DEG {
        libm::fmodf(delta, FULL_TURN_DEG)
    } else {
        delta
    };

    if d > HALF_TURN_DEG {
        d -= FULL_TURN_DEG;
    }
    if d < -HALF_TURN_DEG {
        d += FULL_TURN_DEG;
    }
    d
}

/// Normalize an angle into `[0, 360)`
pub fn normalize_360(angle: f32) -> f32 {
    let a = libm::fmodf(angle, FULL_TURN_DEG);
    let a = if a < 0.0 { a + FULL_TURN_DEG } else { a };
    // fmodf of a tiny negative value can round up to exactly 360
    if a >= FULL_TURN_DEG { 0.0 } else { a }
}

/// Radians to degrees
pub fn to_degrees(radians: f32) -> f32 {
    radians * (HALF_TURN_DEG / core::f32::consts::PI)
}

/// Radians to degrees in double precision, for ephemeris output
pub fn to_degrees_f64(radians: f64) -> f64 {
    radians * (180.0 / core::f64::consts::PI)
}

/// Direction of a 2D vector in degrees, counter-clockwise from +x
pub fn atan2_deg(y: f32, x: f32) -> f32 {
    to_degrees(libm::atan2f(y, x))
}

/// Linear interpolation from `from` toward `to` by fraction `alpha`
pub fn lerp(from: f32, to: f32, alpha: f32) -> f32 {
    from + (to - from) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_takes_short_arc_across_north() {
        assert_eq!(wrap_180(10.0 - 350.0), 20.0);
        assert_eq!(wrap_180(350.0 - 10.0), -20.0);
        assert_eq!(wrap_180(90.0), 90.0);
    }

    #[test]
    fn wrap_reduces_oversized_input() {
        assert!((wrap_180(1000.0) - -80.0).abs() < 1e-3);
        assert!((wrap_180(-1000.0) - 80.0).abs() < 1e-3);
    }

    #[test]
    fn normalize_handles_negative_and_full_turns() {
        assert_eq!(normalize_360(-10.0), 350.0);
        assert_eq!(normalize_360(360.0), 0.0);
        assert_eq!(normalize_360(725.0), 5.0);
    }

    #[test]
    fn radians_convert_to_degrees() {
        assert!((to_degrees(core::f32::consts::PI) - 180.0).abs() < 1e-4);
        assert!((to_degrees_f64(core::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn atan2_points_up_at_minus_ninety_for_negative_y() {
        assert!((atan2_deg(-1.0, 0.0) - -90.0).abs() < 1e-4);
        assert!(atan2_deg(0.0, 1.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn wrapped_difference_stays_in_half_turn(h1 in 0.0f32..360.0, h2 in 0.0f32..360.0) {
            let d = wrap_180(h2 - h1);
            prop_assert!((-180.0..=180.0).contains(&d));
        }

        #[test]
        fn wrapped_difference_is_antisymmetric(h1 in 0.0f32..360.0, h2 in 0.0f32..360.0) {
            let forward = wrap_180(h2 - h1);
            let backward = wrap_180(h1 - h2);
            // At exactly ±180 both directions are equally short and may share a sign
            if (forward.abs() - 180.0).abs() > 1e-3 {
                prop_assert!((forward + backward).abs() < 1e-3);
            }
        }

        #[test]
        fn normalized_angle_is_in_range(a in -10_000.0f32..10_000.0) {
            let n = normalize_360(a);
            prop_assert!((0.0..360.0).contains(&n));
        }
    }
}
