//! Filter and calculator working together on realistic sensor streams

mod common;

use common::moon;
use lunar_guide_core::{
    config::{FilterConfig, GuidanceConfig},
    ephemeris::FixedEphemeris,
    filter::OrientationFilter,
    guidance::{screen_position, GuidanceCalculator, GuidanceResult, Tilt, Turn},
    orientation::{GeoPosition, Orientation},
};
use proptest::prelude::*;

fn calculator() -> GuidanceCalculator<FixedEphemeris> {
    GuidanceCalculator::with_defaults(moon())
}

#[test]
fn end_to_end_alignment() {
    let calc = calculator();
    let snapshot = calc.moon_snapshot(GeoPosition::new(-33.87, 151.21), 0);

    let result = calc.compute(&Orientation::known(200.0, 60.0, 0.0), Some(&snapshot.position));
    assert!(result.delta_az.abs() < 1e-3);
    assert!(result.delta_alt.abs() < 1e-3);
    assert!(result.in_view);
}

#[test]
fn jittery_stream_settles_in_view() {
    let calc = calculator();
    let snapshot = calc.moon_snapshot(GeoPosition::new(0.0, 0.0), 0);
    let mut filter = OrientationFilter::new(FilterConfig::default().with_alpha(0.2)).unwrap();

    // Hand sweeps toward the Moon with ±3° jitter on both axes
    let jitter = [3.0, -2.0, 1.5, -3.0, 2.5, -1.0, 0.5, -2.5];
    let mut result = GuidanceResult::NEUTRAL;
    for i in 0..120 {
        let j = jitter[i % jitter.len()];
        let smoothed = filter.update(Orientation::known(200.0 + j, 60.0 - j, 0.0));
        result = calc.compute(&smoothed, Some(&snapshot.position));
    }

    assert!(result.in_view, "settled result was {result:?}");
}

#[test]
fn sweep_across_north_stays_continuous() {
    let calc = GuidanceCalculator::with_defaults(FixedEphemeris::new(5.0, 10.0));
    let snapshot = calc.moon_snapshot(GeoPosition::new(60.0, 10.0), 0);
    let mut filter = OrientationFilter::default();

    let mut last_x = None;
    for step in 0..40 {
        let heading = (340.0 + step as f32) % 360.0;
        let smoothed = filter.update(Orientation::known(heading, 80.0, 0.0));
        let result = calc.compute(&smoothed, Some(&snapshot.position));

        if let Some(prev) = last_x {
            let jump: f32 = result.screen_x - prev;
            assert!(jump.abs() < 5.0, "marker jumped {jump} at step {step}");
        }
        last_x = Some(result.screen_x);
    }
}

#[test]
fn moon_behind_user_pins_marker_to_edge() {
    let calc = calculator();
    let snapshot = calc.moon_snapshot(GeoPosition::new(0.0, 0.0), 0);

    let result = calc.compute(&Orientation::known(10.0, 90.0, 0.0), Some(&snapshot.position));
    assert!(!result.in_view);
    assert!(result.screen_x == 5.0 || result.screen_x == 95.0);

    let hint = result.hint(calc.config().view_threshold_deg);
    assert_eq!(hint.horizontal, Some(Turn::Left));
    assert_eq!(hint.vertical, Some(Tilt::Up));
}

#[test]
fn custom_field_of_view_changes_scaling() {
    let config = GuidanceConfig::default().with_field_of_view(30.0, 40.0);
    assert_eq!(screen_position(7.5, 10.0, &config), (75.0, 25.0));
}

proptest! {
    #[test]
    fn marker_always_on_screen(
        heading in 0.0f32..360.0,
        pitch in -90.0f32..180.0,
        azimuth in 0.0f32..360.0,
        altitude in -90.0f32..90.0,
    ) {
        let calc = GuidanceCalculator::with_defaults(FixedEphemeris::new(azimuth as f64, altitude as f64));
        let snapshot = calc.moon_snapshot(GeoPosition::new(0.0, 0.0), 0);
        let result = calc.compute(&Orientation::known(heading, pitch, 0.0), Some(&snapshot.position));

        prop_assert!((5.0..=95.0).contains(&result.screen_x));
        prop_assert!((5.0..=95.0).contains(&result.screen_y));
        prop_assert!((-180.0..=180.0).contains(&result.delta_az));
        prop_assert!(result.pointer_rotation_deg.is_finite());
    }

    #[test]
    fn screen_position_never_nan(delta_az in proptest::num::f32::ANY, delta_alt in proptest::num::f32::ANY) {
        let (x, y) = screen_position(delta_az, delta_alt, &GuidanceConfig::default());
        prop_assert!(!x.is_nan() && !y.is_nan());
        prop_assert!((5.0..=95.0).contains(&x));
        prop_assert!((5.0..=95.0).contains(&y));
    }
}
