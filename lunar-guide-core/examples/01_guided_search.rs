//! Guided Moon Search Example
//!
//! Walks one search session through its whole life: acquisition, a user
//! sweeping the phone toward the Moon, the blessing, and teardown.
//!
//! ## What You'll Learn
//!
//! - Implementing the collaborator traits for a host platform
//! - Feeding events through a bounded inbox
//! - Reading guidance, hints and failure messages
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_guided_search
//! ```

use lunar_guide_core::{
    acquisition::{AttemptId, WatchOptions},
    blessing::{fetch_or_fallback, StaticBlessing},
    config::GuideConfig,
    errors::AcquisitionFault,
    ephemeris::FixedEphemeris,
    events::SessionEvent,
    inbox::DefaultInbox,
    orientation::{GeoPosition, LocationFix, Orientation, OrientationSample},
    session::{Readiness, Session},
    time::{FixedTime, TimeSource},
    traits::{CaptureDevice, LocationSource, LocationWatch, MediaStream},
};

struct DemoStream;

impl MediaStream for DemoStream {
    fn stop(&mut self) {
        println!("  [camera] tracks stopped");
    }
}

struct DemoCamera;

impl CaptureDevice for DemoCamera {
    type Stream = DemoStream;

    fn request_stream(&mut self, attempt: AttemptId) -> Result<(), AcquisitionFault> {
        println!("  [camera] rear camera requested for attempt {}", attempt.get());
        Ok(())
    }
}

struct DemoWatch;

impl LocationWatch for DemoWatch {
    fn cancel(&mut self) {
        println!("  [gps] watch cancelled");
    }
}

struct DemoGps;

impl LocationSource for DemoGps {
    type Watch = DemoWatch;

    fn watch(&mut self, attempt: AttemptId, options: WatchOptions) -> Result<DemoWatch, AcquisitionFault> {
        println!(
            "  [gps] watching for attempt {} (high accuracy: {}, timeout: {} ms)",
            attempt.get(),
            options.high_accuracy,
            options.timeout_ms
        );
        Ok(DemoWatch)
    }
}

fn main() {
    println!("Lunar Guide Search Example");
    println!("==========================\n");

    let clock = FixedTime::new(1_700_000_000_000);
    let ephemeris = FixedEphemeris::new(142.0, 27.5).with_illumination(0.83);
    let mut session = match Session::new(DemoCamera, DemoGps, ephemeris, &clock, GuideConfig::default()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("invalid config: {e}");
            return;
        }
    };
    let mut inbox: DefaultInbox<DemoStream> = DefaultInbox::new();

    println!("1. Begin");
    if session.handle(SessionEvent::Begin).is_err() {
        return;
    }
    let attempt = session.attempt();
    println!("   state: {}\n", session.state());

    println!("2. Acquisition completes (location first, then camera)");
    let fix = LocationFix::new(GeoPosition::new(40.7128, -74.0060), clock.now());
    let _ = inbox.push(SessionEvent::LocationFix { attempt, fix });
    let _ = inbox.push(SessionEvent::StreamReady { attempt, stream: DemoStream });
    for event in inbox.drain() {
        let _ = session.handle(event);
    }
    println!("   state: {}", session.state());
    if let Some(moon) = session.moon() {
        println!(
            "   moon at azimuth {:.1}°, altitude {:.1}°, {:.0}% lit\n",
            moon.position.azimuth,
            moon.position.altitude,
            moon.illumination * 100.0
        );
    }

    println!("3. User sweeps toward the Moon");
    let sweep = [(80.0, 85.0), (100.0, 80.0), (120.0, 72.0), (135.0, 66.0), (141.0, 63.0)];
    for (i, (heading, pitch)) in sweep.iter().enumerate() {
        clock.advance(100);
        let sample = OrientationSample::new(Orientation::known(*heading, *pitch, 0.0), i as u64);
        session.orientation(sample);

        match session.readiness() {
            Readiness::Guiding(result) => println!(
                "   heading {:5.1}° → Δaz {:6.1}° Δalt {:6.1}°  marker ({:4.1}%, {:4.1}%)  {}",
                heading,
                result.delta_az,
                result.delta_alt,
                result.screen_x,
                result.screen_y,
                if result.in_view { "IN VIEW".to_string() } else { session.hint().to_string() }
            ),
            other => println!("   {other:?}"),
        }
    }

    // The smoothing filter needs a moment to settle on the final pose
    for _ in 0..60 {
        session.orientation(OrientationSample::new(Orientation::known(141.0, 63.0, 0.0), 0));
    }
    println!("   settled: in view = {}\n", session.guidance().in_view);

    println!("4. Blessing");
    match session.request_blessing() {
        Ok(ticket) => {
            let text = fetch_or_fallback(&mut StaticBlessing::default());
            session.complete_blessing(ticket, Ok(text));
            if let Some(text) = session.blessing().text() {
                println!("   \"{text}\"\n");
            }
        }
        Err(e) => println!("   not yet: {e}\n"),
    }

    println!("5. Finish");
    session.finish();
    println!("   state: {}", session.state());
}
