//! Fake collaborators shared by the integration tests
//!
//! Every fake records what the session did to it, so tests can assert on
//! resource handling (streams stopped, watches cancelled) as well as state.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use lunar_guide_core::{
    acquisition::{AttemptId, WatchOptions},
    blessing::{blessing_text, BlessingText},
    config::GuideConfig,
    ephemeris::FixedEphemeris,
    errors::{AcquisitionFault, BlessingError},
    orientation::{GeoPosition, LocationFix, Orientation, OrientationSample},
    session::Session,
    time::{FixedTime, TimeSource, Timestamp},
    traits::{BlessingProvider, CaptureDevice, LocationSource, LocationWatch, MediaStream},
};

/// Shared counter
pub type Counter = Rc<Cell<u32>>;

/// Camera stream that counts how often it was stopped
#[derive(Debug)]
pub struct RecordingStream {
    pub id: u32,
    stops: Counter,
}

impl RecordingStream {
    pub fn stop_count(&self) -> u32 {
        self.stops.get()
    }
}

impl MediaStream for RecordingStream {
    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

/// Capture device that records requests and mints streams sharing one stop counter
#[derive(Debug, Default)]
pub struct FakeCamera {
    pub requests: RefCell<Vec<AttemptId>>,
    pub refuse_with: Option<AcquisitionFault>,
    stops: Counter,
    minted: Cell<u32>,
}

impl FakeCamera {
    pub fn refusing(fault: AcquisitionFault) -> Self {
        Self { refuse_with: Some(fault), ..Self::default() }
    }

    /// Counter incremented by every stream this camera minted
    pub fn stops(&self) -> Counter {
        self.stops.clone()
    }

    /// A stream as the platform would deliver it
    pub fn mint(&self) -> RecordingStream {
        self.minted.set(self.minted.get() + 1);
        RecordingStream { id: self.minted.get(), stops: self.stops.clone() }
    }
}

impl CaptureDevice for FakeCamera {
    type Stream = RecordingStream;

    fn request_stream(&mut self, attempt: AttemptId) -> Result<(), AcquisitionFault> {
        self.requests.borrow_mut().push(attempt);
        self.refuse_with.map_or(Ok(()), Err)
    }
}

/// Location subscription that counts cancellations
#[derive(Debug)]
pub struct RecordingWatch {
    cancels: Counter,
}

impl LocationWatch for RecordingWatch {
    fn cancel(&mut self) {
        self.cancels.set(self.cancels.get() + 1);
    }
}

/// Location source that records watch options
#[derive(Debug, Default)]
pub struct FakeLocator {
    pub options: Vec<WatchOptions>,
    pub refuse_with: Option<AcquisitionFault>,
    cancels: Counter,
}

impl FakeLocator {
    pub fn refusing(fault: AcquisitionFault) -> Self {
        Self { refuse_with: Some(fault), ..Self::default() }
    }

    pub fn cancels(&self) -> Counter {
        self.cancels.clone()
    }
}

impl LocationSource for FakeLocator {
    type Watch = RecordingWatch;

    fn watch(&mut self, _attempt: AttemptId, options: WatchOptions) -> Result<RecordingWatch, AcquisitionFault> {
        self.options.push(options);
        match self.refuse_with {
            Some(fault) => Err(fault),
            None => Ok(RecordingWatch { cancels: self.cancels.clone() }),
        }
    }
}

/// Blessing provider that replays scripted results, then fails
#[derive(Debug, Default)]
pub struct ScriptedBlessing {
    script: VecDeque<Result<BlessingText, BlessingError>>,
    pub calls: u32,
}

impl ScriptedBlessing {
    pub fn then_text(mut self, text: &str) -> Self {
        self.script.push_back(Ok(blessing_text(text)));
        self
    }

    pub fn then_error(mut self, error: BlessingError) -> Self {
        self.script.push_back(Err(error));
        self
    }
}

impl BlessingProvider for ScriptedBlessing {
    fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError> {
        self.calls += 1;
        self.script
            .pop_front()
            .unwrap_or(Err(BlessingError::Transport { reason: "script exhausted" }))
    }
}

pub type TestSession<'a> = Session<FakeCamera, FakeLocator, FixedEphemeris, &'a FixedTime>;

/// Observer used throughout the tests
pub const OBSERVER: GeoPosition = GeoPosition::new(52.37, 4.90);

/// Moon fixed at azimuth 200°, altitude 30°
pub fn moon() -> FixedEphemeris {
    FixedEphemeris::new(200.0, 30.0).with_illumination(0.6)
}

pub fn session(clock: &FixedTime) -> TestSession<'_> {
    session_with(clock, FakeCamera::default(), FakeLocator::default(), GuideConfig::default())
}

pub fn session_with(
    clock: &FixedTime,
    camera: FakeCamera,
    locator: FakeLocator,
    config: GuideConfig,
) -> TestSession<'_> {
    Session::new(camera, locator, moon(), clock, config).expect("valid test config")
}

pub fn fix_at(measured_at: Timestamp) -> LocationFix {
    LocationFix::new(OBSERVER, measured_at)
}

pub fn sample(heading: f32, pitch: f32, at: Timestamp) -> OrientationSample {
    OrientationSample::new(Orientation::known(heading, pitch, 0.0), at)
}

/// Drive a fresh session to `Active` with both acquisitions succeeding
pub fn activate(session: &mut TestSession<'_>, clock: &FixedTime) -> AttemptId {
    let attempt = session.begin().expect("begin from idle");
    let stream = session.capture().mint();
    session.stream_ready(attempt, stream);
    session.location_fix(attempt, fix_at(clock.now()));
    attempt
}
