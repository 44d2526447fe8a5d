//! Search Session State Machine
//!
//! ## Overview
//!
//! A session owns everything one Moon search needs: the acquired camera
//! stream, the location watch, the smoothing filter, the latest Moon
//! snapshot and the blessing shown at the end.
//!
//! ```text
//!                     begin                  stream ∧ first fix
//!  AwaitingPermissions ────→ Calibrating ─────────────────────→ Active
//!     ↑    ↑   │                  │                               │
//!     │    │   │ request error    │ acquisition error / timeout   │
//!     │    │   ↓                  ↓                               │
//!     │    └── Failed ←───────────┘                               │
//!     │  retry                                                    │
//!     └───────────────────────────── finish ──────────────────────┘
//! ```
//!
//! `finish` is accepted from every state and always lands in
//! `AwaitingPermissions` with resources released.
//!
//! ## Acquisition Join
//!
//! `begin` starts both acquisitions under a fresh [`AttemptId`]. The session
//! becomes `Active` only when the stream *and* a first fix for that attempt
//! have arrived, in either order. Completions for any other attempt, or
//! arriving after the attempt already failed or finished, are discarded; a
//! discarded stream is stopped before it is dropped.
//!
//! ## Freshness and Timeout
//!
//! A fix measured more than `max_fix_age_ms` before the attempt started is a
//! cached fix and is ignored. If no usable fix arrives within
//! `location_timeout_ms`, the next [`Session::tick`] fails the attempt with
//! `LocationUnavailable`.
//!
//! ## Teardown
//!
//! Leaving `Calibrating` or `Active` (finish or failure) stops the stream,
//! cancels the watch, resets the smoothing filter, and clears orientation,
//! location, Moon snapshot and any blessing. Teardown is idempotent.
//!
//! ## Usage Example
//!
//! ```rust
//! use lunar_guide_core::{
//!     acquisition::{AttemptId, WatchOptions},
//!     config::GuideConfig,
//!     ephemeris::FixedEphemeris,
//!     errors::AcquisitionFault,
//!     orientation::{GeoPosition, LocationFix, Orientation, OrientationSample},
//!     session::{Session, SessionState},
//!     time::FixedTime,
//!     traits::{CaptureDevice, LocationSource, LocationWatch, MediaStream},
//! };
//!
//! struct Camera;
//! struct Stream;
//! impl MediaStream for Stream { fn stop(&mut self) {} }
//! impl CaptureDevice for Camera {
//!     type Stream = Stream;
//!     fn request_stream(&mut self, _: AttemptId) -> Result<(), AcquisitionFault> { Ok(()) }
//! }
//!
//! struct Gps;
//! struct Watch;
//! impl LocationWatch for Watch { fn cancel(&mut self) {} }
//! impl LocationSource for Gps {
//!     type Watch = Watch;
//!     fn watch(&mut self, _: AttemptId, _: WatchOptions) -> Result<Watch, AcquisitionFault> { Ok(Watch) }
//! }
//!
//! let clock = FixedTime::new(1_000);
//! let mut session = Session::new(
//!     Camera, Gps, FixedEphemeris::new(200.0, 30.0), &clock, GuideConfig::default(),
//! ).unwrap();
//!
//! let attempt = session.begin().unwrap();
//! session.stream_ready(attempt, Stream);
//! session.location_fix(attempt, LocationFix::new(GeoPosition::new(51.5, -0.1), 1_000));
//! assert_eq!(session.state(), SessionState::Active);
//!
//! session.orientation(OrientationSample::new(Orientation::known(200.0, 60.0, 0.0), 1_010));
//! assert!(session.guidance().in_view);
//! ```

use core::fmt;

use crate::{
    acquisition::{AcquisitionJoin, AttemptId, WatchOptions},
    blessing::{self, BlessingState, BlessingTicket, BlessingText},
    config::{GuideConfig, SessionConfig},
    errors::{
        AcquisitionError, AcquisitionErrorKind, AcquisitionFault, BlessingError, ConfigResult,
        SessionError, SessionResult,
    },
    events::SessionEvent,
    filter::OrientationFilter,
    guidance::{DirectionHint, GuidanceCalculator, GuidanceResult},
    orientation::{LocationFix, MoonSnapshot, Orientation, OrientationSample},
    time::{elapsed_ms, TimeSource, Timestamp},
    traits::{CaptureDevice, LocationSource, LocationWatch, MediaStream, MoonEphemeris},
};

/// Lifecycle state of a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// Idle, waiting for the user to start
    #[default]
    AwaitingPermissions,
    /// Camera and location acquisition in flight
    Calibrating,
    /// Guiding the user toward the Moon
    Active,
    /// Acquisition failed; the cause is available from [`Session::failure`]
    Failed,
}

impl SessionState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingPermissions => "awaiting-permissions",
            Self::Calibrating => "calibrating",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the guidance overlay should show right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readiness {
    /// Not searching
    Inactive,
    /// Searching, but no heading or Moon position yet
    WaitingForSensors,
    /// Guidance available
    Guiding(GuidanceResult),
}

/// One Moon search
pub struct Session<C, L, E, K>
where
    C: CaptureDevice,
    L: LocationSource,
{
    capture: C,
    locator: L,
    calculator: GuidanceCalculator<E>,
    clock: K,
    config: SessionConfig,
    filter: OrientationFilter,

    state: SessionState,
    attempt: AttemptId,
    attempt_started_at: Timestamp,
    join: AcquisitionJoin<C::Stream>,
    stream: Option<C::Stream>,
    watch: Option<L::Watch>,
    failure: Option<AcquisitionError>,

    raw_orientation: Option<Orientation>,
    location: Option<LocationFix>,
    moon: Option<MoonSnapshot>,
    blessing: BlessingState,
    tickets_issued: u32,
}

impl<C, L, E, K> Session<C, L, E, K>
where
    C: CaptureDevice,
    L: LocationSource,
    E: MoonEphemeris,
    K: TimeSource,
{
    /// Create an idle session from a validated config
    pub fn new(capture: C, locator: L, ephemeris: E, clock: K, config: GuideConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            capture,
            locator,
            calculator: GuidanceCalculator::new(ephemeris, config.guidance)?,
            clock,
            config: config.session,
            filter: OrientationFilter::new(config.filter)?,
            state: SessionState::AwaitingPermissions,
            attempt: AttemptId::NONE,
            attempt_started_at: 0,
            join: AcquisitionJoin::new(),
            stream: None,
            watch: None,
            failure: None,
            raw_orientation: None,
            location: None,
            moon: None,
            blessing: BlessingState::Idle,
            tickets_issued: 0,
        })
    }

    // ----- lifecycle -----

    /// Start a search: request the camera and start watching location
    ///
    /// A request that cannot even be issued fails the session immediately;
    /// the returned attempt id is still the one completions must carry.
    pub fn begin(&mut self) -> SessionResult<AttemptId> {
        self.expect_state(SessionState::AwaitingPermissions, "begin")?;

        self.attempt = self.attempt.next();
        self.attempt_started_at = self.clock.now();
        self.failure = None;
        self.clear_derived();

        let attempt = self.attempt;
        log_info!("starting acquisition attempt {}", attempt.get());

        if let Err(fault) = self.capture.request_stream(attempt) {
            self.fail(AcquisitionError::camera(fault));
            return Ok(attempt);
        }

        match self.locator.watch(attempt, WatchOptions::from(&self.config)) {
            Ok(watch) => self.watch = Some(watch),
            Err(fault) => {
                self.fail(AcquisitionError::location(fault));
                return Ok(attempt);
            }
        }

        self.transition(SessionState::Calibrating);
        Ok(attempt)
    }

    /// End the search from any state, releasing every resource
    pub fn finish(&mut self) {
        self.release();
        self.clear_derived();
        self.failure = None;
        if self.state != SessionState::AwaitingPermissions {
            self.transition(SessionState::AwaitingPermissions);
        }
    }

    /// Leave `Failed` so the user can begin again
    pub fn retry(&mut self) -> SessionResult<()> {
        self.expect_state(SessionState::Failed, "retry")?;
        self.failure = None;
        self.transition(SessionState::AwaitingPermissions);
        Ok(())
    }

    // ----- acquisition completions -----

    /// The camera stream for `attempt` is live
    pub fn stream_ready(&mut self, attempt: AttemptId, mut stream: C::Stream) {
        if !self.is_calibrating(attempt) {
            log_debug!("discarding stream from attempt {} in state {}", attempt.get(), self.state);
            stream.stop();
            return;
        }

        if let Some(mut duplicate) = self.join.set_stream(stream) {
            log_debug!("second stream for attempt {}, stopping the first", attempt.get());
            duplicate.stop();
        }
        self.try_activate();
    }

    /// The camera request for `attempt` failed
    pub fn stream_failed(&mut self, attempt: AttemptId, fault: AcquisitionFault) {
        if !self.is_calibrating(attempt) {
            log_debug!("ignoring stream failure from attempt {}", attempt.get());
            return;
        }
        self.fail(AcquisitionError::camera(fault));
    }

    /// The location watch for `attempt` delivered a fix
    pub fn location_fix(&mut self, attempt: AttemptId, fix: LocationFix) {
        if attempt != self.attempt {
            log_debug!("ignoring fix from attempt {}", attempt.get());
            return;
        }
        if !fix.position.is_valid() {
            log_debug!("ignoring invalid position");
            return;
        }

        match self.state {
            SessionState::Calibrating => {
                if self.is_cached(&fix) {
                    log_debug!(
                        "rejecting cached fix measured at {} (attempt started at {})",
                        fix.measured_at,
                        self.attempt_started_at
                    );
                    return;
                }
                self.location = Some(fix);
                self.join.offer_fix(fix);
                self.try_activate();
            }
            SessionState::Active => {
                self.location = Some(fix);
                self.refresh_moon(self.clock.now());
            }
            _ => log_debug!("ignoring fix in state {}", self.state),
        }
    }

    /// The location watch for `attempt` reported a failure
    pub fn location_failed(&mut self, attempt: AttemptId, fault: AcquisitionFault) {
        if attempt != self.attempt {
            log_debug!("ignoring location failure from attempt {}", attempt.get());
            return;
        }

        match self.state {
            SessionState::Calibrating => self.fail(AcquisitionError::location(fault)),
            SessionState::Active => {
                log_warn!("location update failed while guiding ({:?}), keeping last fix", fault);
            }
            _ => log_debug!("ignoring location failure in state {}", self.state),
        }
    }

    /// Advance time: enforces the location timeout and keeps the Moon current
    pub fn tick(&mut self, now: Timestamp) {
        match self.state {
            SessionState::Calibrating => {
                let waited = elapsed_ms(self.attempt_started_at, now);
                if self.join.first_fix().is_none() && waited >= self.config.location_timeout_ms {
                    log_warn!("no location fix after {} ms", waited);
                    self.fail(AcquisitionError::location(AcquisitionFault::Timeout));
                }
            }
            SessionState::Active => self.refresh_moon(now),
            _ => {}
        }
    }

    // ----- sensors -----

    /// Feed a raw orientation sample
    ///
    /// Samples are only consumed while guiding.
    pub fn orientation(&mut self, sample: OrientationSample) {
        if self.state != SessionState::Active {
            log_debug!("ignoring orientation sample in state {}", self.state);
            return;
        }
        self.raw_orientation = Some(sample.orientation);
        self.filter.update(sample.orientation);
    }

    // ----- blessing -----

    /// Ask for a blessing once the Moon is in view
    pub fn request_blessing(&mut self) -> SessionResult<BlessingTicket> {
        self.expect_state(SessionState::Active, "request a blessing")?;
        if !self.guidance().in_view {
            return Err(SessionError::NotInView);
        }
        if self.blessing.is_pending() {
            return Err(SessionError::BlessingPending);
        }

        self.tickets_issued = self.tickets_issued.wrapping_add(1);
        let ticket = BlessingTicket::new(self.tickets_issued);
        self.blessing = BlessingState::Pending(ticket);
        log_debug!("requested {}", ticket);
        Ok(ticket)
    }

    /// Deliver the provider's result for `ticket`
    ///
    /// Failures become the fallback text. Returns `false` if the ticket is no
    /// longer pending (the session was reset or the request superseded).
    pub fn complete_blessing(&mut self, ticket: BlessingTicket, result: Result<BlessingText, BlessingError>) -> bool {
        if self.blessing != BlessingState::Pending(ticket) {
            log_debug!("discarding result for stale {}", ticket);
            return false;
        }
        self.blessing = BlessingState::Ready(blessing::resolve(result));
        true
    }

    /// Hide a shown blessing
    pub fn dismiss_blessing(&mut self) {
        if matches!(self.blessing, BlessingState::Ready(_)) {
            self.blessing = BlessingState::Idle;
        }
    }

    // ----- event dispatch -----

    /// Apply one event
    ///
    /// Only user actions can be rejected; completions that do not fit the
    /// current state are discarded as described in the module docs.
    pub fn handle(&mut self, event: SessionEvent<C::Stream>) -> SessionResult<()> {
        match event {
            SessionEvent::Begin => self.begin().map(|_| ()),
            SessionEvent::Finish => {
                self.finish();
                Ok(())
            }
            SessionEvent::Retry => self.retry(),
            SessionEvent::Orientation(sample) => {
                self.orientation(sample);
                Ok(())
            }
            SessionEvent::LocationFix { attempt, fix } => {
                self.location_fix(attempt, fix);
                Ok(())
            }
            SessionEvent::LocationFailed { attempt, fault } => {
                self.location_failed(attempt, fault);
                Ok(())
            }
            SessionEvent::StreamReady { attempt, stream } => {
                self.stream_ready(attempt, stream);
                Ok(())
            }
            SessionEvent::StreamFailed { attempt, fault } => {
                self.stream_failed(attempt, fault);
                Ok(())
            }
            SessionEvent::Tick(now) => {
                self.tick(now);
                Ok(())
            }
            SessionEvent::BlessingReceived { ticket, result } => {
                self.complete_blessing(ticket, result);
                Ok(())
            }
        }
    }

    // ----- queries -----

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current acquisition attempt
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Guiding as soon as the Moon and a heading are known
    ///
    /// A heading without pitch guides with the neutral result.
    pub fn readiness(&self) -> Readiness {
        if self.state != SessionState::Active {
            return Readiness::Inactive;
        }
        let smoothed = self.filter.current().unwrap_or(Orientation::UNKNOWN);
        let heading = smoothed.heading.filter(|h| h.is_finite());
        match (&self.moon, heading) {
            (Some(moon), Some(_)) => Readiness::Guiding(self.calculator.compute(&smoothed, Some(&moon.position))),
            _ => Readiness::WaitingForSensors,
        }
    }

    /// Guidance for the current smoothed orientation; neutral unless guiding
    pub fn guidance(&self) -> GuidanceResult {
        match self.readiness() {
            Readiness::Guiding(result) => result,
            _ => GuidanceResult::NEUTRAL,
        }
    }

    pub fn hint(&self) -> DirectionHint {
        self.guidance().hint(self.calculator.config().view_threshold_deg)
    }

    /// Stored acquisition failure, if the session is `Failed`
    pub fn failure(&self) -> Option<AcquisitionError> {
        self.failure
    }

    pub fn failure_kind(&self) -> Option<AcquisitionErrorKind> {
        self.failure.map(|f| f.kind())
    }

    /// Message for the failure screen
    pub fn failure_message(&self) -> Option<&'static str> {
        self.failure_kind().map(|k| k.user_message())
    }

    pub fn raw_orientation(&self) -> Option<Orientation> {
        self.raw_orientation
    }

    pub fn smoothed_orientation(&self) -> Option<Orientation> {
        self.filter.current()
    }

    pub fn location(&self) -> Option<&LocationFix> {
        self.location.as_ref()
    }

    pub fn moon(&self) -> Option<&MoonSnapshot> {
        self.moon.as_ref()
    }

    pub fn blessing(&self) -> &BlessingState {
        &self.blessing
    }

    /// The live camera stream while guiding
    pub fn stream(&self) -> Option<&C::Stream> {
        self.stream.as_ref()
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn calculator(&self) -> &GuidanceCalculator<E> {
        &self.calculator
    }

    // ----- internals -----

    fn expect_state(&self, expected: SessionState, action: &'static str) -> SessionResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { state: self.state, action })
        }
    }

    fn transition(&mut self, to: SessionState) {
        log_info!("session {} -> {}", self.state, to);
        self.state = to;
    }

    fn is_calibrating(&self, attempt: AttemptId) -> bool {
        self.state == SessionState::Calibrating && attempt == self.attempt
    }

    fn is_cached(&self, fix: &LocationFix) -> bool {
        fix.measured_at.saturating_add(self.config.max_fix_age_ms) < self.attempt_started_at
    }

    fn try_activate(&mut self) {
        let Some((stream, _first)) = self.join.take_complete() else {
            return;
        };
        self.stream = Some(stream);
        self.refresh_moon(self.clock.now());
        self.transition(SessionState::Active);
    }

    fn refresh_moon(&mut self, at: Timestamp) {
        if let Some(fix) = self.location {
            self.moon = Some(self.calculator.moon_snapshot(fix.position, at));
        }
    }

    fn fail(&mut self, error: AcquisitionError) {
        log_warn!("{} ({:?})", error, error.kind());
        self.release();
        self.clear_derived();
        self.failure = Some(error);
        self.transition(SessionState::Failed);
    }

    fn clear_derived(&mut self) {
        self.filter.reset();
        self.raw_orientation = None;
        self.location = None;
        self.moon = None;
        self.blessing = BlessingState::Idle;
    }
}

impl<C, L, E, K> Session<C, L, E, K>
where
    C: CaptureDevice,
    L: LocationSource,
{
    /// Stop every stream and cancel the watch; safe to repeat
    fn release(&mut self) {
        if let Some(mut stream) = self.join.clear() {
            stream.stop();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        if let Some(mut watch) = self.watch.take() {
            watch.cancel();
        }
    }
}

impl<C, L, E, K> Drop for Session<C, L, E, K>
where
    C: CaptureDevice,
    L: LocationSource,
{
    fn drop(&mut self) {
        self.release();
    }
}

impl<C, L, E, K> fmt::Debug for Session<C, L, E, K>
where
    C: CaptureDevice,
    L: LocationSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("attempt", &self.attempt)
            .field("failure", &self.failure)
            .field("streaming", &self.stream.is_some())
            .field("watching", &self.watch.is_some())
            .field("location", &self.location)
            .field("moon", &self.moon)
            .field("blessing", &self.blessing)
            .finish()
    }
}
