//! Collaborator traits
//!
//! The guidance core owns no platform code. Everything it needs from the
//! outside world comes in through these seams:
//!
//! - [`MoonEphemeris`]: where the Moon is, for a time and place
//! - [`CaptureDevice`] / [`MediaStream`]: the camera feed behind the overlay
//! - [`LocationSource`] / [`LocationWatch`]: the observer's position
//! - [`BlessingProvider`]: the text shown once the Moon is found
//!
//! Acquisition is asynchronous on every real platform, but the session is
//! single-threaded and event-driven: `request_stream` and `watch` only *start*
//! an acquisition. Completions come back later as
//! [`SessionEvent`](crate::events::SessionEvent)s tagged with the
//! [`AttemptId`] they were started under.
//!
//! Keep these traits small. Hosts implement them over browser APIs, mobile
//! SDKs, or test doubles; none of them should need more than a handful of
//! lines.

use crate::{
    acquisition::{AttemptId, WatchOptions},
    blessing::BlessingText,
    errors::{AcquisitionFault, BlessingError},
    time::Timestamp,
};

/// Horizontal coordinates in radians as produced by an ephemeris
///
/// Azimuth follows the common astronomical-library convention of measuring
/// from south toward west; [`crate::ephemeris::celestial_from_horizontal`]
/// converts to the north-referenced degrees used everywhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    pub azimuth_rad: f64,
    pub altitude_rad: f64,
}

/// Moon position capability
///
/// Injected into the guidance calculator so tests can substitute a
/// deterministic double such as [`crate::ephemeris::FixedEphemeris`].
pub trait MoonEphemeris {
    /// Moon position for an observer at `latitude`/`longitude` at `timestamp`
    fn position_of(&self, timestamp: Timestamp, latitude: f64, longitude: f64) -> HorizontalCoordinates;

    /// Illuminated fraction of the Moon's disc at `timestamp`, `[0, 1]`
    fn illumination_of(&self, timestamp: Timestamp) -> f64;
}

/// A live video capture stream
pub trait MediaStream {
    /// Stop every track of the stream. Must be safe to call more than once.
    fn stop(&mut self);
}

/// Source of camera streams
pub trait CaptureDevice {
    /// Stream type delivered on success
    type Stream: MediaStream;

    /// Start acquiring the rear camera
    ///
    /// The stream (or a failure) is delivered later as an event tagged with
    /// `attempt`. An `Err` here means the request could not even be issued.
    fn request_stream(&mut self, attempt: AttemptId) -> Result<(), AcquisitionFault>;
}

/// A live location subscription
pub trait LocationWatch {
    /// Cancel the subscription. Must be safe to call more than once.
    fn cancel(&mut self);
}

/// Source of location fixes
pub trait LocationSource {
    /// Subscription handle type
    type Watch: LocationWatch;

    /// Start a location subscription
    ///
    /// The handle is returned immediately so it can be cancelled even if no
    /// fix ever arrives. Fixes and failures are delivered later as events
    /// tagged with `attempt`.
    fn watch(&mut self, attempt: AttemptId, options: WatchOptions) -> Result<Self::Watch, AcquisitionFault>;
}

/// Source of blessing text
pub trait BlessingProvider {
    /// Produce one blessing sentence
    fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError>;
}

impl<P: BlessingProvider + ?Sized> BlessingProvider for &mut P {
    fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError> {
        (**self).fetch_blessing()
    }
}
