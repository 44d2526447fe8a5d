//! Session Events
//!
//! ## Overview
//!
//! Everything that can happen to a search session arrives as a
//! [`SessionEvent`]. Hosts either call the matching [`Session`] method
//! directly or queue events in an [`EventInbox`] and drain it into
//! [`Session::handle`] once per frame.
//!
//! ```text
//! user taps      ─→ Begin / Finish / Retry
//! sensors        ─→ Orientation
//! location watch ─→ LocationFix / LocationFailed     ┐
//! camera         ─→ StreamReady / StreamFailed        ├─ tagged with AttemptId
//! host timer     ─→ Tick                              ┘
//! text provider  ─→ BlessingReceived                  ─ tagged with BlessingTicket
//! ```
//!
//! ## Ordering
//!
//! Lifecycle events must be applied in the order they happened. Only
//! orientation samples may be merged: the inbox replaces an orientation
//! sample at its tail with a newer one, so a backlog of poses collapses to
//! the latest while events around it keep their order.
//!
//! [`Session`]: crate::session::Session
//! [`Session::handle`]: crate::session::Session::handle
//! [`EventInbox`]: crate::inbox::EventInbox

use crate::{
    acquisition::AttemptId,
    blessing::{BlessingTicket, BlessingText},
    errors::{AcquisitionFault, BlessingError},
    orientation::{LocationFix, OrientationSample},
    time::Timestamp,
};

/// One thing that happened to a session
///
/// `S` is the camera stream type delivered by the host's capture device.
#[derive(Debug)]
pub enum SessionEvent<S> {
    /// User asked to start searching
    Begin,
    /// User ended the search
    Finish,
    /// User retried after a failure
    Retry,
    /// Raw device orientation reading
    Orientation(OrientationSample),
    /// Location watch produced a fix
    LocationFix { attempt: AttemptId, fix: LocationFix },
    /// Location watch reported a failure
    LocationFailed { attempt: AttemptId, fault: AcquisitionFault },
    /// Camera stream acquired
    StreamReady { attempt: AttemptId, stream: S },
    /// Camera stream request failed
    StreamFailed { attempt: AttemptId, fault: AcquisitionFault },
    /// Host clock tick, drives acquisition timeouts
    Tick(Timestamp),
    /// Blessing provider finished
    BlessingReceived {
        ticket: BlessingTicket,
        result: Result<BlessingText, BlessingError>,
    },
}

/// Event discriminant, for logging and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Begin,
    Finish,
    Retry,
    Orientation,
    LocationFix,
    LocationFailed,
    StreamReady,
    StreamFailed,
    Tick,
    BlessingReceived,
}

impl<S> SessionEvent<S> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Begin => EventKind::Begin,
            Self::Finish => EventKind::Finish,
            Self::Retry => EventKind::Retry,
            Self::Orientation(_) => EventKind::Orientation,
            Self::LocationFix { .. } => EventKind::LocationFix,
            Self::LocationFailed { .. } => EventKind::LocationFailed,
            Self::StreamReady { .. } => EventKind::StreamReady,
            Self::StreamFailed { .. } => EventKind::StreamFailed,
            Self::Tick(_) => EventKind::Tick,
            Self::BlessingReceived { .. } => EventKind::BlessingReceived,
        }
    }

    /// Acquisition attempt this event belongs to, if any
    pub fn attempt(&self) -> Option<AttemptId> {
        match self {
            Self::LocationFix { attempt, .. }
            | Self::LocationFailed { attempt, .. }
            | Self::StreamReady { attempt, .. }
            | Self::StreamFailed { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }

    /// High-rate sensor data that may be merged under pressure
    pub fn is_coalescible(&self) -> bool {
        matches!(self, Self::Orientation(_))
    }
}

impl<S> From<OrientationSample> for SessionEvent<S> {
    fn from(sample: OrientationSample) -> Self {
        Self::Orientation(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{GeoPosition, Orientation};

    #[test]
    fn attempt_is_exposed_for_acquisition_events() {
        let attempt = AttemptId::new(3);
        let fix = LocationFix::new(GeoPosition::new(0.0, 0.0), 0);

        let event: SessionEvent<()> = SessionEvent::LocationFix { attempt, fix };
        assert_eq!(event.attempt(), Some(attempt));
        assert_eq!(event.kind(), EventKind::LocationFix);

        let event: SessionEvent<()> = SessionEvent::Tick(10);
        assert_eq!(event.attempt(), None);
    }

    #[test]
    fn only_orientation_is_coalescible() {
        let sample = OrientationSample::new(Orientation::known(1.0, 2.0, 3.0), 5);
        let event: SessionEvent<()> = sample.into();
        assert!(event.is_coalescible());
        assert!(!SessionEvent::<()>::Begin.is_coalescible());
        assert!(!SessionEvent::<()>::Tick(0).is_coalescible());
    }
}
