//! Acquisition bookkeeping
//!
//! A search needs two independent resources before guidance can start: a
//! camera stream and a first location fix. Both arrive asynchronously and in
//! either order. [`AcquisitionJoin`] holds whichever arrived first and
//! reports completion once both are present.
//!
//! Every `begin`/`retry` opens a new [`AttemptId`]. Completions carry the id
//! they were started under, so a completion from an abandoned attempt can be
//! recognized and discarded instead of leaking into the current one.

use crate::{
    config::SessionConfig,
    orientation::LocationFix,
};

/// Identifier of one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttemptId(u32);

impl AttemptId {
    /// Id before any attempt has been made
    pub const NONE: Self = Self(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id following this one
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Options passed to the location source when a watch starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchOptions {
    /// Ask for the most accurate positioning mode
    pub high_accuracy: bool,
    /// Bounded wait for a fix (milliseconds)
    pub timeout_ms: u64,
    /// Maximum age of a cached fix the source may return (milliseconds)
    pub max_age_ms: u64,
}

impl From<&SessionConfig> for WatchOptions {
    fn from(config: &SessionConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout_ms: config.location_timeout_ms,
            max_age_ms: config.max_fix_age_ms,
        }
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

/// Join of the camera stream and the first location fix
#[derive(Debug)]
pub struct AcquisitionJoin<S> {
    stream: Option<S>,
    first_fix: Option<LocationFix>,
}

impl<S> Default for AcquisitionJoin<S> {
    fn default() -> Self {
        Self { stream: None, first_fix: None }
    }
}

impl<S> AcquisitionJoin<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the stream; returns the previous one if a second arrived
    pub fn set_stream(&mut self, stream: S) -> Option<S> {
        self.stream.replace(stream)
    }

    /// Record a fix; only the first one is kept
    ///
    /// Returns `true` if this was the first fix.
    pub fn offer_fix(&mut self, fix: LocationFix) -> bool {
        if self.first_fix.is_some() {
            return false;
        }
        self.first_fix = Some(fix);
        true
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn first_fix(&self) -> Option<&LocationFix> {
        self.first_fix.as_ref()
    }

    /// Both resources are present
    pub fn is_complete(&self) -> bool {
        self.stream.is_some() && self.first_fix.is_some()
    }

    /// Hand both resources out once complete, leaving the join empty
    pub fn take_complete(&mut self) -> Option<(S, LocationFix)> {
        if !self.is_complete() {
            return None;
        }
        match (self.stream.take(), self.first_fix.take()) {
            (Some(stream), Some(fix)) => Some((stream, fix)),
            _ => None,
        }
    }

    /// Drop the fix and hand back the stream, if any, so it can be stopped
    pub fn clear(&mut self) -> Option<S> {
        self.first_fix = None;
        self.stream.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::GeoPosition;

    fn fix(at: u64) -> LocationFix {
        LocationFix::new(GeoPosition::new(10.0, 20.0), at)
    }

    #[test]
    fn attempt_ids_advance() {
        let first = AttemptId::NONE.next();
        assert_eq!(first.get(), 1);
        assert!(first.next() > first);
    }

    #[test]
    fn watch_options_follow_session_config() {
        let config = SessionConfig::default().with_location_timeout_ms(9_000);
        let options = WatchOptions::from(&config);
        assert_eq!(options.timeout_ms, 9_000);
        assert_eq!(options.max_age_ms, 0);
        assert!(options.high_accuracy);
    }

    #[test]
    fn join_completes_in_either_order() {
        let mut a: AcquisitionJoin<u8> = AcquisitionJoin::new();
        a.set_stream(1);
        assert!(!a.is_complete());
        a.offer_fix(fix(5));
        assert!(a.is_complete());

        let mut b: AcquisitionJoin<u8> = AcquisitionJoin::new();
        b.offer_fix(fix(5));
        b.set_stream(1);
        assert_eq!(b.take_complete(), Some((1, fix(5))));
        assert!(!b.has_stream());
    }

    #[test]
    fn only_first_fix_is_kept() {
        let mut join: AcquisitionJoin<u8> = AcquisitionJoin::new();
        assert!(join.offer_fix(fix(1)));
        assert!(!join.offer_fix(fix(2)));
        assert_eq!(join.first_fix(), Some(&fix(1)));
    }

    #[test]
    fn clear_returns_stream_for_release() {
        let mut join: AcquisitionJoin<u8> = AcquisitionJoin::new();
        join.set_stream(7);
        join.offer_fix(fix(1));

        assert_eq!(join.clear(), Some(7));
        assert!(join.first_fix().is_none());
        assert_eq!(join.clear(), None);
    }
}
