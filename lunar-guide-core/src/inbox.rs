//! Bounded Event Inbox
//!
//! ## Overview
//!
//! A fixed-capacity FIFO between the host's event sources and the session.
//! Sensor callbacks, timers and network completions push; the host's frame
//! loop drains into [`Session::handle`](crate::session::Session::handle).
//!
//! ```text
//!  push ──→ ┌──────┬──────┬──────┬──────┬──────┐ ──→ pop
//!           │ Begin│StrmRd│Orient│ Fix  │Orient│
//!           └──────┴──────┴──────┴──────┴──────┘
//!                                          ↑
//!                         next Orientation replaces this one
//! ```
//!
//! ## Back-Pressure
//!
//! No allocation, so the inbox can fill up. Two rules keep that safe:
//!
//! 1. A new orientation sample replaces an orientation sample sitting at
//!    the tail. Only consecutive samples merge, so ordering relative to
//!    lifecycle events is preserved.
//! 2. Any other event that does not fit is handed back to the caller.
//!    Lifecycle events are never dropped silently.

use heapless::Deque;

use crate::{
    constants::buffers::DEFAULT_INBOX_CAPACITY,
    events::SessionEvent,
};

/// Default inbox size
pub type DefaultInbox<S> = EventInbox<S, DEFAULT_INBOX_CAPACITY>;

/// Bounded FIFO of session events
#[derive(Debug)]
pub struct EventInbox<S, const N: usize> {
    queue: Deque<SessionEvent<S>, N>,
    stats: InboxStats,
}

/// Inbox counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboxStats {
    /// Events accepted into the queue
    pub pushed: u32,
    /// Events handed out
    pub popped: u32,
    /// Orientation samples merged into the previous tail sample
    pub coalesced: u32,
    /// Events handed back because the queue was full
    pub rejected: u32,
    /// Deepest the queue has been
    pub max_depth: u32,
}

impl<S, const N: usize> Default for EventInbox<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, const N: usize> EventInbox<S, N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            stats: InboxStats {
                pushed: 0,
                popped: 0,
                coalesced: 0,
                rejected: 0,
                max_depth: 0,
            },
        }
    }

    /// Queue an event
    ///
    /// Returns the event back if it could not be queued.
    pub fn push(&mut self, event: SessionEvent<S>) -> Result<(), SessionEvent<S>> {
        if let SessionEvent::Orientation(sample) = &event {
            if let Some(SessionEvent::Orientation(tail)) = self.queue.back_mut() {
                *tail = *sample;
                self.stats.coalesced = self.stats.coalesced.saturating_add(1);
                return Ok(());
            }
        }

        match self.queue.push_back(event) {
            Ok(()) => {
                self.stats.pushed = self.stats.pushed.saturating_add(1);
                self.stats.max_depth = self.stats.max_depth.max(self.queue.len() as u32);
                Ok(())
            }
            Err(event) => {
                self.stats.rejected = self.stats.rejected.saturating_add(1);
                log_warn!("event inbox full, rejecting {:?}", event.kind());
                Err(event)
            }
        }
    }

    /// Take the oldest event
    pub fn pop(&mut self) -> Option<SessionEvent<S>> {
        let event = self.queue.pop_front()?;
        self.stats.popped = self.stats.popped.saturating_add(1);
        Some(event)
    }

    /// Drain every queued event in order
    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent<S>> + '_ {
        core::iter::from_fn(move || self.pop())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn stats(&self) -> InboxStats {
        self.stats
    }
}
