//! Blessing text shown once the Moon is found
//!
//! The text comes from a [`BlessingProvider`], usually a remote generative
//! service. Provider failures never reach the user: [`fetch_or_fallback`]
//! substitutes [`FALLBACK_BLESSING`] and logs the cause.
//!
//! Requests are asynchronous from the session's point of view. The session
//! hands out a [`BlessingTicket`] per request and only accepts a result
//! carrying the ticket of the request still pending.

use core::fmt;

use crate::{
    constants::buffers::MAX_BLESSING_LEN,
    errors::BlessingError,
    traits::BlessingProvider,
};

/// Bounded blessing text
pub type BlessingText = heapless::String<MAX_BLESSING_LEN>;

/// Shown whenever the provider cannot deliver
pub const FALLBACK_BLESSING: &str = "May the moon's gentle light bring peace and wonder to your night.";

/// Copy `text` into a [`BlessingText`], trimming whitespace
///
/// Text longer than the buffer is cut at the last char boundary that fits.
pub fn blessing_text(text: &str) -> BlessingText {
    let text = text.trim();
    let mut out = BlessingText::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// The fallback blessing as a [`BlessingText`]
pub fn fallback_blessing() -> BlessingText {
    blessing_text(FALLBACK_BLESSING)
}

/// Resolve a provider result, substituting the fallback on failure or empty text
pub fn resolve(result: Result<BlessingText, BlessingError>) -> BlessingText {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log_warn!("blessing provider returned empty text, using fallback");
            fallback_blessing()
        }
        Err(err) => {
            log_warn!("blessing unavailable ({}), using fallback", err);
            fallback_blessing()
        }
    }
}

/// Fetch a blessing, never failing
pub fn fetch_or_fallback<P: BlessingProvider + ?Sized>(provider: &mut P) -> BlessingText {
    resolve(provider.fetch_blessing())
}

/// Handle for one in-flight blessing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlessingTicket(u32);

impl BlessingTicket {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlessingTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blessing#{}", self.0)
    }
}

/// Blessing lifecycle inside an active session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlessingState {
    /// Nothing requested, or the last blessing was dismissed
    #[default]
    Idle,
    /// A request is in flight
    Pending(BlessingTicket),
    /// Text ready to display
    Ready(BlessingText),
}

impl BlessingState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Text to display, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Ready(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Provider that always returns the same text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBlessing {
    text: BlessingText,
}

impl StaticBlessing {
    pub fn new(text: &str) -> Self {
        Self { text: blessing_text(text) }
    }
}

impl Default for StaticBlessing {
    fn default() -> Self {
        Self { text: fallback_blessing() }
    }
}

impl BlessingProvider for StaticBlessing {
    fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(BlessingError);

    impl BlessingProvider for Failing {
        fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError> {
            Err(self.0)
        }
    }

    #[test]
    fn fallback_fits_the_buffer() {
        assert_eq!(fallback_blessing().as_str(), FALLBACK_BLESSING);
    }

    #[test]
    fn long_text_is_truncated_on_char_boundary() {
        let long: std::string::String = core::iter::repeat('é').take(MAX_BLESSING_LEN).collect();
        let text = blessing_text(&long);
        assert!(text.len() <= MAX_BLESSING_LEN);
        assert_eq!(text.len() % 2, 0);
        assert!(text.chars().all(|c| c == 'é'));
    }

    #[test]
    fn provider_failure_yields_fallback() {
        for err in [
            BlessingError::NotConfigured,
            BlessingError::Transport { reason: "connection reset" },
            BlessingError::Status { status: 503 },
        ] {
            assert_eq!(fetch_or_fallback(&mut Failing(err)).as_str(), FALLBACK_BLESSING);
        }
    }

    #[test]
    fn empty_text_yields_fallback() {
        let mut provider = StaticBlessing::new("   ");
        assert_eq!(fetch_or_fallback(&mut provider).as_str(), FALLBACK_BLESSING);
    }

    #[test]
    fn provider_text_is_used_when_present() {
        let mut provider = StaticBlessing::new("  Silver light finds you.\n");
        assert_eq!(fetch_or_fallback(&mut provider).as_str(), "Silver light finds you.");
    }

    #[test]
    fn state_helpers() {
        assert!(BlessingState::Pending(BlessingTicket::new(1)).is_pending());
        assert_eq!(BlessingState::Idle.text(), None);
        assert_eq!(BlessingState::Ready(blessing_text("hi")).text(), Some("hi"));
    }
}
