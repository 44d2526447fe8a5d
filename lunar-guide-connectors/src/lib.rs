//! Network Collaborators for Lunar Guide
//!
//! ## Overview
//!
//! The guidance core is platform-free; everything that talks to the network
//! lives here. Today that is one collaborator: the blessing text shown once
//! the user has found the Moon, generated by a remote language model.
//!
//! ```text
//! Session ──request_blessing()──→ ticket
//!    ↑                              │
//!    │                              ↓
//!    └──complete_blessing()── HttpBlessingProvider ──POST──→ generateContent
//!                                   │
//!                                   └─ any failure → fallback text
//! ```
//!
//! ## Failure Model
//!
//! A blessing is decoration. The provider never blocks guidance and never
//! surfaces an error to the user:
//! - No API key configured: no request is made at all
//! - Transport errors, 5xx and 429: retried with exponential backoff
//! - Anything else, or retries exhausted: the session shows the fallback
//!
//! Every failure is mapped into the core's small `Copy`
//! [`BlessingError`](lunar_guide_core::errors::BlessingError) at the trait
//! seam; the richer [`HttpError`] stays here for logging.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lunar_guide_connectors::{BlessingHttpConfig, HttpBlessingProvider};
//! use lunar_guide_core::blessing::fetch_or_fallback;
//!
//! let config = BlessingHttpConfig::from_env().timeout_secs(5);
//! let mut provider = HttpBlessingProvider::new(config)?;
//!
//! // Never fails: falls back to the default blessing
//! let text = fetch_or_fallback(&mut provider);
//! println!("{text}");
//! # Ok::<(), lunar_guide_connectors::HttpError>(())
//! ```

pub mod config;

#[cfg(feature = "http")]
pub mod http;

pub use config::BlessingHttpConfig;

#[cfg(feature = "http")]
pub use http::HttpBlessingProvider;

use lunar_guide_core::errors::BlessingError;
use thiserror::Error;

/// Blessing service errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Response decoded but carried no text
    #[error("Response contained no text")]
    MissingText,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HttpError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::ServerError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<HttpError> for BlessingError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(_) => BlessingError::Transport { reason: "request failed" },
            HttpError::ServerError { status, .. } => BlessingError::Status { status },
            HttpError::Serialization(_) => BlessingError::Transport { reason: "malformed response" },
            HttpError::MissingText => BlessingError::EmptyResponse,
            HttpError::Config(_) => BlessingError::NotConfigured,
        }
    }
}

/// Request statistics for a connector
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Requests answered with usable text
    pub requests_succeeded: u64,
    /// Requests that ended in an error after all retries
    pub requests_failed: u64,
    /// Retries performed
    pub retries: u64,
    /// Calls answered without a request because no key is configured
    pub skipped_unconfigured: u64,
    /// Last error message
    pub last_error: Option<String>,
}
