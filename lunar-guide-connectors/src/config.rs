//! Blessing service configuration

use std::time::Duration;

use crate::HttpError;

/// Environment variable holding the generative-language API key
pub const API_KEY_ENV: &str = "API_KEY";

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default text model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Prompt sent for every blessing
pub const DEFAULT_PROMPT: &str =
    "Write a short, poetic one-sentence blessing for someone who has just found the moon in the sky.";

/// Configuration for [`HttpBlessingProvider`](crate::http::HttpBlessingProvider)
#[derive(Clone, PartialEq)]
pub struct BlessingHttpConfig {
    /// Service root, without trailing path
    pub base_url: String,
    /// Model name inserted into the endpoint path
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// First retry delay; doubles on every further retry
    pub retry_backoff: Duration,
    /// API key; without one the provider never touches the network
    pub api_key: Option<String>,
    pub user_agent: String,
}

impl Default for BlessingHttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            prompt: DEFAULT_PROMPT.into(),
            temperature: 0.8,
            max_output_tokens: 50,
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_backoff: Duration::from_millis(200),
            api_key: None,
            user_agent: format!("LunarGuide/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BlessingHttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the key taken from `API_KEY`
    pub fn from_env() -> Self {
        Self::default().with_optional_api_key(std::env::var(API_KEY_ENV).ok())
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the key if present; blank keys count as absent
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn validate(&self) -> Result<(), HttpError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(HttpError::Config("base URL must start with http:// or https://".into()));
        }
        if self.model.trim().is_empty() {
            return Err(HttpError::Config("model name is empty".into()));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(HttpError::Config(format!("invalid temperature {}", self.temperature)));
        }
        if self.max_output_tokens == 0 {
            return Err(HttpError::Config("max_output_tokens must be non-zero".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BlessingHttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlessingHttpConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
