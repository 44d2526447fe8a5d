//! HTTP Blessing Provider
//!
//! ## Overview
//!
//! Generates the blessing with one blocking `generateContent` call against a
//! generative-language REST API, using the lightweight `ureq` client.
//!
//! ```text
//! POST {base}/v1beta/models/{model}:generateContent
//! x-goog-api-key: {key}
//!
//! { "contents": [{ "parts": [{ "text": prompt }] }],
//!   "generationConfig": { "temperature": 0.8, "maxOutputTokens": 50 } }
//!
//! → { "candidates": [{ "content": { "parts": [{ "text": "..." }] } }] }
//! ```
//!
//! ## Retries
//!
//! Transport failures, `5xx` and `429` are retried with exponential backoff
//! (`retry_backoff`, `2×`, `4×`, ...). Client errors are returned at once.
//!
//! ## Threading
//!
//! The call blocks. Hosts run it off the UI timeline and deliver the result
//! back to the session as a
//! [`SessionEvent::BlessingReceived`](lunar_guide_core::events::SessionEvent::BlessingReceived).

use std::thread;

use lunar_guide_core::{
    blessing::{blessing_text, BlessingText},
    errors::BlessingError,
    traits::BlessingProvider,
};
use serde::{Deserialize, Serialize};

use crate::{BlessingHttpConfig, ConnectionStats, HttpError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined
    fn into_text(self) -> Result<String, HttpError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            Err(HttpError::MissingText)
        } else {
            Ok(text.to_string())
        }
    }
}

/// Blessing provider backed by a generative-language HTTP API
pub struct HttpBlessingProvider {
    config: BlessingHttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpBlessingProvider {
    /// Create a provider; the config is validated, credentials are optional
    pub fn new(config: BlessingHttpConfig) -> Result<Self, HttpError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent, stats: ConnectionStats::default() })
    }

    pub fn config(&self) -> &BlessingHttpConfig {
        &self.config
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Request one blessing, retrying transient failures
    pub fn generate(&mut self) -> Result<String, HttpError> {
        let key = match &self.config.api_key {
            Some(key) => key.clone(),
            None => return Err(HttpError::Config("no API key configured".into())),
        };

        let body = GenerateRequest {
            contents: [Content { parts: [RequestPart { text: &self.config.prompt }] }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };
        let url = self.config.endpoint();

        let mut attempt = 0;
        let result = loop {
            if attempt > 0 {
                let delay = self.config.retry_backoff * (1u32 << (attempt - 1).min(16));
                log::warn!("retrying blessing request in {:?} (retry {})", delay, attempt);
                thread::sleep(delay);
                self.stats.retries += 1;
            }

            match self.execute(&url, &key, &body) {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    log::debug!("transient blessing failure: {}", e);
                    attempt += 1;
                }
                other => break other,
            }
        };

        match &result {
            Ok(_) => self.stats.requests_succeeded += 1,
            Err(e) => {
                self.stats.requests_failed += 1;
                self.stats.last_error = Some(e.to_string());
            }
        }
        result
    }

    fn execute(&self, url: &str, key: &str, body: &GenerateRequest<'_>) -> Result<String, HttpError> {
        let response = self
            .agent
            .post(url)
            .set("x-goog-api-key", key)
            .set("Accept", "application/json")
            .send_json(body);

        match response {
            Ok(resp) => resp
                .into_json::<GenerateResponse>()
                .map_err(|e| HttpError::Serialization(e.to_string()))?
                .into_text(),
            Err(ureq::Error::Status(status, resp)) => Err(HttpError::ServerError {
                status,
                message: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(HttpError::Request(e.to_string())),
        }
    }
}

impl BlessingProvider for HttpBlessingProvider {
    fn fetch_blessing(&mut self) -> Result<BlessingText, BlessingError> {
        if !self.config.has_credentials() {
            self.stats.skipped_unconfigured += 1;
            return Err(BlessingError::NotConfigured);
        }

        match self.generate() {
            Ok(text) => Ok(blessing_text(&text)),
            Err(e) => {
                log::warn!("blessing request failed: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_guide_core::blessing::{fetch_or_fallback, FALLBACK_BLESSING};
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        time::Duration,
    };

    /// Serve canned `(status, body)` responses, one per connection
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut bodies = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);

                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let lower = line.to_ascii_lowercase();
                    if let Some(value) = lower.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let mut request_body = vec![0; content_length];
                reader.read_exact(&mut request_body).unwrap();
                bodies.push(String::from_utf8(request_body).unwrap());

                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
            }
            bodies
        });

        (base, handle)
    }

    fn config(base: &str) -> BlessingHttpConfig {
        BlessingHttpConfig::new()
            .base_url(base)
            .api_key("test-key")
            .retry_backoff(Duration::from_millis(1))
    }

    const OK_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"  May silver light guide you home. "}]}}]}"#;

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: [Content { parts: [RequestPart { text: "hello" }] }],
            generation_config: GenerationConfig { temperature: 0.8, max_output_tokens: 50 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 50);
    }

    #[test]
    fn response_without_candidates_is_missing_text() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(response.into_text(), Err(HttpError::MissingText)));
    }

    #[test]
    fn multi_part_response_is_joined() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Moon"},{"text":"light."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Moonlight.");
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(HttpBlessingProvider::new(BlessingHttpConfig::new().base_url("not-a-url")).is_err());
    }

    #[test]
    fn missing_key_skips_network() {
        let mut provider = HttpBlessingProvider::new(BlessingHttpConfig::new().base_url("http://127.0.0.1:9")).unwrap();

        assert_eq!(provider.fetch_blessing(), Err(BlessingError::NotConfigured));
        assert_eq!(fetch_or_fallback(&mut provider).as_str(), FALLBACK_BLESSING);
        assert_eq!(provider.stats().skipped_unconfigured, 2);
        assert_eq!(provider.stats().requests_failed, 0);
    }

    #[test]
    fn successful_request_returns_trimmed_text() {
        let (base, server) = serve(vec![(200, OK_BODY)]);
        let mut provider = HttpBlessingProvider::new(config(&base)).unwrap();

        let text = provider.fetch_blessing().unwrap();
        assert_eq!(text.as_str(), "May silver light guide you home.");

        let bodies = server.join().unwrap();
        assert!(bodies[0].contains("just found the moon"));
        assert_eq!(provider.stats().requests_succeeded, 1);
    }

    #[test]
    fn server_errors_are_retried() {
        let (base, server) = serve(vec![(503, "{}"), (200, OK_BODY)]);
        let mut provider = HttpBlessingProvider::new(config(&base).max_retries(1)).unwrap();

        assert!(provider.generate().is_ok());
        assert_eq!(provider.stats().retries, 1);
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn client_errors_fall_back_without_retry() {
        let (base, server) = serve(vec![(403, r#"{"error":"forbidden"}"#)]);
        let mut provider = HttpBlessingProvider::new(config(&base).max_retries(3)).unwrap();

        assert_eq!(provider.fetch_blessing(), Err(BlessingError::Status { status: 403 }));
        assert_eq!(provider.stats().retries, 0);
        assert!(provider.stats().last_error.is_some());
        server.join().unwrap();
    }
}
