//! HTTP client for OpenRouter-style chat completion endpoints.

use derive_more::{Display, Error};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Default completion endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Configuration for the LLM client.
#[derive(Clone)]
pub struct LlmConfig {
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    referer: String,
    title: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn new(api_key: String, model: String, max_tokens: u32, timeout: Duration) -> Self {
        debug!("Creating LLM config");
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            model,
            max_tokens,
            temperature: 0.9,
            timeout,
            referer: "http://localhost:3000".to_string(),
            title: "Zyro Grid Battle".to_string(),
        }
    }

    /// Overrides the endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overrides the `HTTP-Referer` and `X-Title` attribution headers.
    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = referer.into();
        self.title = title.into();
        self
    }

    /// Gets the endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Chat completion client. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(model = %config.model()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends one completion request and returns `choices[0].message`.
    ///
    /// The whole exchange runs under the configured timeout. On expiry the
    /// in-flight request is dropped.
    #[instrument(skip(self, system_prompt, user_message), fields(model = %self.config.model, timeout_ms = self.config.timeout.as_millis() as u64))]
    pub async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<Value, LlmError> {
        match tokio::time::timeout(self.config.timeout, self.exchange(system_prompt, user_message)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Completion request timed out");
                Err(LlmError::new(
                    LlmErrorKind::Timeout,
                    format!("No response within {:?}", self.config.timeout),
                ))
            }
        }
    }

    async fn exchange(&self, system_prompt: &str, user_message: &str) -> Result<Value, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_message }
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "response_format": { "type": "json_object" }
        });

        debug!(url = %self.config.api_url, "Sending completion request");
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Completion request failed");
                LlmError::new(LlmErrorKind::Network, format!("Request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read completion response");
            LlmError::new(LlmErrorKind::Network, format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, "Completion endpoint returned an error status");
            return Err(LlmError::new(
                LlmErrorKind::Status(status.as_u16()),
                format!("API error {}: {}", status, response_text),
            ));
        }

        let body: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, "Completion response is not JSON");
            LlmError::new(LlmErrorKind::Envelope, format!("Failed to parse response: {}", e))
        })?;

        let model = response_model(&body);
        debug!(%model, "Parsing completion envelope");
        let message = crate::envelope::first_message(&body).cloned().ok_or_else(|| {
            error!("No message in completion response");
            LlmError::new(LlmErrorKind::Envelope, "No message in completion response".to_string())
        })?;

        info!("Received completion");
        Ok(message)
    }
}

/// Model name reported by the upstream, `"unknown"` when absent.
fn response_model(body: &Value) -> &str {
    body.get("model").and_then(Value::as_str).unwrap_or("unknown")
}

/// Category of an LLM client failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LlmErrorKind {
    /// The request did not finish within the timeout.
    #[display("timeout")]
    Timeout,
    /// Connection or transfer failure.
    #[display("network")]
    Network,
    /// Non-success HTTP status.
    #[display("status {}", _0)]
    Status(u16),
    /// The response body did not have the expected envelope.
    #[display("envelope")]
    Envelope,
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error ({}): {} at {}:{}", kind, message, file, line)]
pub struct LlmError {
    /// Failure category.
    pub kind: LlmErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: LlmErrorKind, message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders_override_defaults() {
        let config = LlmConfig::new(
            "key".to_string(),
            "some/model".to_string(),
            300,
            Duration::from_secs(2),
        )
        .with_api_url("http://localhost:1/v1")
        .with_temperature(0.2);

        assert_eq!(config.api_url(), "http://localhost:1/v1");
        assert_eq!(config.model(), "some/model");
        assert_eq!(config.max_tokens(), 300);
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.temperature, 0.2);
        assert!(!format!("{:?}", config).contains("\"key\""));
    }

    #[test]
    fn response_model_reads_envelope() {
        let body = serde_json::json!({ "model": "deepseek/deepseek-r1:free", "choices": [] });
        assert_eq!(response_model(&body), "deepseek/deepseek-r1:free");
        assert_eq!(response_model(&serde_json::json!({ "choices": [] })), "unknown");
        assert_eq!(response_model(&serde_json::json!({ "model": 7 })), "unknown");
    }

    #[test]
    fn error_records_call_site() {
        let err = LlmError::new(LlmErrorKind::Status(429), "slow down".to_string());
        assert_eq!(err.kind, LlmErrorKind::Status(429));
        assert!(err.file.ends_with("llm_client.rs"));
        assert!(err.to_string().contains("status 429"));
    }
}
