//! Connection settings for the chat-completion service.

use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";

/// Default request timeout in seconds. Generation can be slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API root.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model.
pub const ENV_MODEL: &str = "OPENAI_MODEL";

/// Settings for [`OpenAiClient`](crate::OpenAiClient).
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// API root, without the `/v1/...` path.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature; the service default when `None`.
    pub temperature: Option<f32>,
}

impl ClientConfig {
    /// Create a config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL`, and `OPENAI_MODEL`.
    ///
    /// Fails with [`ClientError::MissingApiKey`] if the key is unset or blank.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ClientError::MissingApiKey)?;

        let mut config = Self::new(api_key.trim());
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// Use a different API root. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_from_key_only() {
        let config = ClientConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn missing_or_blank_key_fails() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ClientError::MissingApiKey)
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])),
            Err(ClientError::MissingApiKey)
        ));
    }

    #[test]
    fn overrides_from_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:11434/"),
            ("OPENAI_MODEL", "llama3"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn builders() {
        let config = ClientConfig::new("k")
            .with_timeout_secs(5)
            .with_temperature(0.7)
            .with_model("gpt-4o-mini");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn debug_hides_key() {
        let shown = format!("{:?}", ClientConfig::new("sk-secret"));
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
