use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Settings for the narration provider. Constructed explicitly and passed to
/// the client; nothing reads the environment behind the caller's back.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationConfig {
    /// Provider credential. `None` disables narration and yields the fallback text.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl NarrationConfig {
    /// Loads config from env vars:
    /// - `OPENROUTER_API_KEY` (empty counts as unset)
    /// - `OPENROUTER_MODEL`   (default: `anthropic/claude-3.5-sonnet`)
    /// - `OPENROUTER_URL`     (default: the OpenRouter chat completions endpoint)
    /// - `NARRATION_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_key: non_empty("OPENROUTER_API_KEY"),
            model: non_empty("OPENROUTER_MODEL").unwrap_or(defaults.model),
            endpoint: non_empty("OPENROUTER_URL").unwrap_or(defaults.endpoint),
            timeout: non_empty("NARRATION_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            temperature: defaults.temperature,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
