//! Gemini client configuration.

use std::time::Duration;

use realms_core::error::BackendError;

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model used to write scenes.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Default model used to paint scenes.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for [`crate::GeminiBackend`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// REST base URL, without a trailing slash.
    pub base_url: String,
    /// Model that writes scenes as JSON.
    pub text_model: String,
    /// Model that paints scene illustrations.
    pub image_model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration with the default endpoint, models and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`GeminiConfig::from_lookup`].
    pub fn from_env() -> Result<Self, BackendError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// `GEMINI_API_KEY` is required (`API_KEY` is accepted as a fallback);
    /// `GEMINI_BASE_URL`, `GEMINI_TEXT_MODEL`, `GEMINI_IMAGE_MODEL` and
    /// `GEMINI_TIMEOUT_SECS` override the defaults.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Config` if no API key is set or the timeout is
    /// not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackendError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| {
                BackendError::Config("GEMINI_API_KEY environment variable must be set".into())
            })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = non_empty("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(model) = non_empty("GEMINI_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = non_empty("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(raw) = non_empty("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                BackendError::Config(format!("GEMINI_TIMEOUT_SECS must be a valid u64: {e}"))
            })?;
            if secs == 0 {
                return Err(BackendError::Config(
                    "GEMINI_TIMEOUT_SECS must be greater than zero".into(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
