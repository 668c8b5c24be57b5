//! `NarrativeBackend` implementation over the Gemini REST API.

use async_trait::async_trait;
use realms_core::backend::NarrativeBackend;
use realms_core::error::BackendError;
use realms_core::scene::{ImageHandle, Scene, decode_scene};
use tracing::{debug, instrument, warn};

use crate::config::GeminiConfig;
use crate::prompts::{SYSTEM_INSTRUCTION, scene_prompt, scene_response_schema};
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Gemini-backed narrative backend.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Creates a backend with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Config` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BackendError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl NarrativeBackend for GeminiBackend {
    #[instrument(skip(self, history, action), fields(model = %self.config.text_model, history_len = history.len()))]
    async fn generate_scene(
        &self,
        history: &[String],
        action: &str,
    ) -> Result<Scene, BackendError> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::instruction(SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_owned()),
                response_schema: Some(scene_response_schema()),
            }),
            ..GenerateContentRequest::from_text(scene_prompt(history, action))
        };

        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        let Some(text) = response.text() else {
            debug!(finish_reason = ?response.finish_reason(), "scene response had no text");
            return Err(BackendError::EmptyResponse);
        };
        decode_scene(&text)
    }

    #[instrument(skip(self, visual_prompt), fields(model = %self.config.image_model))]
    async fn generate_image(&self, visual_prompt: &str) -> Option<ImageHandle> {
        let request = GenerateContentRequest::from_text(visual_prompt);

        match self
            .generate_content(&self.config.image_model, &request)
            .await
        {
            Ok(response) => {
                let image = response.first_inline_image();
                if image.is_none() {
                    debug!(finish_reason = ?response.finish_reason(), "image response had no inline data");
                }
                image
            }
            Err(err) => {
                warn!(error = %err, "image generation failed");
                None
            }
        }
    }
}
