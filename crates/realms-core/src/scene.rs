//! The narrative unit produced by the backend, and the image handle that
//! illustrates it.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// A scene as produced by the narrative backend.
///
/// All four fields are required on the wire; a payload missing any of them is
/// rejected by [`decode_scene`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Short scene title.
    pub title: String,
    /// Three to four sentences of narration.
    pub description: String,
    /// The actions offered to the player, in display order.
    pub choices: Vec<String>,
    /// Prompt handed to the image model to illustrate the scene.
    pub visual_prompt: String,
}

/// Decodes the raw text returned by the backend into a [`Scene`].
///
/// # Errors
///
/// Returns `BackendError::EmptyResponse` if `raw` is blank and
/// `BackendError::Decode` if it is not a JSON object with all Scene fields.
pub fn decode_scene(raw: &str) -> Result<Scene, BackendError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    serde_json::from_str(raw).map_err(|e| BackendError::Decode(e.to_string()))
}

/// An illustration ready for direct rendering, encoded as a
/// `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Builds a handle from a mime type and an already base64-encoded payload.
    #[must_use]
    pub fn from_inline(mime_type: &str, base64_data: &str) -> Self {
        Self(format!("data:{mime_type};base64,{base64_data}"))
    }

    /// Returns the data URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
