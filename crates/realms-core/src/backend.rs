//! Narrative backend abstraction.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::scene::{ImageHandle, Scene};

/// Port to the generative service that writes scenes and paints them.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Generates the next scene from the rolling history (oldest first) and
    /// the player's latest action.
    ///
    /// An empty `history` means the adventure is starting.
    async fn generate_scene(&self, history: &[String], action: &str)
    -> Result<Scene, BackendError>;

    /// Generates an illustration for `visual_prompt`.
    ///
    /// Implementations never fail: any error is reported as `None`.
    async fn generate_image(&self, visual_prompt: &str) -> Option<ImageHandle>;
}
