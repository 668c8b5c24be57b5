//! Domain events for turn progression.

use realms_core::event::{DomainEvent, EventMetadata};
use realms_core::scene::{ImageHandle, Scene};
use uuid::Uuid;

/// Emitted when a turn starts and the text request goes out.
#[derive(Debug, Clone)]
pub struct TextRequested {
    /// The action being submitted.
    pub action: String,
    /// Whether this is the bootstrap turn.
    pub is_initial: bool,
}

/// Emitted when the backend returned a scene for the pending turn.
#[derive(Debug, Clone)]
pub struct SceneAccepted {
    /// Identifier assigned to the scene; image results are tagged with it.
    pub scene_id: Uuid,
    /// Game epoch the turn was started in.
    pub epoch: u32,
    /// Sequence number of the turn that produced the scene.
    pub turn_seq: u64,
    /// The action that produced the scene.
    pub action: String,
    /// Whether this is the bootstrap turn.
    pub is_initial: bool,
    /// The decoded scene.
    pub scene: Scene,
}

/// Emitted when scene generation failed.
#[derive(Debug, Clone)]
pub struct TextFailed {
    /// Game epoch the turn was started in.
    pub epoch: u32,
    /// Sequence number of the failed turn.
    pub turn_seq: u64,
    /// Player-facing message.
    pub message: String,
}

/// Emitted when the background image request for a scene finished.
#[derive(Debug, Clone)]
pub struct ImageResolved {
    /// The scene the image was requested for.
    pub scene_id: Uuid,
    /// The illustration, or `None` if the backend produced none.
    pub image: Option<ImageHandle>,
}

/// Event payload variants for turn progression.
#[derive(Debug, Clone)]
pub enum TurnEventKind {
    /// A text request is in flight.
    TextRequested(TextRequested),
    /// A new scene was accepted.
    SceneAccepted(SceneAccepted),
    /// The text request failed.
    TextFailed(TextFailed),
    /// An image request finished.
    ImageResolved(ImageResolved),
    /// The game was reset to its initial state.
    GameReset,
}

/// Domain event envelope for turn progression.
#[derive(Debug, Clone)]
pub struct TurnEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TurnEventKind,
}

impl DomainEvent for TurnEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            TurnEventKind::TextRequested(_) => "turn.text_requested",
            TurnEventKind::SceneAccepted(_) => "turn.scene_accepted",
            TurnEventKind::TextFailed(_) => "turn.text_failed",
            TurnEventKind::ImageResolved(_) => "turn.image_resolved",
            TurnEventKind::GameReset => "game.reset",
        }
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
