//! The game state aggregate.

use realms_core::aggregate::AggregateRoot;
use realms_core::scene::{ImageHandle, Scene};
use serde::Serialize;
use uuid::Uuid;

use super::events::{TurnEvent, TurnEventKind};
use super::history;

/// Message shown to the player when a scene could not be generated.
pub const TEXT_FAILURE_MESSAGE: &str =
    "The mists of time are thick. The oracle could not see the future. Please try again.";

/// Phase of the text channel, derived from the flags on [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPhase {
    /// No turn has been attempted yet.
    Idle,
    /// A scene request is in flight.
    TextLoading,
    /// The current scene is ready for the player.
    TextReady,
    /// The last scene request failed.
    TextError,
}

/// Phase of the image channel for the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePhase {
    /// There is no scene to illustrate.
    None,
    /// The illustration is being generated.
    ImageLoading,
    /// The illustration is available.
    ImageReady,
    /// No illustration is available for this scene.
    ImageAbsent,
}

/// Snapshot of one game session.
///
/// Every transition goes through [`AggregateRoot::apply`], so a snapshot is
/// always internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Rolling context sent to the backend, oldest first.
    pub(crate) history: Vec<String>,
    /// The most recently accepted scene.
    pub(crate) current_scene: Option<Scene>,
    /// Identifier of `current_scene`; image results are matched against it.
    pub(crate) scene_id: Option<Uuid>,
    /// Illustration for `current_scene`.
    pub(crate) current_image: Option<ImageHandle>,
    pub(crate) is_loading_text: bool,
    pub(crate) is_loading_image: bool,
    /// Player-facing message from the last failed text request.
    pub(crate) error: Option<String>,
    pub(crate) is_game_started: bool,
    /// Number of accepted scenes.
    pub(crate) turn_count: u32,
    /// Incremented on every reset; turns started before a reset are dropped.
    pub(crate) epoch: u32,
    /// Sequence number of the latest requested turn; results of older turns
    /// are dropped.
    pub(crate) turn_seq: u64,
    /// Number of events applied.
    pub(crate) version: u64,
}

impl GameState {
    /// Rolling context history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The most recently accepted scene, if any.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.as_ref()
    }

    /// Identifier of the current scene, if any.
    #[must_use]
    pub fn scene_id(&self) -> Option<Uuid> {
        self.scene_id
    }

    /// Illustration for the current scene, if it has arrived.
    #[must_use]
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.current_image.as_ref()
    }

    /// Whether a scene request is in flight.
    #[must_use]
    pub fn is_loading_text(&self) -> bool {
        self.is_loading_text
    }

    /// Whether an illustration is being generated for the current scene.
    #[must_use]
    pub fn is_loading_image(&self) -> bool {
        self.is_loading_image
    }

    /// Player-facing error from the last failed text request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a first scene has ever been accepted.
    #[must_use]
    pub fn is_game_started(&self) -> bool {
        self.is_game_started
    }

    /// Number of accepted scenes.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Game epoch; incremented by every reset.
    #[must_use]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Sequence number of the latest requested turn.
    #[must_use]
    pub fn turn_seq(&self) -> u64 {
        self.turn_seq
    }

    /// Whether a text result from turn `turn_seq` of `epoch` is still the
    /// one the game is waiting for.
    #[must_use]
    pub fn awaits_turn(&self, epoch: u32, turn_seq: u64) -> bool {
        self.epoch == epoch && self.turn_seq == turn_seq
    }

    /// Derives the phase of the text channel.
    #[must_use]
    pub fn text_phase(&self) -> TextPhase {
        if self.is_loading_text {
            TextPhase::TextLoading
        } else if self.error.is_some() {
            TextPhase::TextError
        } else if self.current_scene.is_some() {
            TextPhase::TextReady
        } else {
            TextPhase::Idle
        }
    }

    /// Derives the phase of the image channel.
    #[must_use]
    pub fn image_phase(&self) -> ImagePhase {
        if self.current_scene.is_none() {
            ImagePhase::None
        } else if self.is_loading_image {
            ImagePhase::ImageLoading
        } else if self.current_image.is_some() {
            ImagePhase::ImageReady
        } else {
            ImagePhase::ImageAbsent
        }
    }

    /// Whether an image tagged with `scene_id` still belongs to this state.
    #[must_use]
    pub fn accepts_image_for(&self, scene_id: Uuid) -> bool {
        self.scene_id == Some(scene_id)
    }
}

impl AggregateRoot for GameState {
    type Event = TurnEvent;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            TurnEventKind::TextRequested(_) => {
                self.turn_seq += 1;
                self.is_loading_text = true;
                self.error = None;
                self.current_image = None;
            }
            TurnEventKind::SceneAccepted(payload) => {
                if self.awaits_turn(payload.epoch, payload.turn_seq) {
                    let mut next = self.history.clone();
                    if !payload.is_initial {
                        next.push(history::player_choice_entry(&payload.action));
                    }
                    next.push(history::scene_entry(&payload.scene));
                    history::truncate_to_limit(&mut next);

                    self.history = next;
                    self.current_scene = Some(payload.scene.clone());
                    self.scene_id = Some(payload.scene_id);
                    self.current_image = None;
                    self.is_loading_image = true;
                    self.is_loading_text = false;
                    self.error = None;
                    self.is_game_started = true;
                    self.turn_count += 1;
                }
            }
            TurnEventKind::TextFailed(payload) => {
                if self.awaits_turn(payload.epoch, payload.turn_seq) {
                    self.is_loading_text = false;
                    self.error = Some(payload.message.clone());
                }
            }
            TurnEventKind::ImageResolved(payload) => {
                if self.accepts_image_for(payload.scene_id) {
                    self.current_image = payload.image.clone();
                    self.is_loading_image = false;
                }
            }
            TurnEventKind::GameReset => {
                *self = Self {
                    epoch: self.epoch + 1,
                    turn_seq: self.turn_seq,
                    version: self.version,
                    ..Self::default()
                };
            }
        }
        self.version += 1;
    }
}
