//! Query handlers and read-only views of game sessions.

use realms_core::error::DomainError;
use realms_core::scene::{ImageHandle, Scene};
use serde::Serialize;
use uuid::Uuid;

use super::sessions::GameSessions;
use crate::domain::aggregates::{GameState, ImagePhase, TextPhase};

/// Read-only view of one game session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// The current state snapshot.
    pub state: GameStateView,
}

/// Read-only view of a [`GameState`] as rendered by the front end.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// Rolling context history, oldest first.
    pub history: Vec<String>,
    /// The scene on screen, if any.
    pub current_scene: Option<Scene>,
    /// Illustration for `current_scene`, as a data URL.
    pub current_image: Option<ImageHandle>,
    /// Whether a scene request is in flight.
    pub is_loading_text: bool,
    /// Whether the illustration is still being generated.
    pub is_loading_image: bool,
    /// Player-facing message from the last failed turn.
    pub error: Option<String>,
    /// Whether a first scene has been accepted.
    pub is_game_started: bool,
    /// Number of accepted scenes.
    pub turn_count: u32,
    /// Phase of the text channel.
    pub text_phase: TextPhase,
    /// Phase of the image channel.
    pub image_phase: ImagePhase,
    /// Number of events applied; changes whenever the state does.
    pub version: u64,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        Self {
            history: state.history.clone(),
            current_scene: state.current_scene.clone(),
            current_image: state.current_image.clone(),
            is_loading_text: state.is_loading_text,
            is_loading_image: state.is_loading_image,
            error: state.error.clone(),
            is_game_started: state.is_game_started,
            turn_count: state.turn_count,
            text_phase: state.text_phase(),
            image_phase: state.image_phase(),
            version: state.version,
        }
    }
}

impl GameView {
    /// Builds the view of `state` for game `game_id`.
    #[must_use]
    pub fn new(game_id: Uuid, state: &GameState) -> Self {
        Self {
            game_id,
            state: GameStateView::from(state),
        }
    }
}

/// Retrieves the current view of a game.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if no such game is registered.
pub fn get_game(game_id: Uuid, sessions: &GameSessions) -> Result<GameView, DomainError> {
    let controller = sessions.get(game_id)?;
    Ok(GameView::new(game_id, &controller.snapshot()))
}
