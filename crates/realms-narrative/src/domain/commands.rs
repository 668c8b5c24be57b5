//! Commands accepted by a game session.

use uuid::Uuid;

/// Command to play the bootstrap turn of a game.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The game to start.
    pub game_id: Uuid,
}

/// Command to play a turn with the player's chosen action.
#[derive(Debug, Clone)]
pub struct SubmitAction {
    /// The game the action belongs to.
    pub game_id: Uuid,
    /// The action text, usually one of the current scene's choices.
    pub action: String,
}

/// Command to retry after a failed turn.
#[derive(Debug, Clone)]
pub struct RetryTurn {
    /// The game to retry in.
    pub game_id: Uuid,
}

/// Command to discard a game's progress and return it to the start screen.
#[derive(Debug, Clone)]
pub struct ResetGame {
    /// The game to reset.
    pub game_id: Uuid,
}

/// Command to discard a game session entirely.
#[derive(Debug, Clone)]
pub struct EndGame {
    /// The game to end.
    pub game_id: Uuid,
}
