//! Bounded context history.
//!
//! The history is the rolling window of turn summaries sent back to the
//! backend with every scene request. It is a prompt budget, not a log.

use realms_core::scene::Scene;

/// Maximum number of entries kept after any update.
pub const HISTORY_LIMIT: usize = 10;

/// Summary entry recorded for the action a player chose.
#[must_use]
pub fn player_choice_entry(action: &str) -> String {
    format!("Player chose: {action}")
}

/// Summary entry recorded for an accepted scene.
#[must_use]
pub fn scene_entry(scene: &Scene) -> String {
    format!("Scene: {} - {}", scene.title, scene.description)
}

/// Drops the oldest entries until at most [`HISTORY_LIMIT`] remain.
pub fn truncate_to_limit(history: &mut Vec<String>) {
    if history.len() > HISTORY_LIMIT {
        let excess = history.len() - HISTORY_LIMIT;
        history.drain(..excess);
    }
}
