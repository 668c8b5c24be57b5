//! Shared application state.

use std::sync::Arc;

use realms_narrative::application::sessions::GameSessions;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry of live game sessions.
    pub sessions: Arc<GameSessions>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(sessions: GameSessions) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}
