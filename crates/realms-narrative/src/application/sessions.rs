//! In-memory registry of live game sessions.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use realms_core::backend::NarrativeBackend;
use realms_core::clock::Clock;
use realms_core::error::DomainError;
use tracing::info;
use uuid::Uuid;

use super::turn_controller::TurnController;

/// Bounds on how many games are kept and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Most games kept at once; creating one more evicts the least recently
    /// used game.
    pub max_sessions: usize,
    /// Games untouched for this long are evicted.
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

struct SessionEntry {
    controller: Arc<TurnController>,
    last_seen: DateTime<Utc>,
}

/// Holds one [`TurnController`] per game. Nothing is persisted: games live
/// until they are ended, sit idle past [`SessionLimits::idle_ttl`], or are
/// pushed out by newer games once [`SessionLimits::max_sessions`] is reached.
pub struct GameSessions {
    backend: Arc<dyn NarrativeBackend>,
    clock: Arc<dyn Clock>,
    limits: SessionLimits,
    games: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl GameSessions {
    /// Creates an empty registry with default limits whose games share
    /// `backend` and `clock`.
    #[must_use]
    pub fn new(backend: Arc<dyn NarrativeBackend>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(backend, clock, SessionLimits::default())
    }

    /// Creates an empty registry bounded by `limits`.
    #[must_use]
    pub fn with_limits(
        backend: Arc<dyn NarrativeBackend>,
        clock: Arc<dyn Clock>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            backend,
            clock,
            limits,
            games: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the limits this registry enforces.
    #[must_use]
    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Creates a new game with an empty state and registers it, evicting
    /// idle games and, if still full, the least recently used one.
    pub fn create(&self) -> Arc<TurnController> {
        let game_id = Uuid::now_v7();
        let controller = Arc::new(TurnController::new(
            game_id,
            Arc::clone(&self.backend),
            Arc::clone(&self.clock),
        ));
        let now = self.clock.now();

        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let expired = self.evict_expired(&mut games, now);
        let mut displaced = 0;
        while games.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = games
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            games.remove(&oldest);
            displaced += 1;
        }
        games.insert(
            game_id,
            SessionEntry {
                controller: Arc::clone(&controller),
                last_seen: now,
            },
        );
        drop(games);

        if expired + displaced > 0 {
            info!(expired, displaced, "evicted game sessions");
        }
        controller
    }

    /// Looks up a game by its identifier and marks it as used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotFound` if no such game is registered or
    /// it has been idle past the limit.
    pub fn get(&self, game_id: Uuid) -> Result<Arc<TurnController>, DomainError> {
        let now = self.clock.now();
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let entry = games
            .get_mut(&game_id)
            .ok_or(DomainError::GameNotFound(game_id))?;
        if self.is_expired(entry, now) {
            games.remove(&game_id);
            info!(%game_id, "evicted idle game session");
            return Err(DomainError::GameNotFound(game_id));
        }
        entry.last_seen = now;
        Ok(Arc::clone(&entry.controller))
    }

    /// Removes a game from the registry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotFound` if no such game is registered.
    pub fn remove(&self, game_id: Uuid) -> Result<(), DomainError> {
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&game_id)
            .map(|_| ())
            .ok_or(DomainError::GameNotFound(game_id))
    }

    /// Evicts every game idle past the limit and returns how many went.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut games, now)
    }

    /// Number of live games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no games are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        (now - entry.last_seen)
            .to_std()
            .is_ok_and(|idle| idle >= self.limits.idle_ttl)
    }

    fn evict_expired(&self, games: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) -> usize {
        let before = games.len();
        games.retain(|_, entry| !self.is_expired(entry, now));
        before - games.len()
    }
}
