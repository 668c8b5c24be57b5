//! Turn controller for a single game session.
//!
//! The controller owns the session's [`GameState`] and sequences the two
//! backend calls of a turn: the scene request runs on the caller's task, the
//! image request runs on a detached task tagged with the scene it belongs to.
//! State lives in a `watch` channel and only ever changes by applying a
//! [`TurnEvent`], so observers always see a whole snapshot. Turns of one
//! game run one at a time; a turn submitted while another is generating
//! waits for it and then builds on its result.

use std::sync::Arc;

use realms_core::aggregate::AggregateRoot;
use realms_core::backend::NarrativeBackend;
use realms_core::clock::Clock;
use realms_core::event::{DomainEvent, EventMetadata};
use tokio::sync::{Mutex, watch};
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::domain::actions::{BOOTSTRAP_ACTION, RETRY_ACTION};
use crate::domain::aggregates::{GameState, TEXT_FAILURE_MESSAGE};
use crate::domain::events::{
    ImageResolved, SceneAccepted, TextFailed, TextRequested, TurnEvent, TurnEventKind,
};

/// Sequences turns for one game session.
pub struct TurnController {
    game_id: Uuid,
    backend: Arc<dyn NarrativeBackend>,
    clock: Arc<dyn Clock>,
    state: Arc<watch::Sender<GameState>>,
    turn_lock: Mutex<()>,
}

impl TurnController {
    /// Creates a controller for a new game with an empty state.
    #[must_use]
    pub fn new(game_id: Uuid, backend: Arc<dyn NarrativeBackend>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(GameState::default());
        Self {
            game_id,
            backend,
            clock,
            state: Arc::new(state),
            turn_lock: Mutex::new(()),
        }
    }

    /// Returns the game identifier.
    #[must_use]
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Subscribes to state snapshots; the receiver is notified after every
    /// applied event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.subscribe()
    }

    /// Plays the bootstrap turn. No "Player chose" entry is recorded for it.
    pub async fn start_game(&self) -> GameState {
        self.submit_action(BOOTSTRAP_ACTION, true).await
    }

    /// Retries after a failed turn by submitting the fixed retry action.
    pub async fn retry(&self) -> GameState {
        self.submit_action(RETRY_ACTION, false).await
    }

    /// Plays one turn and returns the snapshot once the text channel has
    /// settled.
    ///
    /// Waits for any turn of this game that is still generating, so the
    /// backend always sees the history that turn produced.
    /// On success the scene is accepted and an image request is started in
    /// the background; on failure the player-facing error is set and the
    /// previous scene, history and turn count are kept. The image request is
    /// never awaited here.
    #[instrument(skip(self, action), fields(game_id = %self.game_id, correlation_id = tracing::field::Empty))]
    pub async fn submit_action(&self, action: &str, is_initial: bool) -> GameState {
        let correlation_id = Uuid::new_v4();
        tracing::Span::current().record("correlation_id", tracing::field::display(correlation_id));

        let _turn = self.turn_lock.lock().await;

        let before = self.record(
            correlation_id,
            TurnEventKind::TextRequested(TextRequested {
                action: action.to_owned(),
                is_initial,
            }),
        );
        let history = if is_initial {
            Vec::new()
        } else {
            before.history().to_vec()
        };

        match self.backend.generate_scene(&history, action).await {
            Ok(scene) => {
                let scene_id = Uuid::new_v4();
                let visual_prompt = scene.visual_prompt.clone();
                let after = self.record(
                    correlation_id,
                    TurnEventKind::SceneAccepted(SceneAccepted {
                        scene_id,
                        epoch: before.epoch(),
                        turn_seq: before.turn_seq(),
                        action: action.to_owned(),
                        is_initial,
                        scene,
                    }),
                );

                if after.accepts_image_for(scene_id) {
                    info!(turn = after.turn_count(), %scene_id, "scene accepted");
                    self.spawn_image_request(correlation_id, scene_id, visual_prompt);
                } else {
                    warn!(%scene_id, "scene was superseded while generating");
                }
                after
            }
            Err(err) => {
                error!(error = %err, "scene generation failed");
                self.record(
                    correlation_id,
                    TurnEventKind::TextFailed(TextFailed {
                        epoch: before.epoch(),
                        turn_seq: before.turn_seq(),
                        message: TEXT_FAILURE_MESSAGE.to_owned(),
                    }),
                )
            }
        }
    }

    /// Discards all progress and returns the game to its initial state.
    /// Turns and images still in flight are dropped when they complete.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn reset(&self) -> GameState {
        info!("resetting game");
        self.record(Uuid::new_v4(), TurnEventKind::GameReset)
    }

    fn record(&self, correlation_id: Uuid, kind: TurnEventKind) -> GameState {
        apply_event(
            &self.state,
            self.clock.as_ref(),
            self.game_id,
            correlation_id,
            kind,
        )
    }

    fn spawn_image_request(&self, correlation_id: Uuid, scene_id: Uuid, visual_prompt: String) {
        let backend = Arc::clone(&self.backend);
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);
        let game_id = self.game_id;
        let span = info_span!("image_request", %game_id, %correlation_id, %scene_id);

        tokio::spawn(
            async move {
                let image = backend.generate_image(&visual_prompt).await;
                if image.is_none() {
                    info!("no illustration produced for scene");
                }

                let is_current = state.borrow().accepts_image_for(scene_id);
                if !is_current {
                    debug!("discarding image for a scene that is no longer current");
                    return;
                }

                apply_event(
                    &state,
                    clock.as_ref(),
                    game_id,
                    correlation_id,
                    TurnEventKind::ImageResolved(ImageResolved { scene_id, image }),
                );
            }
            .instrument(span),
        );
    }
}

/// Wraps `kind` in an event envelope, applies it to the watched state and
/// returns the resulting snapshot.
fn apply_event(
    state: &watch::Sender<GameState>,
    clock: &dyn Clock,
    game_id: Uuid,
    correlation_id: Uuid,
    kind: TurnEventKind,
) -> GameState {
    let event = TurnEvent {
        metadata: EventMetadata {
            event_id: Uuid::new_v4(),
            game_id,
            correlation_id,
            occurred_at: clock.now(),
        },
        kind,
    };
    debug!(
        event_type = event.event_type(),
        event_id = %event.metadata().event_id,
        occurred_at = %event.metadata().occurred_at,
        "applying turn event"
    );

    let mut after = GameState::default();
    state.send_modify(|current| {
        current.apply(&event);
        after = current.clone();
    });
    after
}
