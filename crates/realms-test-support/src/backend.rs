//! Test backends: `NarrativeBackend` implementations for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use realms_core::backend::NarrativeBackend;
use realms_core::error::BackendError;
use realms_core::scene::{ImageHandle, Scene};
use tokio::sync::oneshot;

/// Builds a distinguishable scene for turn `n`.
///
/// Title `"Scene {n}"`, description `"Description {n}."`, two choices and
/// visual prompt `"Visual {n}"`.
#[must_use]
pub fn sample_scene(n: usize) -> Scene {
    Scene {
        title: format!("Scene {n}"),
        description: format!("Description {n}."),
        choices: vec![format!("Go left {n}"), format!("Go right {n}")],
        visual_prompt: format!("Visual {n}"),
    }
}

/// Arguments of one recorded `generate_scene` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneCall {
    /// History passed to the backend.
    pub history: Vec<String>,
    /// Action passed to the backend.
    pub action: String,
}

/// A backend that replays queued scene and image results in order and
/// records every call it receives.
///
/// When the scene queue runs dry, `generate_scene` fails with a transport
/// error; when the image queue runs dry, `generate_image` returns `None`.
/// Results are taken in call order, before any delay configured with
/// [`ScriptedBackend::delay_action`].
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scenes: Mutex<VecDeque<Result<Scene, BackendError>>>,
    images: Mutex<VecDeque<Option<ImageHandle>>>,
    scene_calls: Mutex<Vec<SceneCall>>,
    image_calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl ScriptedBackend {
    /// Create an empty scripted backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that answers the first `count` scene requests with
    /// `sample_scene(1)..=sample_scene(count)`.
    #[must_use]
    pub fn with_sample_scenes(count: usize) -> Self {
        let backend = Self::new();
        for n in 1..=count {
            backend.push_scene(Ok(sample_scene(n)));
        }
        backend
    }

    /// Queue the result of the next unanswered `generate_scene` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_scene(&self, result: Result<Scene, BackendError>) {
        self.scenes.lock().unwrap().push_back(result);
    }

    /// Queue the result of the next unanswered `generate_image` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push_image(&self, image: Option<ImageHandle>) {
        self.images.lock().unwrap().push_back(image);
    }

    /// Makes every `generate_scene` call for `action` take `delay` before it
    /// answers.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn delay_action(&self, action: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(action.to_owned(), delay);
    }

    /// Returns a snapshot of all recorded `generate_scene` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn scene_calls(&self) -> Vec<SceneCall> {
        self.scene_calls.lock().unwrap().clone()
    }

    /// Returns a snapshot of all visual prompts passed to `generate_image`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn image_calls(&self) -> Vec<String> {
        self.image_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeBackend for ScriptedBackend {
    async fn generate_scene(
        &self,
        history: &[String],
        action: &str,
    ) -> Result<Scene, BackendError> {
        self.scene_calls.lock().unwrap().push(SceneCall {
            history: history.to_vec(),
            action: action.to_owned(),
        });
        let result = self
            .scenes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted scene left".into())));
        let delay = self.delays.lock().unwrap().get(action).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn generate_image(&self, visual_prompt: &str) -> Option<ImageHandle> {
        self.image_calls.lock().unwrap().push(visual_prompt.to_owned());
        self.images.lock().unwrap().pop_front().flatten()
    }
}

/// A backend whose scene calls always fail and whose image calls always
/// come back empty.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl NarrativeBackend for FailingBackend {
    async fn generate_scene(
        &self,
        _history: &[String],
        _action: &str,
    ) -> Result<Scene, BackendError> {
        Err(BackendError::Transport("connection refused".into()))
    }

    async fn generate_image(&self, _visual_prompt: &str) -> Option<ImageHandle> {
        None
    }
}

/// A backend whose image calls block until the test releases them.
///
/// Scenes are answered from a queue like [`ScriptedBackend`]. Each image
/// request waits on a gate registered for its visual prompt with
/// [`GatedImageBackend::gate`]; requests without a gate resolve to `None`
/// immediately. Dropping a gate's sender resolves its request to `None`.
#[derive(Debug, Default)]
pub struct GatedImageBackend {
    scenes: Mutex<VecDeque<Scene>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Option<ImageHandle>>>>,
}

impl GatedImageBackend {
    /// Create a backend that answers scene requests with `scenes`, in order.
    #[must_use]
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            scenes: Mutex::new(scenes.into()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Register a gate for `visual_prompt` and return the sender that
    /// releases it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn gate(&self, visual_prompt: &str) -> oneshot::Sender<Option<ImageHandle>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(visual_prompt.to_owned(), rx);
        tx
    }
}

#[async_trait]
impl NarrativeBackend for GatedImageBackend {
    async fn generate_scene(
        &self,
        _history: &[String],
        _action: &str,
    ) -> Result<Scene, BackendError> {
        self.scenes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::Transport("no scripted scene left".into()))
    }

    async fn generate_image(&self, visual_prompt: &str) -> Option<ImageHandle> {
        let gate = self.gates.lock().unwrap().remove(visual_prompt);
        match gate {
            Some(rx) => rx.await.ok().flatten(),
            None => None,
        }
    }
}
