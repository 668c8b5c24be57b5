//! Shared test doubles and utilities for the Infinite Realms adventure engine.

mod backend;
mod clock;

pub use backend::{FailingBackend, GatedImageBackend, SceneCall, ScriptedBackend, sample_scene};
pub use clock::{FixedClock, ManualClock};
