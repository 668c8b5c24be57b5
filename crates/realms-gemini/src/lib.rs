//! Infinite Realms: Gemini narrative backend.
//!
//! Implements [`realms_core::backend::NarrativeBackend`] on top of the Gemini
//! `generateContent` REST endpoint: one text model writes scenes as JSON, one
//! image model paints them.

pub mod client;
pub mod config;
pub mod prompts;
pub mod wire;

pub use client::GeminiBackend;
pub use config::GeminiConfig;
