//! Infinite Realms: turn progression.
//!
//! Responsible for sequencing scene and image generation per turn, bounding
//! the context history sent back to the backend, and reporting text failures
//! so the player can retry.

pub mod application;
pub mod domain;
