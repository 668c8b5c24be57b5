//! Infinite Realms Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the narrative
//! engine, the backend client and the API server depend on. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod backend;
pub mod clock;
pub mod error;
pub mod event;
pub mod scene;
