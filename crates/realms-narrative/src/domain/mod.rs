//! Domain model: the game state aggregate, its events and commands.

pub mod actions;
pub mod aggregates;
pub mod commands;
pub mod events;
pub mod history;
