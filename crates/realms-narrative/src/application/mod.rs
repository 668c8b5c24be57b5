//! Application services: the turn controller, the session registry and the
//! handlers the API calls into.

pub mod command_handlers;
pub mod query_handlers;
pub mod sessions;
pub mod turn_controller;
