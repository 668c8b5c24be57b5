//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No game session exists with the given identifier.
    #[error("game not found: {0}")]
    GameNotFound(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Failure of a call to the generative backend.
///
/// Scene generation surfaces these to the turn controller, which collapses
/// them into a single player-facing message. Image generation never returns
/// them to its caller.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response body could not be read.
    #[error("backend request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response contained no textual payload.
    #[error("backend response contained no text")]
    EmptyResponse,

    /// The payload did not decode into the expected shape.
    #[error("backend response could not be decoded: {0}")]
    Decode(String),

    /// The client is missing required configuration.
    #[error("backend configuration error: {0}")]
    Config(String),
}
