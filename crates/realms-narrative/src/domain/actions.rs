//! Fixed action texts the controller submits on the player's behalf.

/// Action submitted for the very first turn of a game.
pub const BOOTSTRAP_ACTION: &str = "Begin a new fantasy adventure. The setting is random (e.g., dark forest, ancient ruins, cyberpunk city, floating islands). Describe the starting scene vividly.";

/// Action submitted when the player retries after a failed turn.
pub const RETRY_ACTION: &str = "Try again";
