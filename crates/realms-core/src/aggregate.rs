//! Aggregate root abstraction.

use crate::event::DomainEvent;

/// Trait for value-type aggregates whose state changes only by applying
/// events. `apply` must be a pure function of the current state and the
/// event: no I/O, no clocks, no randomness.
pub trait AggregateRoot: Clone + Send + Sync {
    /// The event type this aggregate consumes.
    type Event: DomainEvent;

    /// Returns the current version (number of events applied).
    fn version(&self) -> u64;

    /// Apply an event to produce the next state.
    fn apply(&mut self, event: &Self::Event);
}
