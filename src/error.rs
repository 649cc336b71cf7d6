//! Error types for the simulation kernel.
//!
//! Every failure the engine can surface is synchronous and fatal to the
//! offending operation: nothing is retried, and a failed `register`,
//! `connect`, `send` or `set` leaves observable state unchanged.
//! Conditions that would indicate a bug in the engine itself (a port
//! holding a past-dated event at dispatch time) are enforced with
//! assertions instead of error values.

use thiserror::Error;

use crate::simulator::SimState;

/// Errors surfaced by the simulation kernel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The component (or one of its endpoints) is already registered.
    #[error("component is already registered with a simulator")]
    AlreadyRegistered,

    /// An operation required a registered component but found none.
    #[error("component is not registered with a simulator")]
    NotRegistered,

    /// Two endpoints belong to different simulators.
    #[error("link and port are registered with different simulators")]
    SimulatorMismatch,

    /// A unicast link was bound to a second port.
    #[error("unicast link is already connected to a port")]
    AlreadyConnected,

    /// A unicast link was asked to send before being bound to a port.
    #[error("unicast link is not connected to a port")]
    NotConnected,

    /// A link was constructed with a latency of zero or less.
    #[error("link latency must be positive, got {0}")]
    InvalidLatency(crate::types::SimTime),

    /// A timer delay or extra send delay was out of range.
    #[error("delay is out of range: {0}")]
    InvalidDelay(crate::types::SimTime),

    /// An operation was attempted in the wrong simulator lifecycle state
    /// (for example `register` after `run` has returned).
    #[error("operation not allowed while simulator is {0:?}")]
    InvalidState(SimState),
}

/// Result alias used across the crate.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SimError::InvalidLatency(0).to_string(),
            "link latency must be positive, got 0"
        );
        assert_eq!(
            SimError::NotConnected.to_string(),
            "unicast link is not connected to a port"
        );
    }

    #[test]
    fn test_errors_compare() {
        assert_eq!(SimError::AlreadyConnected, SimError::AlreadyConnected);
        assert_ne!(SimError::NotRegistered, SimError::SimulatorMismatch);
    }
}
