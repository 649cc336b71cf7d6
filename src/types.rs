//! Core type definitions for the simulation kernel.
//!
//! This module defines the fundamental types used throughout the engine.

/// Virtual simulation time, measured in ticks.
///
/// The meaning of one tick is up to the model (a nanosecond, a clock
/// cycle, a scheduling quantum). The engine only requires that time is
/// monotone and addable. Time is signed so that [`NO_EVENT`] can live
/// below every reachable instant.
pub type SimTime = i64;

/// Sentinel meaning "no event pending".
///
/// Used wherever an earliest-event query can come up empty: a drained
/// port, a component with nothing scheduled, a quiescent simulator.
pub const NO_EVENT: SimTime = -1;

/// Dense identifier a component receives at registration.
///
/// Identifiers are indices into the simulator's registration sequence,
/// so iterating components by id is the registration order.
pub type ComponentId = usize;

/// Folds two earliest-event times, treating [`NO_EVENT`] as "infinitely
/// far away".
///
/// This is the `min` behind every frontier computation in the engine.
///
/// # Examples
///
/// ```
/// use eventide::types::{earlier, NO_EVENT};
///
/// assert_eq!(earlier(3, 7), 3);
/// assert_eq!(earlier(NO_EVENT, 7), 7);
/// assert_eq!(earlier(3, NO_EVENT), 3);
/// assert_eq!(earlier(NO_EVENT, NO_EVENT), NO_EVENT);
/// ```
#[inline]
pub fn earlier(a: SimTime, b: SimTime) -> SimTime {
    match (a, b) {
        (NO_EVENT, t) | (t, NO_EVENT) => t,
        (a, b) => a.min(b),
    }
}
