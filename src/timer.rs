//! Self-scheduled timers.
//!
//! A [`Timer`] lets a component wake itself: setting it enqueues a
//! message onto the timer's own heap, due after a caller-chosen delay.
//! Structurally it is a port fused with a zero-configuration self-link;
//! there is no connect step because the target is always the owner.

use crate::component::{Bindable, Registration, WakeSource};
use crate::error::{SimError, SimResult};
use crate::port::{Drain, Port};
use crate::types::SimTime;

/// A self-scheduled event queue for messages of type `M`.
///
/// Like [`Port`], the handle is cheap to clone and all clones share one
/// queue.
#[derive(Debug)]
pub struct Timer<M> {
    port: Port<M>,
}

impl<M> Timer<M> {
    /// Creates a new, unscheduled timer.
    pub fn new() -> Self {
        Self { port: Port::new() }
    }

    /// Schedules `message` to come due `delay` ticks from now.
    ///
    /// `delay` must be strictly positive: a timer can never fire within
    /// the tick that set it. Fails with
    /// [`NotRegistered`](SimError::NotRegistered) before the owning
    /// component has been registered, since the due time is relative to
    /// the simulator's clock.
    pub fn set(&self, message: M, delay: SimTime) -> SimResult<()> {
        if delay <= 0 {
            return Err(SimError::InvalidDelay(delay));
        }
        let registration = self.port.registration().ok_or(SimError::NotRegistered)?;
        let at = registration.clock.now() + delay;
        tracing::trace!(at, delay, "timer set");
        self.port.push(message, at);
        Ok(())
    }

    /// Due time of the earliest scheduled message, or
    /// [`NO_EVENT`](crate::types::NO_EVENT).
    pub fn peek_time(&self) -> SimTime {
        self.port.peek_time()
    }

    /// Lazily pops and yields every message due exactly at `at`.
    pub fn drain_at(&self, at: SimTime) -> Drain<M> {
        self.port.drain_at(at)
    }

    /// Number of scheduled messages not yet delivered.
    pub fn pending(&self) -> usize {
        self.port.len()
    }

    /// Returns true if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.port.is_empty()
    }
}

impl<M> Clone for Timer<M> {
    fn clone(&self) -> Self {
        Self {
            port: self.port.clone(),
        }
    }
}

impl<M> Default for Timer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Bindable for Timer<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        self.port.bind(registration)
    }
}

impl<M> WakeSource for Timer<M> {
    fn earliest_event(&self) -> SimTime {
        self.port.earliest_event()
    }
}
