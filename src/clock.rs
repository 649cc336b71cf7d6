//! The shared virtual clock.
//!
//! One [`Clock`] is created per simulator and a handle to it is wired
//! into every port, link and timer at registration. Links read it to
//! stamp outgoing events; tick contexts read it to expose the current
//! time to behavior bodies; the quit flag rides along so that a tick
//! body can request a stop without holding a simulator reference.

use std::cell::Cell;
use std::rc::Rc;

use crate::types::SimTime;

#[derive(Debug, Default)]
struct ClockCell {
    now: Cell<SimTime>,
    quit: Cell<bool>,
}

/// Cheap, cloneable handle to a simulator's virtual time.
///
/// All clones observe the same time; the simulator's run loop is the
/// only writer. Single-threaded by construction (`Rc` + `Cell`).
#[derive(Clone, Debug, Default)]
pub struct Clock {
    inner: Rc<ClockCell>,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.inner.now.get()
    }

    /// Advances the clock. Time is monotone over the whole run.
    pub(crate) fn advance_to(&self, t: SimTime) {
        assert!(
            t >= self.inner.now.get(),
            "virtual time moved backwards: {} -> {}",
            self.inner.now.get(),
            t
        );
        self.inner.now.set(t);
    }

    /// Requests that the run loop stop after the step in progress.
    pub fn request_quit(&self) {
        self.inner.quit.set(true);
    }

    /// Returns true once a quit has been requested.
    pub fn quit_requested(&self) -> bool {
        self.inner.quit.get()
    }

    /// Returns true if `other` is a handle to the same clock.
    pub(crate) fn same_clock(&self, other: &Clock) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = Clock::new();
        let view = clock.clone();
        clock.advance_to(15);
        assert_eq!(view.now(), 15);
        assert!(clock.same_clock(&view));
    }

    #[test]
    fn test_quit_flag_is_shared() {
        let clock = Clock::new();
        let view = clock.clone();
        assert!(!clock.quit_requested());
        view.request_quit();
        assert!(clock.quit_requested());
    }

    #[test]
    #[should_panic(expected = "virtual time moved backwards")]
    fn test_time_cannot_rewind() {
        let clock = Clock::new();
        clock.advance_to(10);
        clock.advance_to(9);
    }

    #[test]
    fn test_distinct_clocks_differ() {
        let a = Clock::new();
        let b = Clock::new();
        assert!(!a.same_clock(&b));
    }
}
