//! The component contract and the per-tick execution context.
//!
//! A component is a user-defined state machine owning any combination of
//! ports, links and timers. The simulator holds components as trait
//! objects and drives them through three hooks:
//!
//! - [`Component::bind`] wires the simulator's registration (identity and
//!   clock) into every endpoint the component owns,
//! - [`Component::next_wake`] reports the earliest pending event across
//!   the component's ports and timers,
//! - [`Component::tick`] runs the component's behavior for one wake.
//!
//! The [`component!`](crate::component!) macro generates all three from a
//! declarative block; hand-written implementations are equally valid and
//! follow the same contract.

use crate::clock::Clock;
use crate::error::SimResult;
use crate::types::{earlier, ComponentId, SimTime, NO_EVENT};

/// Identity handed to a component at registration.
///
/// Carries the owning simulator's id, the dense component id assigned by
/// registration order, and a handle to the simulator's clock. Endpoints
/// keep a copy so that sends can be stamped with the current time and
/// connections can be checked for simulator membership.
#[derive(Clone, Debug)]
pub struct Registration {
    pub(crate) sim: u64,
    pub(crate) component: ComponentId,
    pub(crate) clock: Clock,
}

impl Registration {
    /// The dense id this registration assigned.
    pub fn component_id(&self) -> ComponentId {
        self.component
    }
}

/// Which of the three tick flavors is being dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Startup,
    Step,
    Shutdown,
}

/// Per-tick execution context.
///
/// The context is the behavior body's window onto the simulator: it
/// exposes the current time, the startup/shutdown flags, and a
/// [`quit`](TickContext::quit) request. It also accumulates the
/// component's residual wake time — the earliest event still pending on
/// any of its ports or timers after the tick — which the simulator folds
/// into the global frontier.
#[derive(Debug)]
pub struct TickContext {
    clock: Clock,
    now: SimTime,
    phase: Phase,
    wake: SimTime,
}

impl TickContext {
    pub(crate) fn new(clock: Clock, phase: Phase) -> Self {
        // The time is captured once on entry: everything the tick drains
        // is decided here, not by later clock reads.
        let now = clock.now();
        Self {
            clock,
            now,
            phase,
            wake: NO_EVENT,
        }
    }

    /// The simulation time this tick runs at.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// True for the one tick dispatched before the clock starts moving.
    pub fn is_startup(&self) -> bool {
        self.phase == Phase::Startup
    }

    /// True for the one tick dispatched after the run loop has exited.
    pub fn is_shutdown(&self) -> bool {
        self.phase == Phase::Shutdown
    }

    /// Asks the simulator to stop. The step in progress completes, the
    /// loop exits, and shutdown ticks still run.
    pub fn quit(&self) {
        self.clock.request_quit();
    }

    /// Folds an earliest-event time into the component's residual wake.
    ///
    /// Behavior bodies normally never call this themselves; the generated
    /// tick folds every port's and timer's residue before returning.
    pub fn note_wake(&mut self, t: SimTime) {
        self.wake = earlier(self.wake, t);
    }

    /// The residual wake accumulated by this tick.
    pub(crate) fn wake(&self) -> SimTime {
        self.wake
    }
}

/// The contract every simulated component implements.
///
/// Implementations are usually generated by [`component!`](crate::component!).
pub trait Component: 'static {
    /// Wires `registration` into every port, link and timer this
    /// component owns, including endpoints stored inside sequences.
    ///
    /// Fails with [`AlreadyRegistered`](crate::error::SimError::AlreadyRegistered)
    /// if any endpoint already belongs to a simulator.
    fn bind(&mut self, registration: &Registration) -> SimResult<()>;

    /// Earliest pending event across all owned ports and timers, or
    /// [`NO_EVENT`] when nothing is scheduled.
    fn next_wake(&self) -> SimTime;

    /// Runs one tick. The base implementation does nothing.
    fn tick(&mut self, ctx: &mut TickContext) -> SimResult<()> {
        let _ = ctx;
        Ok(())
    }
}

/// An endpoint that can be wired into a simulator at registration.
///
/// Implemented by ports, links and timers, and structurally by `Vec`s
/// and arrays of such endpoints so that components can own fan-out
/// collections (one link per peer, say) and still register in one call.
pub trait Bindable {
    /// Stamps the endpoint with its owner's registration.
    fn bind(&mut self, registration: &Registration) -> SimResult<()>;
}

impl<T: Bindable> Bindable for Vec<T> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        for item in self.iter_mut() {
            item.bind(registration)?;
        }
        Ok(())
    }
}

impl<T: Bindable, const N: usize> Bindable for [T; N] {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        for item in self.iter_mut() {
            item.bind(registration)?;
        }
        Ok(())
    }
}

/// An inbound endpoint that can report its earliest pending event.
///
/// Implemented by ports and timers (links are write-only and never wake
/// their owner), and structurally by `Vec`s and arrays of wake sources.
pub trait WakeSource {
    /// Due time of the earliest pending event, or [`NO_EVENT`].
    fn earliest_event(&self) -> SimTime;
}

impl<T: WakeSource> WakeSource for Vec<T> {
    fn earliest_event(&self) -> SimTime {
        self.iter()
            .fold(NO_EVENT, |acc, s| earlier(acc, s.earliest_event()))
    }
}

impl<T: WakeSource, const N: usize> WakeSource for [T; N] {
    fn earliest_event(&self) -> SimTime {
        self.iter()
            .fold(NO_EVENT, |acc, s| earlier(acc, s.earliest_event()))
    }
}
