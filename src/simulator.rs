//! The simulator: virtual clock owner and scheduling loop.
//!
//! The [`Simulator`] holds the registered component sequence, the shared
//! [`Clock`], and the event frontier. Its run loop is the sole scheduler:
//! startup ticks, then repeated frontier advances dispatching every due
//! component exactly once per step in registration order, then shutdown
//! ticks. All of it is single-threaded and cooperative; a tick runs to
//! completion, and the only way for a component to wait is to schedule a
//! future event and return.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::component::{Component, Phase, Registration, TickContext};
use crate::error::{SimError, SimResult};
use crate::link::Connectable;
use crate::port::Port;
use crate::types::{earlier, ComponentId, SimTime, NO_EVENT};

/// Distinguishes simulator instances so that endpoints registered with
/// one simulator cannot be connected through another.
static NEXT_SIM_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a simulator.
///
/// `register` and `connect` are only allowed while `Building`; `run`
/// moves to `Running` and leaves the simulator `Terminated` when it
/// returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SimState {
    Building,
    Running,
    Terminated,
}

/// Counters collected over one run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SimulatorStats {
    /// Number of distinct time steps the clock advanced to.
    pub steps_executed: u64,
    /// Number of component ticks dispatched inside those steps
    /// (startup and shutdown ticks not included).
    pub ticks_dispatched: u64,
}

/// A discrete-event simulator.
///
/// # Example
///
/// ```ignore
/// let mut sim = Simulator::new(0); // run until quiescent
/// let sender = Rc::new(RefCell::new(Sender::default()));
/// let receiver = Rc::new(RefCell::new(Receiver::default()));
/// sim.register(&sender)?;
/// sim.register(&receiver)?;
/// sim.connect(&sender.borrow().output, &receiver.borrow().input)?;
/// sim.run()?;
/// ```
pub struct Simulator {
    id: u64,
    clock: Clock,
    quit_time: SimTime,
    state: SimState,
    components: Vec<Rc<RefCell<dyn Component>>>,
    /// Per-component earliest wake, refreshed each step. Indexed by
    /// [`ComponentId`], so iteration order is registration order.
    frontier: Vec<SimTime>,
    next_event: SimTime,
    stats: SimulatorStats,
}

impl Simulator {
    /// Creates a simulator.
    ///
    /// `quit_time == 0` means "run until quiescent"; otherwise the loop
    /// stops once the clock has passed `quit_time`.
    pub fn new(quit_time: SimTime) -> Self {
        debug_assert!(quit_time >= 0, "quit_time must not be negative");
        Self {
            id: NEXT_SIM_ID.fetch_add(1, Ordering::Relaxed),
            clock: Clock::new(),
            quit_time,
            state: SimState::Building,
            components: Vec::new(),
            frontier: Vec::new(),
            next_event: NO_EVENT,
            stats: SimulatorStats::default(),
        }
    }

    /// Current simulation time.
    pub fn current_time(&self) -> SimTime {
        self.clock.now()
    }

    /// Earliest pending event across all components, as of the last
    /// frontier refresh, or [`NO_EVENT`] when quiescent.
    pub fn next_event(&self) -> SimTime {
        self.next_event
    }

    /// The simulator's lifecycle state.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// A component's earliest wake as of the last frontier refresh.
    pub fn component_wake(&self, id: ComponentId) -> Option<SimTime> {
        self.frontier.get(id).copied()
    }

    /// Registers a component and wires the simulator's clock and
    /// identity into every endpoint it owns.
    ///
    /// The simulator keeps a shared handle; the caller keeps the `Rc` to
    /// inspect the component after the run. Fails with
    /// [`AlreadyRegistered`](SimError::AlreadyRegistered) if this
    /// component (or any endpoint it owns) is already registered, and
    /// with [`InvalidState`](SimError::InvalidState) once `run` has been
    /// entered.
    pub fn register<C: Component>(
        &mut self,
        component: &Rc<RefCell<C>>,
    ) -> SimResult<ComponentId> {
        self.ensure_building()?;
        let handle: Rc<RefCell<dyn Component>> = component.clone();
        if self.components.iter().any(|c| Rc::ptr_eq(c, &handle)) {
            return Err(SimError::AlreadyRegistered);
        }

        let id = self.components.len();
        let registration = Registration {
            sim: self.id,
            component: id,
            clock: self.clock.clone(),
        };
        component.borrow_mut().bind(&registration)?;
        self.components.push(handle);
        self.frontier.push(NO_EVENT);
        debug!(component = id, "registered");
        Ok(id)
    }

    /// Binds a link to a target port.
    ///
    /// Both endpoints must belong to components registered with *this*
    /// simulator. A unicast [`Link`](crate::link::Link) can be bound
    /// once; broadcast and batch links accumulate targets.
    pub fn connect<M, L: Connectable<M>>(&mut self, link: &L, port: &Port<M>) -> SimResult<()> {
        self.ensure_building()?;
        let link_registration = link.registration().ok_or(SimError::NotRegistered)?;
        let port_registration = port.registration().ok_or(SimError::NotRegistered)?;
        if link_registration.sim != self.id || port_registration.sim != self.id {
            return Err(SimError::SimulatorMismatch);
        }
        link.attach(port)?;
        trace!(
            from = link_registration.component,
            to = port_registration.component,
            "connected"
        );
        Ok(())
    }

    /// Requests that the run loop stop after the step in progress.
    ///
    /// Also reachable from inside a tick through
    /// [`TickContext::quit`](crate::component::TickContext::quit).
    pub fn quit(&self) {
        self.clock.request_quit();
    }

    /// Runs the simulation to completion.
    ///
    /// Fires every component's startup tick, drives the scheduling loop
    /// until the event queue is quiescent, the quit deadline has passed
    /// or a quit was requested, then fires shutdown ticks. A tick error
    /// aborts the run immediately: shutdown hooks do not fire and the
    /// error is returned. The simulator is `Terminated` afterwards
    /// either way.
    pub fn run(&mut self) -> SimResult<()> {
        self.ensure_building()?;
        self.state = SimState::Running;
        info!(
            components = self.components.len(),
            quit_time = self.quit_time,
            "simulation starting"
        );

        let result = self.drive();
        self.state = SimState::Terminated;
        match &result {
            Ok(()) => info!(
                final_time = self.clock.now(),
                steps = self.stats.steps_executed,
                ticks = self.stats.ticks_dispatched,
                "simulation complete"
            ),
            Err(error) => info!(%error, at = self.clock.now(), "simulation aborted"),
        }
        result
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &SimulatorStats {
        &self.stats
    }

    /// Exports run statistics as JSON.
    pub fn export_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state,
            "current_time": self.clock.now(),
            "next_event": self.next_event,
            "components": self.components.len(),
            "steps_executed": self.stats.steps_executed,
            "ticks_dispatched": self.stats.ticks_dispatched,
        })
    }

    fn ensure_building(&self) -> SimResult<()> {
        if self.state != SimState::Building {
            return Err(SimError::InvalidState(self.state));
        }
        Ok(())
    }

    fn drive(&mut self) -> SimResult<()> {
        self.dispatch_phase(Phase::Startup)?;
        self.refresh_frontier();

        while self.keep_going() {
            let now = self.next_event;
            self.clock.advance_to(now);
            self.stats.steps_executed += 1;
            debug!(now, "frontier step");

            for index in 0..self.components.len() {
                let component = Rc::clone(&self.components[index]);
                let wake = component.borrow().next_wake();
                self.frontier[index] = wake;
                if wake == now {
                    let mut ctx = TickContext::new(self.clock.clone(), Phase::Step);
                    component.borrow_mut().tick(&mut ctx)?;
                    self.frontier[index] = ctx.wake();
                    self.stats.ticks_dispatched += 1;
                    trace!(component = index, now, "ticked");
                }
            }

            self.refresh_frontier();
            // Every event due at `now` was consumed, so the frontier
            // must have moved strictly forward.
            debug_assert!(
                self.next_event == NO_EVENT || self.next_event > now,
                "scheduler made no progress at t={}",
                now
            );
        }

        self.dispatch_phase(Phase::Shutdown)
    }

    fn keep_going(&self) -> bool {
        !self.clock.quit_requested()
            && self.next_event != NO_EVENT
            && (self.quit_time == 0 || self.quit_time >= self.clock.now())
    }

    fn dispatch_phase(&mut self, phase: Phase) -> SimResult<()> {
        for index in 0..self.components.len() {
            let component = Rc::clone(&self.components[index]);
            let mut ctx = TickContext::new(self.clock.clone(), phase);
            component.borrow_mut().tick(&mut ctx)?;
            self.frontier[index] = ctx.wake();
        }
        Ok(())
    }

    fn refresh_frontier(&mut self) {
        let mut next = NO_EVENT;
        for (index, component) in self.components.iter().enumerate() {
            let wake = component.borrow().next_wake();
            self.frontier[index] = wake;
            next = earlier(next, wake);
        }
        self.next_event = next;
    }
}
