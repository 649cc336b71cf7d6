//! Shared helpers for the integration suites.

#![allow(dead_code)]

use eventide::{Bindable, Component, Port, Registration, SimResult, SimTime, TickContext, WakeSource};

/// Records every received message together with its arrival time.
///
/// Hand-written against the raw component contract so the suites also
/// exercise the non-macro path.
pub struct Recorder<M: 'static> {
    pub input: Port<M>,
    pub received: Vec<(M, SimTime)>,
}

impl<M: 'static> Recorder<M> {
    pub fn new() -> Self {
        Self {
            input: Port::new(),
            received: Vec::new(),
        }
    }

    /// Received messages in arrival order.
    pub fn values(&self) -> Vec<M>
    where
        M: Clone,
    {
        self.received.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Arrival times in delivery order.
    pub fn times(&self) -> Vec<SimTime> {
        self.received.iter().map(|&(_, t)| t).collect()
    }
}

impl<M: 'static> Default for Recorder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static> Component for Recorder<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        self.input.bind(registration)
    }

    fn next_wake(&self) -> SimTime {
        self.input.earliest_event()
    }

    fn tick(&mut self, ctx: &mut TickContext) -> SimResult<()> {
        if !ctx.is_startup() && !ctx.is_shutdown() {
            let now = ctx.now();
            for message in self.input.drain_at(now) {
                self.received.push((message, now));
            }
        }
        ctx.note_wake(self.input.earliest_event());
        Ok(())
    }
}
