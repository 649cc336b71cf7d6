//! Outbound link handles.
//!
//! A link is a component's sending side: a handle bound to one target
//! port ([`Link`]), to any number of them ([`BroadcastLink`]), or to a
//! batch channel whose latency the engine chooses ([`BatchLink`]). Every
//! link carries a minimum latency of at least one tick, which is what
//! makes the scheduling loop causally safe: nothing sent during a tick
//! can come due in that same tick, and a future parallel scheduler may
//! use link latencies as its safe-frontier bound.

use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{Bindable, Registration};
use crate::error::{SimError, SimResult};
use crate::port::Port;
use crate::types::SimTime;

/// Latency the engine assigns to [`BatchLink`]s.
///
/// Currently the floor of one tick; reserved to grow once a parallel
/// scheduler wants coarser time frontiers for batch traffic.
pub const BATCH_LATENCY: SimTime = 1;

/// An outbound handle that can be bound to a target port by
/// [`Simulator::connect`](crate::simulator::Simulator::connect).
pub trait Connectable<M> {
    /// The registration stamped at bind time, if any. Used by the
    /// simulator to verify that both ends live in the same simulation.
    fn registration(&self) -> Option<Registration>;

    /// Binds `port` as a target. Called by the simulator after its
    /// registration checks have passed.
    fn attach(&self, port: &Port<M>) -> SimResult<()>;
}

#[derive(Debug)]
struct LinkInner<M> {
    latency: SimTime,
    target: Option<Port<M>>,
    registration: Option<Registration>,
}

/// A unicast link: one sender, one target port.
///
/// Cloning the handle shares the connection state, so a component can
/// hand a clone to helper code while the simulator wires the original.
#[derive(Debug)]
pub struct Link<M> {
    inner: Rc<RefCell<LinkInner<M>>>,
}

impl<M> Link<M> {
    /// Creates a link with the given minimum latency.
    ///
    /// `latency` must be strictly positive; a zero-latency link would
    /// let a message arrive in the tick that sent it.
    pub fn new(latency: SimTime) -> SimResult<Self> {
        if latency <= 0 {
            return Err(SimError::InvalidLatency(latency));
        }
        Ok(Self {
            inner: Rc::new(RefCell::new(LinkInner {
                latency,
                target: None,
                registration: None,
            })),
        })
    }

    /// The link's base latency.
    pub fn latency(&self) -> SimTime {
        self.inner.borrow().latency
    }

    /// True once the link has been connected to a port.
    pub fn is_connected(&self) -> bool {
        self.inner.borrow().target.is_some()
    }

    /// Sends `message`; it arrives at the target port after the link's
    /// latency.
    pub fn send(&self, message: M) -> SimResult<()> {
        self.send_after(message, 0)
    }

    /// Sends `message` with `extra_delay` ticks on top of the link's
    /// latency.
    ///
    /// `extra_delay` must be non-negative. Fails with
    /// [`NotConnected`](SimError::NotConnected) on an unbound link; the
    /// message is not enqueued anywhere on failure.
    pub fn send_after(&self, message: M, extra_delay: SimTime) -> SimResult<()> {
        if extra_delay < 0 {
            return Err(SimError::InvalidDelay(extra_delay));
        }
        let inner = self.inner.borrow();
        let registration = inner.registration.as_ref().ok_or(SimError::NotRegistered)?;
        let target = inner.target.as_ref().ok_or(SimError::NotConnected)?;
        let at = registration.clock.now() + inner.latency + extra_delay;
        tracing::trace!(at, latency = inner.latency, extra_delay, "send");
        target.push(message, at);
        Ok(())
    }
}

impl<M> Clone for Link<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Bindable for Link<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.registration.is_some() {
            return Err(SimError::AlreadyRegistered);
        }
        inner.registration = Some(registration.clone());
        Ok(())
    }
}

impl<M> Connectable<M> for Link<M> {
    fn registration(&self) -> Option<Registration> {
        self.inner.borrow().registration.clone()
    }

    fn attach(&self, port: &Port<M>) -> SimResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.target.is_some() {
            return Err(SimError::AlreadyConnected);
        }
        inner.target = Some(port.clone());
        Ok(())
    }
}

#[derive(Debug)]
struct FanOutInner<M> {
    latency: SimTime,
    targets: Vec<Port<M>>,
    registration: Option<Registration>,
}

impl<M: Clone> FanOutInner<M> {
    /// Enqueues a clone of `message` onto every target, all with the
    /// same due time. A fan-out with no targets sends nothing.
    fn send_after(&self, message: M, extra_delay: SimTime) -> SimResult<()> {
        if extra_delay < 0 {
            return Err(SimError::InvalidDelay(extra_delay));
        }
        if self.targets.is_empty() {
            return Ok(());
        }
        let registration = self.registration.as_ref().ok_or(SimError::NotRegistered)?;
        let at = registration.clock.now() + self.latency + extra_delay;
        tracing::trace!(at, fan_out = self.targets.len(), "broadcast send");
        for target in &self.targets {
            target.push(message.clone(), at);
        }
        Ok(())
    }
}

/// A broadcast link: one sender, zero or more target ports.
///
/// Sending on a broadcast link with no targets is a silent no-op, unlike
/// the unicast [`Link`] where it is an error. The message handle is
/// cloned per target rather than the payload being copied by the engine;
/// wrap large payloads in `Rc` and treat them as immutable after send.
#[derive(Debug)]
pub struct BroadcastLink<M> {
    inner: Rc<RefCell<FanOutInner<M>>>,
}

impl<M> BroadcastLink<M> {
    /// Creates a broadcast link with the given minimum latency.
    pub fn new(latency: SimTime) -> SimResult<Self> {
        if latency <= 0 {
            return Err(SimError::InvalidLatency(latency));
        }
        Ok(Self {
            inner: Rc::new(RefCell::new(FanOutInner {
                latency,
                targets: Vec::new(),
                registration: None,
            })),
        })
    }

    /// The link's base latency.
    pub fn latency(&self) -> SimTime {
        self.inner.borrow().latency
    }

    /// Number of ports currently bound.
    pub fn fan_out(&self) -> usize {
        self.inner.borrow().targets.len()
    }
}

impl<M: Clone> BroadcastLink<M> {
    /// Sends `message` to every bound port.
    pub fn send(&self, message: M) -> SimResult<()> {
        self.send_after(message, 0)
    }

    /// Sends `message` to every bound port with `extra_delay` extra
    /// ticks of latency.
    pub fn send_after(&self, message: M, extra_delay: SimTime) -> SimResult<()> {
        self.inner.borrow().send_after(message, extra_delay)
    }
}

impl<M> Clone for BroadcastLink<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Bindable for BroadcastLink<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.registration.is_some() {
            return Err(SimError::AlreadyRegistered);
        }
        inner.registration = Some(registration.clone());
        Ok(())
    }
}

impl<M> Connectable<M> for BroadcastLink<M> {
    fn registration(&self) -> Option<Registration> {
        self.inner.borrow().registration.clone()
    }

    fn attach(&self, port: &Port<M>) -> SimResult<()> {
        self.inner.borrow_mut().targets.push(port.clone());
        Ok(())
    }
}

/// A batch link: fan-out semantics with an engine-chosen latency.
///
/// Batch links exist for traffic where the sender does not care about
/// the exact delay, only that delivery happens "soon"; keeping the
/// latency in the engine's hands leaves room to widen it for coarser
/// scheduling frontiers later. Today it is [`BATCH_LATENCY`].
#[derive(Debug)]
pub struct BatchLink<M> {
    inner: Rc<RefCell<FanOutInner<M>>>,
}

impl<M> BatchLink<M> {
    /// Creates a batch link. The latency is not caller-chosen.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(FanOutInner {
                latency: BATCH_LATENCY,
                targets: Vec::new(),
                registration: None,
            })),
        }
    }

    /// The engine-assigned latency.
    pub fn latency(&self) -> SimTime {
        self.inner.borrow().latency
    }

    /// Number of ports currently bound.
    pub fn fan_out(&self) -> usize {
        self.inner.borrow().targets.len()
    }
}

impl<M: Clone> BatchLink<M> {
    /// Sends `message` to every bound port.
    pub fn send(&self, message: M) -> SimResult<()> {
        self.send_after(message, 0)
    }

    /// Sends `message` with `extra_delay` extra ticks of latency.
    pub fn send_after(&self, message: M, extra_delay: SimTime) -> SimResult<()> {
        self.inner.borrow().send_after(message, extra_delay)
    }
}

impl<M> Clone for BatchLink<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for BatchLink<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Bindable for BatchLink<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.registration.is_some() {
            return Err(SimError::AlreadyRegistered);
        }
        inner.registration = Some(registration.clone());
        Ok(())
    }
}

impl<M> Connectable<M> for BatchLink<M> {
    fn registration(&self) -> Option<Registration> {
        self.inner.borrow().registration.clone()
    }

    fn attach(&self, port: &Port<M>) -> SimResult<()> {
        self.inner.borrow_mut().targets.push(port.clone());
        Ok(())
    }
}
