//! Inbound message ports.
//!
//! A [`Port`] is a component's inbound queue for one message type. The
//! handle is reference-shared: the owning component reads from it, and
//! any number of links hold clones of the same handle to write into it.
//! The queue lives as long as the longest-lived holder.

use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{Bindable, Registration, WakeSource};
use crate::error::{SimError, SimResult};
use crate::event::{Event, EventQueue};
use crate::types::{SimTime, NO_EVENT};

#[derive(Debug)]
pub(crate) struct PortInner<M> {
    queue: EventQueue<M>,
    registration: Option<Registration>,
}

/// A component's inbound event queue for messages of type `M`.
///
/// Cloning a `Port` clones the handle, not the queue: all clones drain
/// and fill the same underlying heap. Reads happen through
/// [`drain_at`](Port::drain_at) (normally via an `on_message` block);
/// writes happen through connected links.
#[derive(Debug)]
pub struct Port<M> {
    inner: Rc<RefCell<PortInner<M>>>,
}

impl<M> Port<M> {
    /// Creates a new, empty port.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(PortInner {
                queue: EventQueue::new(),
                registration: None,
            })),
        }
    }

    /// Due time of the earliest queued event, or [`NO_EVENT`].
    pub fn peek_time(&self) -> SimTime {
        self.inner.borrow().queue.peek_time()
    }

    /// Lazily pops and yields every message due exactly at `at`.
    ///
    /// Messages due later stay queued. The queue must not hold anything
    /// older than `at`; a stale event here means the scheduler failed to
    /// dispatch it on time, which is an engine bug.
    pub fn drain_at(&self, at: SimTime) -> Drain<M> {
        let earliest = self.peek_time();
        assert!(
            earliest == NO_EVENT || earliest >= at,
            "port holds a past-dated event: earliest {} at dispatch time {}",
            earliest,
            at
        );
        Drain {
            inner: Rc::clone(&self.inner),
            at,
        }
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().queue.is_empty()
    }

    /// Enqueues a message due at `at`. Write path for links and timers.
    pub(crate) fn push(&self, message: M, at: SimTime) {
        self.inner.borrow_mut().queue.push(Event::new(message, at));
    }

    /// The registration stamped at bind time, if any.
    pub(crate) fn registration(&self) -> Option<Registration> {
        self.inner.borrow().registration.clone()
    }
}

impl<M> Clone for Port<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for Port<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Bindable for Port<M> {
    fn bind(&mut self, registration: &Registration) -> SimResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.registration.is_some() {
            return Err(SimError::AlreadyRegistered);
        }
        inner.registration = Some(registration.clone());
        Ok(())
    }
}

impl<M> WakeSource for Port<M> {
    fn earliest_event(&self) -> SimTime {
        self.peek_time()
    }
}

/// Lazy iterator over the messages due at one instant.
///
/// Each `next` pops at most one message, so a behavior body may push new
/// (strictly later) events onto the same port while draining it.
#[derive(Debug)]
pub struct Drain<M> {
    inner: Rc<RefCell<PortInner<M>>>,
    at: SimTime,
}

impl<M> Iterator for Drain<M> {
    type Item = M;

    fn next(&mut self) -> Option<M> {
        self.inner.borrow_mut().queue.pop_due(self.at)
    }
}
