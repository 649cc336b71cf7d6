//! Event definitions and the time-ordered event queue.
//!
//! Events are the unit of communication in the kernel: a message paired
//! with the virtual time at which it becomes visible to its receiver.
//! Each port and timer owns one [`EventQueue`], a min-heap keyed by time
//! with FIFO order among equal-time entries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::types::{SimTime, NO_EVENT};

/// A time-stamped message.
///
/// Messages are treated as immutable once sent; a broadcast fan-out
/// clones the message handle rather than the engine taking a copy, so
/// receivers of a shared payload must not mutate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<M> {
    /// The carried message.
    pub message: M,
    /// The simulation time at which the message is due.
    pub time: SimTime,
}

impl<M> Event<M> {
    /// Creates a new event due at `time`.
    pub fn new(message: M, time: SimTime) -> Self {
        Self { message, time }
    }
}

/// Heap entry: an event plus the queue-local sequence number that keeps
/// equal-time entries in insertion order.
#[derive(Debug)]
struct Scheduled<M> {
    time: SimTime,
    seq: u64,
    message: M,
}

impl<M> PartialEq for Scheduled<M> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<M> Eq for Scheduled<M> {}

impl<M> PartialOrd for Scheduled<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Scheduled<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on (time, seq) so the std max-heap pops earliest first.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A min-heap of events keyed by time, stable among equal times.
///
/// The stability guarantee is per queue: two events pushed onto the same
/// queue with the same due time pop in push order. No ordering is implied
/// across different queues.
#[derive(Debug)]
pub struct EventQueue<M> {
    heap: BinaryHeap<Scheduled<M>>,
    next_seq: u64,
}

impl<M> EventQueue<M> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Inserts an event in time order.
    pub fn push(&mut self, event: Event<M>) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Scheduled {
            time: event.time,
            seq,
            message: event.message,
        });
    }

    /// Returns the due time of the earliest event, or [`NO_EVENT`] when
    /// the queue is empty.
    pub fn peek_time(&self) -> SimTime {
        self.heap.peek().map_or(NO_EVENT, |s| s.time)
    }

    /// Pops the earliest message if it is due exactly at `at`.
    ///
    /// Messages due later stay queued; an empty queue yields `None`.
    pub fn pop_due(&mut self, at: SimTime) -> Option<M> {
        match self.heap.peek() {
            Some(s) if s.time == at => self.heap.pop().map(|s| s.message),
            _ => None,
        }
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no event is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<M> Default for EventQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}
