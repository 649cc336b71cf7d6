//! # Eventide Simulation Kernel
//!
//! A discrete-event simulation kernel: model a system as a graph of
//! components exchanging time-stamped messages over latency-bearing
//! links, and let a deterministic virtual clock deliver those messages
//! in causal order.
//!
//! ## Design Principles
//!
//! - **Per-port event queues**: every inbound [`Port`] and [`Timer`]
//!   owns its own time-ordered heap; the simulator's frontier is the
//!   minimum over the components' earliest pending events.
//! - **Latency as the causality contract**: every link delays by at
//!   least one tick, so nothing sent during a step can come due in that
//!   same step. The contract doubles as the safe-frontier bound a future
//!   parallel scheduler could partition on.
//! - **Declarative behavior**: the [`component!`] macro binds a struct's
//!   ports, links and timers to startup/shutdown hooks and per-message
//!   handlers, generating the wake bookkeeping that keeps the frontier
//!   honest.
//! - **Deterministic, single-threaded**: components tick exactly once
//!   per due step, in registration order, with FIFO delivery among
//!   equal-time messages at one port.

pub mod behavior;
pub mod clock;
pub mod component;
pub mod error;
pub mod event;
pub mod link;
pub mod port;
pub mod simulator;
pub mod timer;
pub mod types;

// Re-export commonly used types
pub use clock::Clock;
pub use component::{Bindable, Component, Registration, TickContext, WakeSource};
pub use error::{SimError, SimResult};
pub use event::{Event, EventQueue};
pub use link::{BatchLink, BroadcastLink, Connectable, Link, BATCH_LATENCY};
pub use port::{Drain, Port};
pub use simulator::{SimState, Simulator, SimulatorStats};
pub use timer::Timer;
pub use types::{ComponentId, SimTime, NO_EVENT};
