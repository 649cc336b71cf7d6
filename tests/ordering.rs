//! Causality and ordering guarantees.
//!
//! Latency floor, per-port FIFO among equal arrival times, cross-delay
//! reordering, clock monotonicity, and broadcast fan-out counts.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::Recorder;
use eventide::{component, BroadcastLink, Link, Port, SimTime, Simulator, NO_EVENT};

// ============================================================================
// Latency floor: no same-tick delivery
// ============================================================================

struct Player {
    input: Port<u32>,
    output: Link<u32>,
    seen: Vec<(u32, SimTime)>,
    limit: u32,
    serves: bool,
}

component! {
    Player {
        ports: [input],
        links: [output],
        startup(this, _ctx) {
            if this.serves {
                this.output.send(0)?;
            }
        }
        on_message(input: value, this, ctx) {
            this.seen.push((value, ctx.now()));
            if value < this.limit {
                this.output.send(value + 1)?;
            }
        }
    }
}

fn player(serves: bool) -> Rc<RefCell<Player>> {
    Rc::new(RefCell::new(Player {
        input: Port::new(),
        output: Link::new(1).unwrap(),
        seen: Vec::new(),
        limit: 5,
        serves,
    }))
}

#[test]
fn test_rally_never_delivers_in_the_sending_tick() {
    let mut sim = Simulator::new(0);
    let a = player(true);
    let b = player(false);
    sim.register(&a).unwrap();
    sim.register(&b).unwrap();

    let a_out = a.borrow().output.clone();
    let b_in = b.borrow().input.clone();
    sim.connect(&a_out, &b_in).unwrap();
    let b_out = b.borrow().output.clone();
    let a_in = a.borrow().input.clone();
    sim.connect(&b_out, &a_in).unwrap();

    sim.run().unwrap();

    // Value v is sent at time v and must arrive at v + 1, never sooner.
    for (value, at) in a.borrow().seen.iter().chain(b.borrow().seen.iter()) {
        assert_eq!(*at, *value as SimTime + 1);
    }
    assert_eq!(b.borrow().seen.len(), 3); // 0, 2, 4
    assert_eq!(a.borrow().seen.len(), 3); // 1, 3, 5
    assert_eq!(sim.current_time(), 6);
}

// ============================================================================
// FIFO among equal arrival times, reordering across unequal delays
// ============================================================================

struct Burst {
    output: Link<i32>,
    /// (payload, extra delay) pairs sent in order at startup.
    sends: Vec<(i32, SimTime)>,
}

component! {
    Burst {
        ports: [],
        links: [output],
        startup(this, _ctx) {
            for index in 0..this.sends.len() {
                let (payload, extra) = this.sends[index];
                this.output.send_after(payload, extra)?;
            }
        }
    }
}

fn run_burst(sends: Vec<(i32, SimTime)>) -> (Vec<(i32, SimTime)>, SimTime) {
    let mut sim = Simulator::new(0);
    let burst = Rc::new(RefCell::new(Burst {
        output: Link::new(1).unwrap(),
        sends,
    }));
    let receiver = Rc::new(RefCell::new(Recorder::<i32>::new()));
    sim.register(&burst).unwrap();
    sim.register(&receiver).unwrap();
    let output = burst.borrow().output.clone();
    let input = receiver.borrow().input.clone();
    sim.connect(&output, &input).unwrap();
    sim.run().unwrap();
    let received = receiver.borrow().received.clone();
    (received, sim.current_time())
}

#[test]
fn test_equal_time_arrivals_keep_send_order() {
    let (received, _) = run_burst(vec![(10, 0), (20, 0), (30, 0)]);
    assert_eq!(received, vec![(10, 1), (20, 1), (30, 1)]);
}

#[test]
fn test_smaller_delay_overtakes_earlier_send() {
    let (received, final_time) = run_burst(vec![(1, 10), (2, 0)]);
    // The second send carries less total latency and arrives first.
    assert_eq!(received, vec![(2, 1), (1, 11)]);
    assert_eq!(final_time, 11);
}

#[test]
fn test_arrival_is_send_time_plus_total_latency() {
    let mut sim = Simulator::new(0);
    let burst = Rc::new(RefCell::new(Burst {
        output: Link::new(3).unwrap(),
        sends: vec![(9, 4)],
    }));
    let receiver = Rc::new(RefCell::new(Recorder::<i32>::new()));
    sim.register(&burst).unwrap();
    sim.register(&receiver).unwrap();
    let output = burst.borrow().output.clone();
    let input = receiver.borrow().input.clone();
    sim.connect(&output, &input).unwrap();

    sim.run().unwrap();

    // Sent at 0 over latency 3 with 4 extra ticks.
    assert_eq!(receiver.borrow().received, vec![(9, 7)]);
}

// ============================================================================
// Clock monotonicity
// ============================================================================

#[test]
fn test_arrivals_from_many_sources_are_seen_in_time_order() {
    let mut sim = Simulator::new(0);
    let near = Rc::new(RefCell::new(Burst {
        output: Link::new(1).unwrap(),
        sends: vec![(1, 0), (4, 6)],
    }));
    let far = Rc::new(RefCell::new(Burst {
        output: Link::new(1).unwrap(),
        sends: vec![(2, 2), (3, 30)],
    }));
    let receiver = Rc::new(RefCell::new(Recorder::<i32>::new()));
    sim.register(&near).unwrap();
    sim.register(&far).unwrap();
    sim.register(&receiver).unwrap();

    let input = receiver.borrow().input.clone();
    let near_out = near.borrow().output.clone();
    let far_out = far.borrow().output.clone();
    sim.connect(&near_out, &input).unwrap();
    sim.connect(&far_out, &input).unwrap();

    sim.run().unwrap();

    let times = receiver.borrow().times();
    assert_eq!(times, vec![1, 3, 7, 31]);
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(sim.current_time(), 31);
}

// ============================================================================
// Broadcast fan-out
// ============================================================================

struct Shouter {
    output: BroadcastLink<i32>,
}

component! {
    Shouter {
        ports: [],
        links: [output],
        startup(this, _ctx) {
            this.output.send(99)?;
        }
    }
}

#[test]
fn test_broadcast_enqueues_exactly_n_same_time_events() {
    let mut sim = Simulator::new(0);
    let shouter = Rc::new(RefCell::new(Shouter {
        output: BroadcastLink::new(2).unwrap(),
    }));
    sim.register(&shouter).unwrap();

    let receivers: Vec<_> = (0..3)
        .map(|_| Rc::new(RefCell::new(Recorder::<i32>::new())))
        .collect();
    let output = shouter.borrow().output.clone();
    for receiver in &receivers {
        sim.register(receiver).unwrap();
        let input = receiver.borrow().input.clone();
        sim.connect(&output, &input).unwrap();
    }
    assert_eq!(output.fan_out(), 3);

    sim.run().unwrap();

    for receiver in &receivers {
        assert_eq!(receiver.borrow().received, vec![(99, 2)]);
    }
}

// ============================================================================
// Frontier bookkeeping
// ============================================================================

#[test]
fn test_quiescent_simulator_reports_no_event() {
    let mut sim = Simulator::new(0);
    let receiver = Rc::new(RefCell::new(Recorder::<i32>::new()));
    let id = sim.register(&receiver).unwrap();
    assert_eq!(sim.next_event(), NO_EVENT);

    sim.run().unwrap();

    assert_eq!(sim.next_event(), NO_EVENT);
    assert_eq!(sim.component_wake(id), Some(NO_EVENT));
}
