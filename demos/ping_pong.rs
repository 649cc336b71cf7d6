//! Two-component ping-pong example.
//!
//! A server and a returner rally a counter back and forth over unicast
//! links with one tick of latency per hop, demonstrating component
//! declaration, wiring, and the run loop. Run with:
//!
//! ```text
//! cargo run --example ping_pong
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use eventide::{component, Link, Port, SimTime, Simulator};

const RALLY_LENGTH: u64 = 10;

struct Paddle {
    name: &'static str,
    input: Port<u64>,
    output: Link<u64>,
    serves: bool,
    hits: Vec<(u64, SimTime)>,
}

impl Paddle {
    fn new(name: &'static str, serves: bool) -> Self {
        Self {
            name,
            input: Port::new(),
            output: Link::new(1).unwrap(),
            serves,
            hits: Vec::new(),
        }
    }
}

component! {
    Paddle {
        ports: [input],
        links: [output],
        startup(this, _ctx) {
            if this.serves {
                println!("{} serves", this.name);
                this.output.send(0)?;
            }
        }
        on_message(input: count, this, ctx) {
            println!("t={:>2}  {} returns ball #{}", ctx.now(), this.name, count);
            this.hits.push((count, ctx.now()));
            if count < RALLY_LENGTH {
                this.output.send(count + 1)?;
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut sim = Simulator::new(0);
    let ping = Rc::new(RefCell::new(Paddle::new("ping", true)));
    let pong = Rc::new(RefCell::new(Paddle::new("pong", false)));
    sim.register(&ping).expect("register ping");
    sim.register(&pong).expect("register pong");

    let ping_out = ping.borrow().output.clone();
    let pong_in = pong.borrow().input.clone();
    sim.connect(&ping_out, &pong_in).expect("wire ping -> pong");
    let pong_out = pong.borrow().output.clone();
    let ping_in = ping.borrow().input.clone();
    sim.connect(&pong_out, &ping_in).expect("wire pong -> ping");

    sim.run().expect("simulation failed");

    println!();
    println!(
        "rally over after {} ticks: ping hit {} times, pong hit {} times",
        sim.current_time(),
        ping.borrow().hits.len(),
        pong.borrow().hits.len()
    );
    println!("stats: {}", sim.export_stats());
}
