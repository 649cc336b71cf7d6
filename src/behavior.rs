//! Declarative behavior binding.
//!
//! The [`component!`](crate::component!) macro turns a plain struct into
//! a [`Component`](crate::component::Component) from a declarative
//! block: which fields are inbound (ports and timers), which are
//! outbound (links), and what to run at startup, at shutdown, and per
//! arriving message. The macro generates the three contract methods —
//! `bind`, `next_wake` and `tick` — so the struct definition stays a
//! plain record of its endpoints and state.
//!
//! # Block structure
//!
//! ```text
//! component! {
//!     TypeName {
//!         ports: [port_or_timer_field, ...],
//!         links: [link_field, ...],
//!         startup(this, ctx) { ... }              // optional
//!         shutdown(this, ctx) { ... }             // optional
//!         on_message(port: msg, this, ctx) { ... } // zero or more
//!         on_timer(timer: msg, this, ctx) { ... }  // zero or more
//!     }
//! }
//! ```
//!
//! `ports` lists every [`Port`](crate::port::Port) and
//! [`Timer`](crate::timer::Timer) field (including `Vec`s and arrays of
//! them); these feed the generated `next_wake`. `links` lists every
//! outbound field. Both lists feed the generated `bind`. Sections must
//! appear in the order shown; each is optional, the lists may be empty.
//!
//! Every `ports` entry that actually receives traffic needs a matching
//! `on_message`/`on_timer` arm, and arms only bind scalar fields: a
//! component that lets a due event sit undrained stalls the frontier,
//! which the scheduler flags as a contract violation in debug builds.
//!
//! The binder idents (`this`, `ctx`, the message name) are chosen by the
//! caller; `ctx` is the uniform handle onto the simulator, exposing
//! [`now`](crate::component::TickContext::now) and
//! [`quit`](crate::component::TickContext::quit).
//!
//! # Generated tick semantics
//!
//! - The current time is captured into a local on entry; every drain in
//!   the tick uses that captured instant.
//! - The residual-wake accumulator starts at
//!   [`NO_EVENT`](crate::types::NO_EVENT).
//! - `startup` and `shutdown` bodies never consume messages.
//! - Each `on_message`/`on_timer` body runs once per message due at the
//!   captured time, earliest first, FIFO among equal-time arrivals on
//!   one port.
//! - Before returning, the earliest remaining event of every `ports`
//!   entry is folded into the context so the simulator can compute the
//!   next global wake.
//! - Bodies may use `?`; an error aborts the run.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use eventide::{component, Link, Port, Simulator};
//!
//! struct Pinger {
//!     output: Link<u32>,
//! }
//!
//! component! {
//!     Pinger {
//!         ports: [],
//!         links: [output],
//!         startup(this, _ctx) {
//!             this.output.send(5)?;
//!         }
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Counter {
//!     input: Port<u32>,
//!     total: u32,
//! }
//!
//! component! {
//!     Counter {
//!         ports: [input],
//!         links: [],
//!         on_message(input: value, this, _ctx) {
//!             this.total += value;
//!         }
//!     }
//! }
//!
//! let mut sim = Simulator::new(0);
//! let pinger = Rc::new(RefCell::new(Pinger {
//!     output: Link::new(1).unwrap(),
//! }));
//! let counter = Rc::new(RefCell::new(Counter::default()));
//! sim.register(&pinger).unwrap();
//! sim.register(&counter).unwrap();
//!
//! let output = pinger.borrow().output.clone();
//! let input = counter.borrow().input.clone();
//! sim.connect(&output, &input).unwrap();
//!
//! sim.run().unwrap();
//! assert_eq!(counter.borrow().total, 5);
//! ```

/// Generates a [`Component`](crate::component::Component) implementation
/// from a declarative behavior block. See the [module
/// documentation](crate::behavior) for the block structure and the
/// generated semantics.
#[macro_export]
macro_rules! component {
    (
        $ty:ty {
            ports: [$($wake:ident),* $(,)?],
            links: [$($link:ident),* $(,)?],
            $(startup($sthis:ident, $sctx:ident) $startup:block)?
            $(shutdown($hthis:ident, $hctx:ident) $shutdown:block)?
            $(on_message($mport:ident: $mmsg:ident, $mthis:ident, $mctx:ident) $mbody:block)*
            $(on_timer($tport:ident: $tmsg:ident, $tthis:ident, $tctx:ident) $tbody:block)*
        }
    ) => {
        impl $crate::component::Component for $ty {
            fn bind(
                &mut self,
                registration: &$crate::component::Registration,
            ) -> $crate::error::SimResult<()> {
                $($crate::component::Bindable::bind(&mut self.$wake, registration)?;)*
                $($crate::component::Bindable::bind(&mut self.$link, registration)?;)*
                let _ = registration;
                Ok(())
            }

            fn next_wake(&self) -> $crate::types::SimTime {
                #[allow(unused_mut)]
                let mut wake = $crate::types::NO_EVENT;
                $(
                    wake = $crate::types::earlier(
                        wake,
                        $crate::component::WakeSource::earliest_event(&self.$wake),
                    );
                )*
                wake
            }

            fn tick(
                &mut self,
                ctx: &mut $crate::component::TickContext,
            ) -> $crate::error::SimResult<()> {
                let now = ctx.now();
                let _ = now;
                if ctx.is_startup() {
                    $({
                        let $sthis = &mut *self;
                        let $sctx = &mut *ctx;
                        let _ = (&$sthis, &$sctx);
                        $startup
                    })?
                } else if ctx.is_shutdown() {
                    $({
                        let $hthis = &mut *self;
                        let $hctx = &mut *ctx;
                        let _ = (&$hthis, &$hctx);
                        $shutdown
                    })?
                } else {
                    $({
                        let mut due = self.$mport.drain_at(now);
                        while let ::core::option::Option::Some($mmsg) =
                            ::core::iter::Iterator::next(&mut due)
                        {
                            let $mthis = &mut *self;
                            let $mctx = &mut *ctx;
                            let _ = (&$mthis, &$mctx, &$mmsg);
                            $mbody
                        }
                    })*
                    $({
                        let mut due = self.$tport.drain_at(now);
                        while let ::core::option::Option::Some($tmsg) =
                            ::core::iter::Iterator::next(&mut due)
                        {
                            let $tthis = &mut *self;
                            let $tctx = &mut *ctx;
                            let _ = (&$tthis, &$tctx, &$tmsg);
                            $tbody
                        }
                    })*
                }
                $(
                    ctx.note_wake($crate::component::WakeSource::earliest_event(&self.$wake));
                )*
                Ok(())
            }
        }
    };
}
