//! `zp-resolve` — turning a tick's move intents into conflict-free commits.
//!
//! Planning fills one [`MoveQueue`] per zone (held together in
//! [`ZoneQueues`]).  Once per zone per tick a [`MoveResolver`] walks the
//! queue front to back, commits every move exactly once, and resolves
//! blocked moves on the way:
//!
//! | Obstacle on the destination            | Action                               |
//! |----------------------------------------|--------------------------------------|
//! | nothing                                | invalidate the zone's cost matrices  |
//! | foreign agent                          | reroute to the cheapest free neighbour |
//! | own idle agent with a work assignment  | push it to its best nearby cell      |
//! | own idle agent otherwise               | swap places with it                  |
//! | own fatigued or already-moving agent   | commit unchanged                     |
//!
//! Pushed and swapped agents get a synthetic move inserted right behind the
//! trigger, so push chains resolve depth-first.

pub mod moves;
pub mod queue;
pub mod resolver;


pub use moves::Move;
pub use queue::{MoveQueue, ZoneQueues};
pub use resolver::{MoveResolver, ResolveReport};
