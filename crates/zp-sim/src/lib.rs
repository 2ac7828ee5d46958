//! `zp-sim` — the host-facing facade of the zonepath workspace.
//!
//! # Tick protocol
//!
//! ```text
//! for each tick:
//!   ① Plan     — Pathing::plan_move for every agent that wants to move;
//!                each call queues at most one Move in its zone.
//!   ② Resolve  — Pathing::run_resolution_for_all_zones drains every zone's
//!                queue (name order) through MoveResolver, committing one
//!                direction per Move, then runs end_tick.
//!   ③ End      — queues and per-tick planner state are cleared, the matrix
//!                cache is dropped if it outgrew its capacity, and the
//!                observer receives the tick's PathingStats.
//! ```
//!
//! Hosts that resolve zone by zone call `run_resolution_for_zone` (a second
//! call for the same zone in a tick is a no-op) and `end_tick` themselves.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use zp_planner::MoveOptions;
//! use zp_search::ZoneAStar;
//! use zp_sim::{NoopObserver, PathingBuilder};
//!
//! let mut pathing = PathingBuilder::new(ZoneAStar).config(config).build()?;
//! pathing.plan_move(&world, &agent, &mut record, &target, &MoveOptions::new())?;
//! let mut commands = Vec::new();
//! pathing.run_resolution_for_all_zones(&world, &mut commands, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pathing;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::PathingBuilder;
pub use error::{PathingError, PathingResult};
pub use observer::{NoopObserver, PathingObserver};
pub use pathing::Pathing;
pub use stats::PathingStats;
