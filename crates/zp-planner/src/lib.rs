//! `zp-planner` — from "move toward this target" to a queued [`Move`].
//!
//! Each call to [`PathPlanner::plan_move`] either reuses the agent's stored
//! path (consuming one step when the agent advanced as expected) or runs a
//! fresh search, then stores the remaining path as a [`MoveRecord`] and
//! queues the next step.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`path`]      | `DirectionPath`, `serialize_path`                         |
//! | [`record`]    | `SerializedMove`, `MoveRecord` (the persisted form)       |
//! | [`targets`]   | `ring_targets`: edge-aware target expansion               |
//! | [`smoothing`] | `fix_path`: pull detours back onto cheap corridors        |
//! | [`options`]   | `MoveOptions`, `Locate`                                   |
//! | [`visual`]    | `PathVisualizer`, `VisualStyle`, `Polyline`, `draw_path`  |
//! | [`planner`]   | `PathPlanner`, `PlanContext`, `PlanOutcome`               |
//! | [`error`]     | `PlanError`, `PlanResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `MoveRecord` and `VisualStyle`. |
//!
//! [`Move`]: zp_resolve::Move

pub mod error;
pub mod options;
pub mod path;
pub mod planner;
pub mod record;
pub mod smoothing;
pub mod targets;
pub mod visual;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use options::{Locate, MoveOptions};
pub use path::{DirectionPath, serialize_path};
pub use planner::{PathPlanner, PlanContext, PlanOutcome};
pub use record::{MoveRecord, SerializedMove};
pub use smoothing::fix_path;
pub use targets::ring_targets;
pub use visual::{PathVisualizer, Polyline, TARGET_LINE_COLOR, VisualStyle, draw_path};
