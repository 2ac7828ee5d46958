//! `zp-core` — foundational types for the `zonepath` movement workspace.
//!
//! Every other `zp-*` crate depends on this one.  It has no `zp-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `AgentId`                                                 |
//! | [`geo`]    | `ZoneName`, `Coord`, `Pos`, `Direction`, `Adjacent`       |
//! | [`time`]   | `Tick`                                                    |
//! | [`config`] | `PathingConfig` — every tunable constant in one place     |
//! | [`error`]  | `ZpError`, `ZpResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PathingConfig;
pub use error::{ZpError, ZpResult};
pub use geo::{Adjacent, Coord, Direction, Pos, ZONE_AREA, ZONE_MAX, ZONE_SIZE, ZoneName};
pub use ids::AgentId;
pub use time::Tick;
