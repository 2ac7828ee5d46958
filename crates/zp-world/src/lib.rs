//! `zp-world` — everything the movement core needs from the host world.
//!
//! The core never owns terrain, agents or structures.  It reads them through
//! the [`World`] trait, writes movement through [`MoveSink`], and calls back
//! into the host through the hooks in [`hooks`].
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`world`]  | `TerrainSource`, `World`, `MoveSink`, agent/structure views |
//! | [`hooks`]  | `WorkingTarget`, `WorkingTargets`, `ZoneEnterHook`          |
//! | [`memory`] | `MemoryWorld` — in-memory reference world with engine rules |
//! | [`loader`] | CSV layout loader feeding a `MemoryWorld`                   |
//! | [`error`]  | `WorldError`, `WorldResult<T>`                              |

pub mod error;
pub mod hooks;
pub mod loader;
pub mod memory;
pub mod world;


pub use error::{WorldError, WorldResult};
pub use hooks::{WorkingTarget, WorkingTargets, ZoneEnterHook};
pub use loader::{load_layout_csv, load_layout_reader};
pub use memory::MemoryWorld;
pub use world::{
    AgentClass, AgentInfo, ConstructionSite, MoveCommand, MoveSink, RawTerrain, Structure,
    StructureKind, TERRAIN_MASK_SWAMP, TERRAIN_MASK_WALL, TerrainSource, World,
};
