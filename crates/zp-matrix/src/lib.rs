//! `zp-matrix` — traversal costs for one zone at a time.
//!
//! Two caches live here.  [`TerrainCache`] holds the immutable per-zone
//! terrain classes (plain / swamp / wall).  [`CostMatrixCache`] holds the
//! dynamic overlays built from structures and construction sites, one per
//! [`LayerKey`], and rebuilds them wholesale once they age past the TTL.
//! Per-request overlays (hostile avoidance, stationed workers, caller
//! callbacks) are never cached; they are stacked onto a copy with
//! [`OverlayStack`].
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`terrain`] | `TerrainGrid`, `TerrainCache`, terrain cost constants     |
//! | [`matrix`]  | `CostMatrix`, the sparse 50×50 overlay                    |
//! | [`layer`]   | `MatrixOptions`, `LayerKey` and its layer enums           |
//! | [`cache`]   | `CostMatrixCache` and the structure-overlay builder       |
//! | [`overlay`] | `CostOverlay`, `MarkedCells`, `OverlayStack`              |
//! | [`error`]   | `MatrixError`, `MatrixResult<T>`                          |

pub mod cache;
pub mod error;
pub mod layer;
pub mod matrix;
pub mod overlay;
pub mod terrain;


pub use cache::{CostMatrixCache, build_structure_matrix};
pub use error::{MatrixError, MatrixResult};
pub use layer::{ContainerLayer, LayerKey, MatrixOptions, RoadLayer};
pub use matrix::{CostMatrix, IMPASSABLE};
pub use overlay::{CostOverlay, MarkedCells, OverlayStack};
pub use terrain::{COST_PLAIN, COST_SWAMP, COST_WALL, TerrainCache, TerrainGrid};
