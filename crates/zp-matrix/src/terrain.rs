//! Static terrain costs.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use zp_core::{Coord, ZoneName};
use zp_world::{RawTerrain, TERRAIN_MASK_SWAMP, TERRAIN_MASK_WALL, TerrainSource};

use crate::{MatrixError, MatrixResult};

pub const COST_PLAIN: u8 = 2;
pub const COST_SWAMP: u8 = 10;
pub const COST_WALL: u8 = 255;

// ── TerrainGrid ───────────────────────────────────────────────────────────────

/// Immutable raw terrain of one zone.
///
/// Coordinates are always in range because [`Coord`] cannot be built outside
/// the 50×50 grid.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    raw: RawTerrain,
}

impl TerrainGrid {
    pub fn from_raw(raw: RawTerrain) -> Self {
        Self { raw }
    }

    /// The raw bitmask at `at`.
    #[inline]
    pub fn raw(&self, at: Coord) -> u8 {
        self.raw[at.index()]
    }

    #[inline]
    pub fn is_wall(&self, at: Coord) -> bool {
        self.raw(at) & TERRAIN_MASK_WALL != 0
    }

    #[inline]
    pub fn is_swamp(&self, at: Coord) -> bool {
        self.raw(at) & TERRAIN_MASK_SWAMP != 0
    }

    /// Cost class of the cell: 2 plain, 10 swamp, 255 wall (with or without
    /// swamp).
    #[inline]
    pub fn cost(&self, at: Coord) -> u8 {
        if self.is_wall(at) {
            COST_WALL
        } else if self.is_swamp(at) {
            COST_SWAMP
        } else {
            COST_PLAIN
        }
    }
}

// ── TerrainCache ──────────────────────────────────────────────────────────────

/// Bounded cache of terrain grids, cleared wholesale when a new zone would
/// exceed `capacity`.
pub struct TerrainCache {
    capacity: usize,
    grids:    FxHashMap<ZoneName, Arc<TerrainGrid>>,
}

impl TerrainCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), grids: FxHashMap::default() }
    }

    /// Return the grid for `zone`, building it from `source` on first use.
    pub fn get<T>(&mut self, zone: &ZoneName, source: &T) -> MatrixResult<Arc<TerrainGrid>>
    where
        T: TerrainSource + ?Sized,
    {
        if let Some(grid) = self.grids.get(zone) {
            return Ok(Arc::clone(grid));
        }
        let raw = source
            .raw_terrain(zone)
            .ok_or_else(|| MatrixError::TerrainUnavailable(zone.clone()))?;
        if self.grids.len() >= self.capacity {
            debug!(zones = self.grids.len(), "terrain cache full, clearing");
            self.grids.clear();
        }
        let grid = Arc::new(TerrainGrid::from_raw(raw));
        self.grids.insert(zone.clone(), Arc::clone(&grid));
        Ok(grid)
    }

    pub fn contains(&self, zone: &ZoneName) -> bool {
        self.grids.contains_key(zone)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
