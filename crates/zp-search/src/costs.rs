//! Cost inputs of a search.

use std::sync::Arc;

use zp_core::{Coord, ZoneName};
use zp_matrix::{CostMatrix, IMPASSABLE, TerrainGrid};

/// Per-step cost of the two walkable terrain classes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementCosts {
    pub plain: u8,
    pub swamp: u8,
}

impl MovementCosts {
    /// Road-seeking movement: plains cost twice a road.
    pub const ON_ROADS: MovementCosts = MovementCosts { plain: 2, swamp: 10 };
    /// Movement that ignores or avoids roads.
    pub const OFF_ROADS: MovementCosts = MovementCosts { plain: 1, swamp: 5 };

    pub fn select(ignore_roads: bool, off_roads: bool) -> MovementCosts {
        if ignore_roads || off_roads { Self::OFF_ROADS } else { Self::ON_ROADS }
    }

    /// Cheapest walkable terrain step.
    #[inline]
    pub fn cheapest(&self) -> u8 {
        self.plain.min(self.swamp).max(1)
    }
}

impl Default for MovementCosts {
    fn default() -> Self {
        Self::ON_ROADS
    }
}

/// Everything a search needs to price steps inside one zone.
#[derive(Clone, Debug)]
pub struct ZoneCosts {
    pub terrain: Arc<TerrainGrid>,
    /// Cached or composed overlay; cells left at 0 fall back to terrain.
    pub overlay: Option<Arc<CostMatrix>>,
}

impl ZoneCosts {
    pub fn terrain_only(terrain: Arc<TerrainGrid>) -> Self {
        Self { terrain, overlay: None }
    }

    /// Step cost into `at` under `costs`: the overlay value when set,
    /// otherwise the terrain class priced by `costs` (walls stay 255).
    #[inline]
    pub fn step_cost(&self, at: Coord, costs: &MovementCosts) -> u8 {
        if let Some(cost) = self.override_at(at) {
            return cost;
        }
        if self.terrain.is_wall(at) {
            IMPASSABLE
        } else if self.terrain.is_swamp(at) {
            costs.swamp
        } else {
            costs.plain
        }
    }

    /// Overlay value when set, otherwise the terrain cost class (2/10/255).
    #[inline]
    pub fn cell_cost(&self, at: Coord) -> u8 {
        self.override_at(at).unwrap_or_else(|| self.terrain.cost(at))
    }

    #[inline]
    fn override_at(&self, at: Coord) -> Option<u8> {
        self.overlay
            .as_ref()
            .map(|m| m.get(at))
            .filter(|cost| *cost != 0)
    }
}

/// Supplies zone costs on demand.  Returning `None` marks the zone as
/// avoided: the search never enters it.
pub trait ZoneCostProvider {
    fn zone_costs(&mut self, zone: &ZoneName) -> Option<ZoneCosts>;
}

impl<F> ZoneCostProvider for F
where
    F: FnMut(&ZoneName) -> Option<ZoneCosts>,
{
    fn zone_costs(&mut self, zone: &ZoneName) -> Option<ZoneCosts> {
        self(zone)
    }
}
