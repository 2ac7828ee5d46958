use zp_core::{Coord, ZONE_AREA};

/// Cost that makes a cell untraversable.
pub const IMPASSABLE: u8 = 255;

/// Sparse per-cell cost overlay for one zone.
///
/// A cell value of 0 means "unset": the reader falls back to the terrain
/// cost.  Any other value replaces it.
#[derive(Clone, PartialEq, Eq)]
pub struct CostMatrix {
    cells: Box<[u8; ZONE_AREA]>,
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl CostMatrix {
    pub fn new() -> Self {
        Self { cells: Box::new([0; ZONE_AREA]) }
    }

    #[inline]
    pub fn get(&self, at: Coord) -> u8 {
        self.cells[at.index()]
    }

    #[inline]
    pub fn set(&mut self, at: Coord, cost: u8) {
        self.cells[at.index()] = cost;
    }

    #[inline]
    pub fn is_set(&self, at: Coord) -> bool {
        self.get(at) != 0
    }

    /// Iterate over cells with an override, in index order.
    pub fn overrides(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cost)| **cost != 0)
            .map(|(index, cost)| (Coord::from_index(index), *cost))
    }
}

impl std::fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostMatrix")
            .field("overrides", &self.overrides().count())
            .finish()
    }
}
