//! Per-request cost overlays.
//!
//! Overlays are applied in registration order onto a private copy of the
//! cached matrix (or a blank one), so nothing they write leaks back into the
//! cache.

use zp_core::{Coord, ZoneName};
use zp_world::{WorkingTargets, World};

use crate::matrix::{CostMatrix, IMPASSABLE};

// ── CostOverlay ───────────────────────────────────────────────────────────────

/// Something that adjusts a zone's matrix before a search reads it.
pub trait CostOverlay {
    fn apply(&self, zone: &ZoneName, matrix: &mut CostMatrix);
}

impl<F> CostOverlay for F
where
    F: Fn(&ZoneName, &mut CostMatrix),
{
    fn apply(&self, zone: &ZoneName, matrix: &mut CostMatrix) {
        self(zone, matrix)
    }
}

// ── MarkedCells ───────────────────────────────────────────────────────────────

/// Fixed costs written onto a set of cells of a single zone.  Other zones
/// are left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkedCells {
    zone:  ZoneName,
    cells: Vec<(Coord, u8)>,
}

impl MarkedCells {
    pub fn new(zone: ZoneName) -> Self {
        Self { zone, cells: Vec::new() }
    }

    pub fn mark(&mut self, at: Coord, cost: u8) {
        self.cells.push((at, cost));
    }

    /// Every foreign agent within `radius` of `center` becomes impassable.
    pub fn hostiles<W>(world: &W, zone: &ZoneName, center: Coord, radius: u8) -> Self
    where
        W: World + ?Sized,
    {
        let mut marked = Self::new(zone.clone());
        for agent in world.agents_in_range(zone, center, radius) {
            if !agent.controlled {
                marked.mark(agent.pos.coord, IMPASSABLE);
            }
        }
        marked
    }

    /// Controlled agents standing inside their working range get `cost`, so
    /// movers detour around them instead of stopping.
    ///
    /// A worker whose assignment carries a priority gate is only marked for
    /// movers whose priority does not exceed it.
    pub fn working_agents<W, P>(
        world: &W,
        working: &P,
        zone: &ZoneName,
        priority: i32,
        cost: u8,
    ) -> Self
    where
        W: World + ?Sized,
        P: WorkingTargets + ?Sized,
    {
        let mut marked = Self::new(zone.clone());
        for agent in world.controlled_agents(zone) {
            let Some(target) = working.working_target(&agent) else { continue };
            if target.holds(&agent.pos) && target.admits(priority) {
                marked.mark(agent.pos.coord, cost);
            }
        }
        marked
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CostOverlay for MarkedCells {
    fn apply(&self, zone: &ZoneName, matrix: &mut CostMatrix) {
        if zone != &self.zone {
            return;
        }
        for &(at, cost) in &self.cells {
            matrix.set(at, cost);
        }
    }
}

// ── OverlayStack ──────────────────────────────────────────────────────────────

/// Ordered list of overlays for one request.
#[derive(Default)]
pub struct OverlayStack<'a> {
    layers: Vec<&'a dyn CostOverlay>,
}

impl<'a> OverlayStack<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push(&mut self, overlay: &'a dyn CostOverlay) -> &mut Self {
        self.layers.push(overlay);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Apply every overlay to a copy of `base` (or a blank matrix).
    ///
    /// Returns `None` when the stack is empty; the caller keeps using `base`
    /// as is.
    pub fn compose(&self, zone: &ZoneName, base: Option<&CostMatrix>) -> Option<CostMatrix> {
        if self.layers.is_empty() {
            return None;
        }
        let mut matrix = base.cloned().unwrap_or_default();
        for layer in &self.layers {
            layer.apply(zone, &mut matrix);
        }
        Some(matrix)
    }
}
