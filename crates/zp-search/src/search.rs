//! The search contract.

use zp_core::Pos;

use crate::costs::{MovementCosts, ZoneCostProvider};
use crate::SearchError;

/// One acceptable destination: any cell within `range` of `pos`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTarget {
    pub pos:   Pos,
    pub range: u8,
}

impl SearchTarget {
    pub fn new(pos: Pos, range: u8) -> Self {
        Self { pos, range }
    }

    /// `true` when standing on `at` satisfies this target.
    pub fn reached_by(&self, at: &Pos) -> bool {
        at.range_to(&self.pos).is_some_and(|r| r <= self.range)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchParams {
    pub costs:            MovementCosts,
    /// Multiplier on the heuristic; above 1 trades optimality for speed.
    pub heuristic_weight: f32,
    /// Node expansions allowed before giving up with a partial path.
    pub max_ops:          u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            costs:            MovementCosts::ON_ROADS,
            heuristic_weight: 1.2,
            max_ops:          2000,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Positions to step through, excluding the start.
    pub path:       Vec<Pos>,
    /// No target was reached; `path` leads to the closest node found.
    pub incomplete: bool,
    /// Nodes expanded.
    pub ops:        u32,
}

/// Pluggable grid search.
///
/// Implementations must accept several targets at once, each with its own
/// range, and must never step on a cell priced 255 or enter a zone for which
/// the provider returns `None`.
pub trait PathSearch {
    fn search(
        &self,
        start: &Pos,
        targets: &[SearchTarget],
        params: &SearchParams,
        provider: &mut dyn ZoneCostProvider,
    ) -> Result<SearchOutcome, SearchError>;
}
