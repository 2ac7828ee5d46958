//! Per-call planning options.

use zp_core::{Pos, ZoneName};
use zp_matrix::{CostOverlay, MatrixOptions};
use zp_search::{MovementCosts, SearchParams};
use zp_world::AgentInfo;

use crate::visual::VisualStyle;

/// Anything that can name a target position.
pub trait Locate {
    fn locate(&self) -> Option<Pos>;
}

impl Locate for Pos {
    fn locate(&self) -> Option<Pos> {
        Some(self.clone())
    }
}

impl Locate for Option<Pos> {
    fn locate(&self) -> Option<Pos> {
        self.clone()
    }
}

impl Locate for AgentInfo {
    fn locate(&self) -> Option<Pos> {
        Some(self.pos.clone())
    }
}

impl<T: Locate + ?Sized> Locate for &T {
    fn locate(&self) -> Option<Pos> {
        (**self).locate()
    }
}

/// Options recognized by [`crate::PathPlanner::plan_move`].
#[derive(Clone)]
pub struct MoveOptions<'a> {
    /// Acceptable distance to the target.  Default 1.
    pub range:             u8,
    /// Queue priority; higher resolves first.  Default 0.
    pub priority:          i32,
    pub ignore_roads:      bool,
    pub off_roads:         bool,
    pub ignore_structures: bool,
    pub ignore_tunnels:    bool,
    pub ignore_containers: bool,
    /// Override the plain / swamp / container costs of the preset.
    pub plain_cost:        Option<u8>,
    pub swamp_cost:        Option<u8>,
    pub container_cost:    Option<u8>,
    /// Keep ring targets off the zone's outer cells.  Default true.
    pub move_off_exit:     bool,
    /// Smooth fresh paths onto cost-1 corridors.  Default true.
    pub fix_path:          bool,
    /// Default 1.0 for off-road movement, 1.2 otherwise.
    pub heuristic_weight:  Option<f32>,
    pub max_ops:           u32,
    /// Zones to avoid in addition to the configured ones.
    pub avoid_zones:       &'a [ZoneName],
    /// Runs on every zone's matrix before the search reads it.
    pub cost_overlay:      Option<&'a dyn CostOverlay>,
    /// Called when the agent is found on the edge of a zone it just entered.
    pub on_zone_enter:     Option<&'a dyn Fn(&AgentInfo, &ZoneName)>,
    /// Draw the remaining path through the host's visualizer.
    pub visualize:         Option<VisualStyle>,
}

impl Default for MoveOptions<'_> {
    fn default() -> Self {
        Self {
            range:             1,
            priority:          0,
            ignore_roads:      false,
            off_roads:         false,
            ignore_structures: false,
            ignore_tunnels:    false,
            ignore_containers: false,
            plain_cost:        None,
            swamp_cost:        None,
            container_cost:    None,
            move_off_exit:     true,
            fix_path:          true,
            heuristic_weight:  None,
            max_ops:           2000,
            avoid_zones:       &[],
            cost_overlay:      None,
            on_zone_enter:     None,
            visualize:         None,
        }
    }
}

impl<'a> MoveOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: u8) -> Self {
        self.range = range;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn avoiding(mut self, zones: &'a [ZoneName]) -> Self {
        self.avoid_zones = zones;
        self
    }

    pub fn overlay(mut self, overlay: &'a dyn CostOverlay) -> Self {
        self.cost_overlay = Some(overlay);
        self
    }

    pub fn visualized(mut self, style: VisualStyle) -> Self {
        self.visualize = Some(style);
        self
    }

    /// Preset plain/swamp costs with any overrides applied.
    pub fn movement_costs(&self) -> MovementCosts {
        let preset = MovementCosts::select(self.ignore_roads, self.off_roads);
        MovementCosts {
            plain: self.plain_cost.unwrap_or(preset.plain),
            swamp: self.swamp_cost.unwrap_or(preset.swamp),
        }
    }

    pub fn weight(&self) -> f32 {
        self.heuristic_weight
            .unwrap_or(if self.off_roads { 1.0 } else { 1.2 })
    }

    pub fn matrix_options(&self) -> MatrixOptions {
        let costs = self.movement_costs();
        MatrixOptions {
            ignore_structures: self.ignore_structures,
            ignore_tunnels:    self.ignore_tunnels,
            ignore_containers: self.ignore_containers,
            ignore_roads:      self.ignore_roads,
            off_roads:         self.off_roads,
            plain_cost:        costs.plain,
            swamp_cost:        costs.swamp,
            container_cost:    self.container_cost.unwrap_or(5),
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            costs:            self.movement_costs(),
            heuristic_weight: self.weight(),
            max_ops:          self.max_ops,
        }
    }

    /// Whether fresh paths get smoothed.
    pub fn smooths(&self) -> bool {
        self.fix_path && self.weight() > 1.0 && !self.ignore_roads && !self.off_roads
    }
}
