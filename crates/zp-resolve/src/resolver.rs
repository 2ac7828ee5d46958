//! Same-tick conflict resolution for one zone.
//!
//! # Cell choice
//!
//! Rerouted movers and pushed agents pick the cheapest of their up to eight
//! neighbours.  A neighbour costs its overlay-or-terrain value, or 255 when
//! it is a wall or blocking structure, is already the destination of a
//! queued move, or holds a foreign or fatigued agent.  Reroutes add
//! `path_end_weight` per cell of distance to the path end; pushes add the
//! range penalty when the cell leaves the pushed agent's working range and
//! the exit penalty on zone edges.  The first cheapest neighbour in
//! row-major order wins; when every neighbour costs 255 there is no choice
//! and the original direction stands.

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use zp_core::{AgentId, Coord, Direction, PathingConfig, ZoneName};
use zp_matrix::{CostMatrixCache, IMPASSABLE, MatrixOptions, TerrainCache};
use zp_search::ZoneCosts;
use zp_world::{AgentClass, AgentInfo, MoveSink, WorkingTarget, WorkingTargets, World};

use crate::{Move, MoveQueue};

/// Counters for one zone pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub committed:   usize,
    pub pushed:      usize,
    pub swapped:     usize,
    pub rerouted:    usize,
    /// Foreign-blocked moves with no free neighbour.
    pub unroutable:  usize,
    pub invalidated: usize,
}

impl ResolveReport {
    pub fn absorb(&mut self, other: &ResolveReport) {
        self.committed += other.committed;
        self.pushed += other.pushed;
        self.swapped += other.swapped;
        self.rerouted += other.rerouted;
        self.unroutable += other.unroutable;
        self.invalidated += other.invalidated;
    }
}

/// Extra terms of the neighbour cost.
#[derive(Clone, Copy)]
enum Bias<'a> {
    PathEnd(Option<Coord>),
    Push(Option<&'a WorkingTarget>),
}

/// Resolves queued moves against the world's occupancy.
pub struct MoveResolver<'a, W: World + ?Sized> {
    world:    &'a W,
    config:   &'a PathingConfig,
    working:  Option<&'a dyn WorkingTargets>,
    terrain:  &'a mut TerrainCache,
    matrices: &'a mut CostMatrixCache,
    /// Costs of the zone being resolved, loaded on first use.
    costs:    Option<ZoneCosts>,
}

impl<'a, W: World + ?Sized> MoveResolver<'a, W> {
    pub fn new(
        world:    &'a W,
        config:   &'a PathingConfig,
        terrain:  &'a mut TerrainCache,
        matrices: &'a mut CostMatrixCache,
    ) -> Self {
        Self { world, config, working: None, terrain, matrices, costs: None }
    }

    pub fn with_working_targets(mut self, working: &'a dyn WorkingTargets) -> Self {
        self.working = Some(working);
        self
    }

    /// Resolve and commit every move queued for `zone`.
    ///
    /// Each move, including the ones inserted on the way, produces exactly
    /// one `commit_direction` call on `sink`.
    pub fn resolve_zone(
        &mut self,
        zone: &ZoneName,
        queue: &mut MoveQueue,
        has_move: &mut FxHashSet<AgentId>,
        sink: &mut dyn MoveSink,
    ) -> ResolveReport {
        self.costs = None;
        let mut report = ResolveReport::default();

        let mut i = 0;
        while let Some(mv) = queue.get(i).cloned() {
            let direction = if mv.blocked || mv.pushed {
                self.resolve_one(zone, i, &mv, queue, has_move, &mut report)
            } else {
                mv.direction
            };
            sink.commit_direction(mv.agent, direction);
            report.committed += 1;
            i += 1;
        }

        debug!(
            zone = %zone,
            committed = report.committed,
            pushed = report.pushed,
            swapped = report.swapped,
            rerouted = report.rerouted,
            "zone resolved"
        );
        report
    }

    /// Handle a blocked or pushed move and return the direction to commit.
    fn resolve_one(
        &mut self,
        zone: &ZoneName,
        index: usize,
        mv: &Move,
        queue: &mut MoveQueue,
        has_move: &mut FxHashSet<AgentId>,
        report: &mut ResolveReport,
    ) -> Direction {
        let Some(dest) = mv.destination() else { return mv.direction };
        if let Some(slot) = queue.get_mut(index) {
            slot.dest = Some(dest);
        }

        let Some(obstacle) = self.obstacle_at(zone, dest) else {
            if mv.blocked {
                self.matrices.invalidate(zone);
                self.costs = None;
                report.invalidated += 1;
            }
            return mv.direction;
        };

        if !obstacle.controlled {
            let Some(cell) = self.best_cell(zone, mv.from, queue, Bias::PathEnd(mv.path_end)) else {
                trace!(zone = %zone, agent = %mv.agent, "no free cell to reroute to");
                report.unroutable += 1;
                return mv.direction;
            };
            let Some(direction) = Direction::between(mv.from, cell) else { return mv.direction };
            if let Some(slot) = queue.get_mut(index) {
                slot.dest = Some(cell);
                slot.direction = direction;
            }
            trace!(zone = %zone, agent = %mv.agent, to = %cell, "rerouted around foreign agent");
            report.rerouted += 1;
            return direction;
        }

        if obstacle.is_fatigued() || has_move.contains(&obstacle.id) {
            return mv.direction;
        }

        let work = self
            .working
            .and_then(|w| w.working_target(&obstacle))
            .filter(|t| t.pos.zone == obstacle.pos.zone);

        let from = obstacle.pos.coord;
        let (to, direction) = if work.is_some() || mv.pushed {
            let Some(cell) = self.best_cell(zone, from, queue, Bias::Push(work.as_ref())) else {
                trace!(zone = %zone, agent = %obstacle.id, "nowhere to push");
                return mv.direction;
            };
            let Some(direction) = Direction::between(from, cell) else { return mv.direction };
            report.pushed += 1;
            (cell, direction)
        } else {
            report.swapped += 1;
            (mv.from, mv.direction.reverse())
        };

        trace!(zone = %zone, agent = %obstacle.id, by = %mv.agent, to = %to, "displacing own agent");
        has_move.insert(obstacle.id);
        queue.insert_after(index, Move::pushed(obstacle.id, from, to, direction, mv.priority));
        mv.direction
    }

    /// The agent standing on `at`, preferring own regular agents, then own
    /// elevated ones, then any regular, then anyone.
    fn obstacle_at(&self, zone: &ZoneName, at: Coord) -> Option<AgentInfo> {
        let occupants = self.world.occupants_at(zone, at);
        let pick = |controlled: Option<bool>, class: AgentClass| {
            occupants
                .iter()
                .find(|a| a.class == class && controlled.is_none_or(|c| a.controlled == c))
        };
        pick(Some(true), AgentClass::Regular)
            .or_else(|| pick(Some(true), AgentClass::Elevated))
            .or_else(|| pick(None, AgentClass::Regular))
            .or_else(|| occupants.first())
            .cloned()
    }

    /// Cheapest neighbour of `from`, or `None` when all cost 255.
    fn best_cell(&mut self, zone: &ZoneName, from: Coord, queue: &MoveQueue, bias: Bias<'_>) -> Option<Coord> {
        let costs = self.zone_costs(zone)?;
        let mut best: Option<(u32, Coord)> = None;
        for cell in from.adjacent() {
            let base = costs.cell_cost(cell);
            if base == IMPASSABLE || queue.claims(cell) || self.holds_obstacle(zone, cell) {
                continue;
            }
            let mut cost = u32::from(base);
            match bias {
                Bias::PathEnd(Some(end)) => {
                    cost += u32::from(cell.range_to(end)) * u32::from(self.config.path_end_weight);
                }
                Bias::PathEnd(None) => {}
                Bias::Push(work) => {
                    if let Some(work) = work {
                        let range = cell.range_to(work.pos.coord);
                        if range > work.range {
                            cost += u32::from(range) + u32::from(self.config.push_range_penalty);
                        }
                    }
                    if cell.is_exit() {
                        cost += u32::from(self.config.push_exit_penalty);
                    }
                }
            }
            if best.is_none_or(|(lowest, _)| cost < lowest) {
                best = Some((cost, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }

    /// Foreign agents and own fatigued agents cannot be displaced.
    fn holds_obstacle(&self, zone: &ZoneName, at: Coord) -> bool {
        self.world
            .occupants_at(zone, at)
            .iter()
            .any(|a| !a.controlled || a.is_fatigued())
    }

    fn zone_costs(&mut self, zone: &ZoneName) -> Option<ZoneCosts> {
        if self.costs.is_none() {
            let terrain = match self.terrain.get(zone, self.world) {
                Ok(grid) => grid,
                Err(err) => {
                    warn!(zone = %zone, error = %err, "no terrain for resolution");
                    return None;
                }
            };
            let overlay = self
                .matrices
                .get(zone, &MatrixOptions::default(), self.world, self.terrain)
                .unwrap_or_else(|err| {
                    warn!(zone = %zone, error = %err, "cost matrix unavailable");
                    None
                });
            self.costs = Some(ZoneCosts { terrain, overlay });
        }
        self.costs.clone()
    }
}
