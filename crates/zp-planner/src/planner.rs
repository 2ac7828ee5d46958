//! `PathPlanner` — decides between reusing a stored path and searching.
//!
//! # Per-call flow
//!
//! 1. A fatigued agent plans nothing (its stored path may still be drawn).
//! 2. With a stored record for the same target, the agent is expected on
//!    `last + first step`.  If it is there, that step is consumed; an
//!    exhausted path triggers a fresh search.  An empty stored path with the
//!    agent unmoved is `NoPath` again, unless the requested range differs
//!    from the one last searched with.
//! 3. If it is elsewhere, a fresh search is needed, and:
//!    * standing still in front of a foreign agent enables hostile
//!      avoidance for the search;
//!    * standing still in front of anything else flags the move blocked;
//!    * having moved onto a zone edge means a zone was entered: the
//!      zone-enter hooks run and the move is flagged blocked.
//! 4. The record is rewritten with the agent's position and the remaining
//!    path, and the first step is queued.  An empty path is `NoPath`.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use zp_core::{AgentId, Coord, PathingConfig, Pos, ZoneName};
use zp_matrix::{CostMatrixCache, MarkedCells, MatrixOptions, OverlayStack, TerrainCache};
use zp_resolve::{Move, ZoneQueues};
use zp_search::{PathSearch, SearchTarget, ZoneCostProvider, ZoneCosts};
use zp_world::{AgentInfo, WorkingTargets, World, ZoneEnterHook};

use crate::options::{Locate, MoveOptions};
use crate::path::{DirectionPath, serialize_path};
use crate::record::{MoveRecord, SerializedMove};
use crate::smoothing::fix_path;
use crate::targets::ring_targets;
use crate::visual::{PathVisualizer, draw_path};
use crate::{PlanError, PlanResult};

/// Successful result of [`PathPlanner::plan_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    /// A move was queued.
    Queued,
    /// A move was queued but flagged blocked (obstructed, or the agent just
    /// entered a zone); it is resolved conservatively this tick.
    Blocked,
    /// The agent is fatigued and cannot act this tick.
    Resting,
}

/// Shared state a planning call reads and writes.
pub struct PlanContext<'a, W: World + ?Sized> {
    pub world:      &'a W,
    pub config:     &'a PathingConfig,
    pub terrain:    &'a mut TerrainCache,
    pub matrices:   &'a mut CostMatrixCache,
    pub queues:     &'a mut ZoneQueues,
    pub working:    Option<&'a dyn WorkingTargets>,
    pub zone_hooks: &'a mut [Box<dyn ZoneEnterHook>],
    pub visualizer: Option<&'a mut dyn PathVisualizer>,
}

/// Path planner over a pluggable [`PathSearch`].
pub struct PathPlanner<S: PathSearch> {
    search: S,
    /// Outcomes already issued this tick, by agent.
    issued: FxHashMap<AgentId, PlanOutcome>,
    /// Searches run this tick.
    recomputed: usize,
    /// Range of each agent's most recent search, kept across ticks.
    searched_range: FxHashMap<AgentId, u8>,
}

impl<S: PathSearch> PathPlanner<S> {
    pub fn new(search: S) -> Self {
        Self {
            search,
            issued: FxHashMap::default(),
            recomputed: 0,
            searched_range: FxHashMap::default(),
        }
    }

    /// Searches run since the last [`end_tick`](Self::end_tick).
    pub fn recomputed(&self) -> usize {
        self.recomputed
    }

    /// Forget this tick's outcomes.
    pub fn end_tick(&mut self) {
        self.issued.clear();
        self.recomputed = 0;
    }

    /// Plan one step of `agent` toward `target` and queue it.
    ///
    /// `record` is the agent's persisted move state; it is read, and
    /// rewritten whenever the agent is not fatigued.  A second call for an
    /// agent already planned this tick returns the first outcome and touches
    /// nothing.
    pub fn plan_move<W, L>(
        &mut self,
        ctx: &mut PlanContext<'_, W>,
        agent: &AgentInfo,
        record: &mut Option<MoveRecord>,
        target: &L,
        options: &MoveOptions<'_>,
    ) -> PlanResult<PlanOutcome>
    where
        W: World + ?Sized,
        L: Locate + ?Sized,
    {
        let target = target.locate().ok_or(PlanError::InvalidTarget)?;
        if let Some(&outcome) = self.issued.get(&agent.id) {
            return Ok(outcome);
        }

        let stored = record.as_ref().and_then(|r| match SerializedMove::from_record(r) {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!(agent = %agent.id, error = %err, "discarding move record");
                None
            }
        });

        if agent.is_fatigued() {
            if let Some(stored) = &stored {
                let mut path = stored.path.clone();
                path.advance();
                self.visualize(ctx, agent, &path, &target, options);
            }
            return Ok(PlanOutcome::Resting);
        }

        let here = agent.pos.coord;
        let mut fresh = false;
        let mut blocked = false;
        let mut avoid_hostiles = false;
        let mut path = DirectionPath::new();

        match stored.filter(|s| s.target == target) {
            None => fresh = true,
            Some(stored) => {
                path = stored.path;
                let next = path.first().and_then(|d| stored.last.offset(d));
                if next == Some(here) {
                    path.advance();
                    fresh = path.is_empty();
                } else if path.is_empty()
                    && here == stored.last
                    && self.searched_range.get(&agent.id) == Some(&options.range)
                {
                    trace!(agent = %agent.id, target = %target, "target still unreachable");
                    return Err(PlanError::NoPath { target });
                } else {
                    fresh = true;
                    if here == stored.last {
                        match next {
                            Some(cell) if self.foreign_at(ctx.world, &agent.pos.zone, cell) => {
                                avoid_hostiles = true;
                            }
                            _ => blocked = true,
                        }
                    } else if here.is_exit() {
                        self.entered_zone(ctx, agent, options);
                        blocked = true;
                    }
                }
            }
        }

        let path_end = if fresh {
            let found = self.find_path(ctx, agent, &target, options, blocked, avoid_hostiles)?;
            self.recomputed += 1;
            self.searched_range.insert(agent.id, options.range);
            let (directions, end) = serialize_path(&agent.pos, &found);
            debug!(
                agent = %agent.id,
                target = %target,
                steps = directions.len(),
                avoid_hostiles,
                "path recomputed"
            );
            path = directions;
            end.coord
        } else {
            path.end_from(here)
        };

        *record = Some(
            SerializedMove { target: target.clone(), last: here, path: path.clone() }.to_record(),
        );

        let Some(direction) = path.first() else {
            return Err(PlanError::NoPath { target });
        };

        let mut mv = Move::new(agent.id, here, direction, options.priority);
        mv.blocked = blocked;
        mv.path_end = Some(path_end);
        if !ctx.queues.enqueue(&agent.pos.zone, mv) {
            debug!(agent = %agent.id, "agent already moves this tick");
        }

        let outcome = if blocked { PlanOutcome::Blocked } else { PlanOutcome::Queued };
        self.issued.insert(agent.id, outcome);
        self.visualize(ctx, agent, &path, &target, options);
        Ok(outcome)
    }

    fn foreign_at<W: World + ?Sized>(&self, world: &W, zone: &ZoneName, at: Coord) -> bool {
        world.occupants_at(zone, at).iter().any(|a| !a.controlled)
    }

    fn entered_zone<W: World + ?Sized>(
        &self,
        ctx: &mut PlanContext<'_, W>,
        agent: &AgentInfo,
        options: &MoveOptions<'_>,
    ) {
        let zone = &agent.pos.zone;
        debug!(agent = %agent.id, zone = %zone, "zone entered");
        if let Some(hook) = options.on_zone_enter {
            hook(agent, zone);
        }
        for hook in ctx.zone_hooks.iter_mut() {
            hook.on_zone_enter(agent, zone);
        }
    }

    fn visualize<W: World + ?Sized>(
        &self,
        ctx: &mut PlanContext<'_, W>,
        agent: &AgentInfo,
        path: &DirectionPath,
        target: &Pos,
        options: &MoveOptions<'_>,
    ) {
        if let (Some(style), Some(visualizer)) = (&options.visualize, ctx.visualizer.as_deref_mut()) {
            draw_path(visualizer, &agent.pos, path, target, options.range, style);
        }
    }

    /// Run a search from the agent's position and post-process the result.
    fn find_path<W: World + ?Sized>(
        &self,
        ctx: &mut PlanContext<'_, W>,
        agent: &AgentInfo,
        target: &Pos,
        options: &MoveOptions<'_>,
        blocked: bool,
        avoid_hostiles: bool,
    ) -> PlanResult<Vec<Pos>> {
        let start = &agent.pos;
        ctx.terrain.get(&start.zone, ctx.world)?;

        let mut internal: Vec<MarkedCells> = Vec::new();
        if let Some(working) = ctx.working {
            let approaching = start.range_to(target) == Some(options.range.saturating_add(1));
            if !blocked && approaching {
                internal.push(MarkedCells::working_agents(
                    ctx.world,
                    working,
                    &start.zone,
                    options.priority,
                    ctx.config.working_agent_cost,
                ));
            }
        }
        if avoid_hostiles {
            internal.push(MarkedCells::hostiles(
                ctx.world,
                &start.zone,
                start.coord,
                ctx.config.hostile_avoid_radius,
            ));
        }

        let mut overlays = OverlayStack::new();
        if let Some(caller) = options.cost_overlay {
            overlays.push(caller);
        }
        for marked in &internal {
            overlays.push(marked);
        }

        let avoid: FxHashSet<ZoneName> = options
            .avoid_zones
            .iter()
            .chain(ctx.config.avoid_zones.iter())
            .cloned()
            .collect();

        let mut provider = PlannerCosts {
            world:    ctx.world,
            terrain:  &mut *ctx.terrain,
            matrices: &mut *ctx.matrices,
            options:  options.matrix_options(),
            avoid:    &avoid,
            overlays: &overlays,
            memo:     FxHashMap::default(),
        };

        let mut append_target = false;
        let targets = if options.range == 0 {
            append_target = true;
            vec![SearchTarget::new(target.clone(), 1)]
        } else if target.zone != start.zone || options.move_off_exit {
            let ring = provider
                .target_costs(&target.zone)
                .map(|costs| ring_targets(target, options.range, options.move_off_exit, &costs))
                .unwrap_or_default();
            if ring.is_empty() {
                vec![SearchTarget::new(target.clone(), options.range)]
            } else {
                ring
            }
        } else {
            vec![SearchTarget::new(target.clone(), options.range)]
        };

        let params = options.search_params();
        let mut path = match self.search.search(start, &targets, &params, &mut provider) {
            Ok(outcome) => outcome.path,
            Err(err) => {
                debug!(agent = %agent.id, error = %err, "search failed");
                Vec::new()
            }
        };
        if append_target {
            path.push(target.clone());
        }

        if options.smooths() && path.len() >= 3 {
            let zone = path[0].zone.clone();
            if let Some(costs) = provider.zone_costs(&zone) {
                fix_path(&mut path, &costs);
            }
        }
        Ok(path)
    }
}

// ── Search cost provider ──────────────────────────────────────────────────────

/// Per-call cost provider: cached matrix, then the overlay stack on a copy,
/// memoized per zone for the duration of one search.
struct PlannerCosts<'p, 'o, W: World + ?Sized> {
    world:    &'p W,
    terrain:  &'p mut TerrainCache,
    matrices: &'p mut CostMatrixCache,
    options:  MatrixOptions,
    avoid:    &'p FxHashSet<ZoneName>,
    overlays: &'p OverlayStack<'o>,
    memo:     FxHashMap<ZoneName, Option<ZoneCosts>>,
}

impl<W: World + ?Sized> PlannerCosts<'_, '_, W> {
    fn build(&mut self, zone: &ZoneName) -> Option<ZoneCosts> {
        if self.avoid.contains(zone) {
            return None;
        }
        let terrain = match self.terrain.get(zone, self.world) {
            Ok(grid) => grid,
            Err(err) => {
                trace!(zone = %zone, error = %err, "zone skipped");
                return None;
            }
        };
        let cached = self
            .matrices
            .get(zone, &self.options, self.world, self.terrain)
            .ok()
            .flatten();
        let overlay = match self.overlays.compose(zone, cached.as_deref()) {
            Some(composed) => Some(Arc::new(composed)),
            None => cached,
        };
        Some(ZoneCosts { terrain, overlay })
    }

    /// Costs used to filter ring targets: avoided zones fall back to terrain.
    fn target_costs(&mut self, zone: &ZoneName) -> Option<ZoneCosts> {
        if let Some(costs) = self.zone_costs(zone) {
            return Some(costs);
        }
        self.terrain.get(zone, self.world).ok().map(ZoneCosts::terrain_only)
    }
}

impl<W: World + ?Sized> ZoneCostProvider for PlannerCosts<'_, '_, W> {
    fn zone_costs(&mut self, zone: &ZoneName) -> Option<ZoneCosts> {
        if let Some(costs) = self.memo.get(zone) {
            return costs.clone();
        }
        let costs = self.build(zone);
        self.memo.insert(zone.clone(), costs.clone());
        costs
    }
}
