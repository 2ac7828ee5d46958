//! The `Pathing` facade and its tick protocol.

use tracing::{debug, trace};

use zp_core::{PathingConfig, Tick, ZoneName};
use zp_matrix::{CostMatrixCache, TerrainCache};
use zp_planner::{Locate, MoveOptions, MoveRecord, PathPlanner, PathVisualizer, PlanContext, PlanOutcome, PlanResult};
use zp_resolve::{MoveResolver, ResolveReport, ZoneQueues};
use zp_search::PathSearch;
use zp_world::{AgentInfo, MoveSink, WorkingTargets, World, ZoneEnterHook};

use crate::{PathingObserver, PathingStats};

/// Movement core owned by the host.
///
/// Holds both caches, the tick's move queues and the planner, and exposes
/// the planning, resolution and cache-control operations.  The world is
/// passed into each call; the facade never keeps it.
///
/// Create via [`PathingBuilder`][crate::PathingBuilder].
pub struct Pathing<S: PathSearch> {
    pub(crate) config:     PathingConfig,
    pub(crate) terrain:    TerrainCache,
    pub(crate) matrices:   CostMatrixCache,
    pub(crate) queues:     ZoneQueues,
    pub(crate) planner:    PathPlanner<S>,
    pub(crate) zone_hooks: Vec<Box<dyn ZoneEnterHook>>,
    pub(crate) working:    Option<Box<dyn WorkingTargets>>,
    pub(crate) visualizer: Option<Box<dyn PathVisualizer>>,
    pub(crate) stats:      PathingStats,
}

impl<S: PathSearch> Pathing<S> {
    // ── Planning ──────────────────────────────────────────────────────────

    /// Plan one step of `agent` toward `target` and queue it.
    ///
    /// `record` is the agent's persisted move state, owned by the host.
    pub fn plan_move<W, L>(
        &mut self,
        world: &W,
        agent: &AgentInfo,
        record: &mut Option<MoveRecord>,
        target: &L,
        options: &MoveOptions<'_>,
    ) -> PlanResult<PlanOutcome>
    where
        W: World + ?Sized,
        L: Locate + ?Sized,
    {
        let searches = self.planner.recomputed();
        let working = self.working.as_deref().map(|w| w as &dyn WorkingTargets);
        let visualizer = self.visualizer.as_deref_mut().map(|v| v as &mut dyn PathVisualizer);
        let mut ctx = PlanContext {
            world,
            config:     &self.config,
            terrain:    &mut self.terrain,
            matrices:   &mut self.matrices,
            queues:     &mut self.queues,
            working,
            zone_hooks: &mut self.zone_hooks,
            visualizer,
        };
        let result = self.planner.plan_move(&mut ctx, agent, record, target, options);
        self.stats.recomputed += self.planner.recomputed() - searches;
        self.stats.record_plan(&result);
        result
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve every zone with queued moves, in name order, then run
    /// [`end_tick`](Self::end_tick).  Returns the combined report.
    pub fn run_resolution_for_all_zones<W, O>(
        &mut self,
        world: &W,
        sink: &mut dyn MoveSink,
        observer: &mut O,
    ) -> ResolveReport
    where
        W: World + ?Sized,
        O: PathingObserver,
    {
        let mut total = ResolveReport::default();
        for zone in self.queues.zones() {
            if let Some(report) = self.run_resolution_for_zone(world, &zone, sink, observer) {
                total.absorb(&report);
            }
        }
        self.end_tick(world.time(), observer);
        total
    }

    /// Resolve the moves queued for `zone`.
    ///
    /// Returns `None` when the zone was already resolved this tick; the
    /// queue is left alone in that case.
    pub fn run_resolution_for_zone<W, O>(
        &mut self,
        world: &W,
        zone: &ZoneName,
        sink: &mut dyn MoveSink,
        observer: &mut O,
    ) -> Option<ResolveReport>
    where
        W: World + ?Sized,
        O: PathingObserver,
    {
        if !self.queues.mark_resolved(zone) {
            debug!(zone = %zone, "zone already resolved this tick");
            return None;
        }
        let Some((queue, has_move)) = self.queues.split_mut(zone) else {
            trace!(zone = %zone, "nothing queued");
            return Some(ResolveReport::default());
        };

        let mut resolver = MoveResolver::new(world, &self.config, &mut self.terrain, &mut self.matrices);
        if let Some(working) = self.working.as_deref() {
            resolver = resolver.with_working_targets(working);
        }
        let report = resolver.resolve_zone(zone, queue, has_move, sink);

        self.stats.record_resolution(&report);
        observer.on_zone_resolved(zone, &report);
        Some(report)
    }

    /// Close the tick: report stats, clear the queues and per-tick planner
    /// state, and drop the matrix cache if it outgrew its capacity.
    pub fn end_tick<O: PathingObserver>(&mut self, tick: Tick, observer: &mut O) {
        observer.on_tick_end(tick, &self.stats);
        self.queues.clear();
        self.planner.end_tick();
        if self.matrices.maybe_evict_all() {
            debug!(tick = %tick, "matrix cache over capacity, cleared");
        }
        self.stats = PathingStats::default();
    }

    // ── Cache controls ────────────────────────────────────────────────────

    /// Drop `zone`'s cost matrices; they are rebuilt on next use.
    pub fn invalidate_zone(&mut self, zone: &ZoneName) {
        self.matrices.invalidate(zone);
    }

    pub fn invalidate_all_zones(&mut self) {
        self.matrices.invalidate_all();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &PathingConfig {
        &self.config
    }

    /// Counters of the tick in progress.
    pub fn stats(&self) -> &PathingStats {
        &self.stats
    }

    pub fn queues(&self) -> &ZoneQueues {
        &self.queues
    }

    /// Zones currently held in the matrix cache.
    pub fn cached_zones(&self) -> usize {
        self.matrices.len()
    }

    pub fn planner(&self) -> &PathPlanner<S> {
        &self.planner
    }
}
