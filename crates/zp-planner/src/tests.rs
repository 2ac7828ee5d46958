//! Unit tests for zp-planner.

use std::cell::RefCell;
use std::rc::Rc;

use zp_core::{AgentId, Coord, Direction, PathingConfig, Pos, ZoneName};
use zp_matrix::{CostMatrixCache, TerrainCache};
use zp_resolve::{MoveResolver, ZoneQueues};
use zp_search::ZoneAStar;
use zp_world::{AgentClass, AgentInfo, MemoryWorld, MoveCommand, WorkingTargets, World, ZoneEnterHook};

use crate::{Locate, MoveOptions, MoveRecord, PathPlanner, PlanContext, PlanOutcome, PlanResult, Polyline};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn zone() -> ZoneName {
    ZoneName::from("A")
}

fn mine(id: u32, x: u8, y: u8) -> AgentInfo {
    AgentInfo {
        id:         AgentId(id),
        pos:        Pos::new(x, y, "A"),
        fatigue:    0,
        controlled: true,
        class:      AgentClass::Regular,
    }
}

fn foreign(id: u32, x: u8, y: u8) -> AgentInfo {
    AgentInfo { controlled: false, ..mine(id, x, y) }
}

/// Everything a host keeps between calls, over an all-plain zone "A".
struct Host {
    world:    MemoryWorld,
    config:   PathingConfig,
    terrain:  TerrainCache,
    matrices: CostMatrixCache,
    queues:   ZoneQueues,
    hooks:    Vec<Box<dyn ZoneEnterHook>>,
    drawn:    Vec<Polyline>,
    planner:  PathPlanner<ZoneAStar>,
}

impl Host {
    fn new(agents: &[AgentInfo]) -> Self {
        let mut world = MemoryWorld::new();
        world.add_zone("A");
        for agent in agents {
            world.add_agent(agent.clone());
        }
        let config = PathingConfig::default();
        Self {
            world,
            terrain: TerrainCache::new(config.terrain_cache_capacity),
            matrices: CostMatrixCache::from_config(&config),
            config,
            queues: ZoneQueues::new(),
            hooks: Vec::new(),
            drawn: Vec::new(),
            planner: PathPlanner::new(ZoneAStar),
        }
    }

    fn plan_with(
        &mut self,
        id: u32,
        record: &mut Option<MoveRecord>,
        target: &dyn Locate,
        options: &MoveOptions<'_>,
        working: Option<&dyn WorkingTargets>,
    ) -> PlanResult<PlanOutcome> {
        let agent = self.world.agent(AgentId(id)).unwrap();
        let mut ctx = PlanContext {
            world:      &self.world,
            config:     &self.config,
            terrain:    &mut self.terrain,
            matrices:   &mut self.matrices,
            queues:     &mut self.queues,
            working,
            zone_hooks: &mut self.hooks,
            visualizer: Some(&mut self.drawn),
        };
        self.planner.plan_move(&mut ctx, &agent, record, target, options)
    }

    fn plan(&mut self, id: u32, record: &mut Option<MoveRecord>, target: &dyn Locate, options: &MoveOptions<'_>) -> PlanResult<PlanOutcome> {
        self.plan_with(id, record, target, options, None)
    }

    /// Resolve, commit, advance the clock and reset per-tick state.
    fn step(&mut self) -> Vec<MoveCommand> {
        let mut commands = Vec::new();
        let zone = zone();
        if let Some((queue, has_move)) = self.queues.split_mut(&zone) {
            MoveResolver::new(&self.world, &self.config, &mut self.terrain, &mut self.matrices)
                .resolve_zone(&zone, queue, has_move, &mut commands);
        }
        self.world.apply_commands(&commands);
        self.world.advance();
        self.queues.clear();
        self.planner.end_tick();
        commands
    }

    fn queued(&self) -> Vec<zp_resolve::Move> {
        self.queues.queue(&zone()).map(|q| q.all().to_vec()).unwrap_or_default()
    }
}

fn path_of(record: &Option<MoveRecord>) -> &str {
    &record.as_ref().unwrap().5
}

// ── Direction paths ───────────────────────────────────────────────────────────

#[cfg(test)]
mod paths {
    use super::*;
    use crate::{DirectionPath, serialize_path};

    #[test]
    fn serialize_stops_at_zone_change() {
        let start = Pos::new(47, 10, "A");
        let path = [Pos::new(48, 10, "A"), Pos::new(49, 11, "A"), Pos::new(0, 11, "B")];
        let (directions, last) = serialize_path(&start, &path);
        assert_eq!(directions.encode(), "34");
        assert_eq!(last, Pos::new(49, 11, "A"));
    }

    #[test]
    fn serialize_across_edge_from_exit_cell() {
        // Standing on an exit cell, the path starts in the next zone.
        let start = Pos::new(49, 10, "A");
        let path = [Pos::new(0, 10, "B"), Pos::new(1, 10, "B")];
        let (directions, last) = serialize_path(&start, &path);
        assert_eq!(directions.encode(), "33");
        assert_eq!(last, Pos::new(1, 10, "B"));
    }

    #[test]
    fn empty_search_result_anchors_at_start() {
        let start = Pos::new(5, 5, "A");
        let (directions, last) = serialize_path(&start, &[]);
        assert!(directions.is_empty());
        assert_eq!(last, start);
    }

    #[test]
    fn decode_walk_and_reject() {
        let path = DirectionPath::decode("3381").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(Direction::East));
        assert_eq!(path.end_from(Coord::new(10, 10)), Coord::new(11, 8));
        assert_eq!(path.to_string(), "3381");
        assert!(DirectionPath::decode("309").is_none());
        // A walk that would leave the grid stops at the edge.
        let west = DirectionPath::decode("77").unwrap();
        assert_eq!(west.points(Coord::new(0, 3)), Vec::<Coord>::new());
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod records {
    use super::*;
    use crate::{DirectionPath, PlanError, SerializedMove};

    #[test]
    fn record_shape() {
        let stored = SerializedMove {
            target: Pos::new(15, 10, "A"),
            last:   Coord::new(10, 10),
            path:   DirectionPath::decode("3333").unwrap(),
        };
        let record = stored.to_record();
        assert_eq!(record, MoveRecord(15, 10, zone(), 10, 10, "3333".into()));
        assert_eq!(SerializedMove::from_record(&record).unwrap(), stored);
    }

    #[test]
    fn corrupt_records_are_rejected() {
        let bad_path = MoveRecord(1, 1, zone(), 1, 1, "3x".into());
        assert!(matches!(SerializedMove::from_record(&bad_path), Err(PlanError::CorruptRecord(_))));
        let bad_coord = MoveRecord(60, 1, zone(), 1, 1, String::new());
        assert!(matches!(SerializedMove::from_record(&bad_coord), Err(PlanError::CorruptRecord(_))));
    }
}

// ── Target rings ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod rings {
    use std::sync::Arc;

    use zp_core::ZONE_AREA;
    use zp_matrix::TerrainGrid;
    use zp_search::ZoneCosts;
    use zp_world::TERRAIN_MASK_WALL;

    use super::*;
    use crate::ring_targets;

    fn costs(walls: &[(u8, u8)]) -> ZoneCosts {
        let mut raw = Box::new([0u8; ZONE_AREA]);
        for &(x, y) in walls {
            raw[Coord::new(x, y).index()] = TERRAIN_MASK_WALL;
        }
        ZoneCosts::terrain_only(Arc::new(TerrainGrid::from_raw(raw)))
    }

    #[test]
    fn interior_target_is_not_expanded() {
        assert!(ring_targets(&Pos::new(25, 25, "A"), 3, true, &costs(&[])).is_empty());
    }

    #[test]
    fn edge_target_expands_to_clamped_border() {
        let ring = ring_targets(&Pos::new(1, 10, "A"), 2, true, &costs(&[(1, 8)]));
        // Clamped square x 1..=3, y 8..=12 has 12 border cells, one a wall.
        assert_eq!(ring.len(), 11);
        assert!(ring.iter().all(|t| t.range == 0 && t.pos.x() >= 1));
        assert!(!ring.iter().any(|t| t.pos.coord == Coord::new(1, 8)));
    }

    #[test]
    fn exits_allowed_without_move_off_exit() {
        let ring = ring_targets(&Pos::new(0, 10, "A"), 1, false, &costs(&[]));
        // x 0..=1, y 9..=11.
        assert_eq!(ring.len(), 6);
        assert!(ring.iter().any(|t| t.pos.x() == 0));
    }
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod smoothing {
    use std::sync::Arc;

    use zp_core::ZONE_AREA;
    use zp_matrix::{CostMatrix, TerrainGrid};
    use zp_search::ZoneCosts;

    use super::*;
    use crate::fix_path;

    fn road_row() -> ZoneCosts {
        let mut roads = CostMatrix::new();
        for x in 10..=20 {
            roads.set(Coord::new(x, 10), 1);
        }
        ZoneCosts {
            terrain: Arc::new(TerrainGrid::from_raw(Box::new([0; ZONE_AREA]))),
            overlay: Some(Arc::new(roads)),
        }
    }

    #[test]
    fn detour_is_pulled_back_onto_road() {
        let mut path = vec![Pos::new(11, 10, "A"), Pos::new(12, 11, "A"), Pos::new(13, 10, "A")];
        fix_path(&mut path, &road_row());
        assert_eq!(path[1], Pos::new(12, 10, "A"));
    }

    #[test]
    fn straight_road_is_untouched() {
        let original = vec![Pos::new(11, 10, "A"), Pos::new(12, 10, "A"), Pos::new(13, 10, "A")];
        let mut path = original.clone();
        fix_path(&mut path, &road_row());
        assert_eq!(path, original);
    }

    #[test]
    fn only_the_first_zone_is_touched() {
        let original = vec![Pos::new(11, 10, "A"), Pos::new(12, 11, "B"), Pos::new(13, 10, "B")];
        let mut path = original.clone();
        fix_path(&mut path, &road_row());
        assert_eq!(path, original);
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planning {
    use std::cell::Cell;

    use zp_matrix::CostMatrix;

    use super::*;
    use crate::{PlanError, TARGET_LINE_COLOR, VisualStyle};

    #[test]
    fn fresh_path_on_flat_terrain() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        let target = Pos::new(15, 10, "A");
        let outcome = host.plan(1, &mut record, &target, &MoveOptions::new()).unwrap();
        assert_eq!(outcome, PlanOutcome::Queued);
        assert_eq!(record, Some(MoveRecord(15, 10, zone(), 10, 10, "3333".into())));

        let queued = host.queued();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].direction, Direction::East);
        assert_eq!(queued[0].path_end, Some(Coord::new(14, 10)));
        assert!(!queued[0].blocked);
    }

    #[test]
    fn second_call_in_a_tick_is_idempotent() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        let target = Pos::new(15, 10, "A");
        host.plan(1, &mut record, &target, &MoveOptions::new()).unwrap();
        let first = record.clone();
        let again = host.plan(1, &mut record, &target, &MoveOptions::new()).unwrap();
        assert_eq!(again, PlanOutcome::Queued);
        assert_eq!(record, first);
        assert_eq!(host.queued().len(), 1);
    }

    #[test]
    fn path_is_consumed_step_by_step() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        let target = Pos::new(15, 10, "A");
        for (tick, left) in ["3333", "333", "33", "3"].into_iter().enumerate() {
            let outcome = host.plan(1, &mut record, &target, &MoveOptions::new()).unwrap();
            assert_eq!(outcome, PlanOutcome::Queued, "tick {tick}");
            assert_eq!(path_of(&record), left, "tick {tick}");
            host.step();
        }
        assert_eq!(host.world.agent(AgentId(1)).unwrap().pos, Pos::new(14, 10, "A"));

        let done = host.plan(1, &mut record, &target, &MoveOptions::new());
        assert!(matches!(done, Err(PlanError::NoPath { .. })));
        assert_eq!(path_of(&record), "");
        // Unchanged target, unmoved agent: still no path, nothing queued.
        host.step();
        assert!(host.plan(1, &mut record, &target, &MoveOptions::new()).is_err());
        assert!(host.queued().is_empty());
        assert_eq!(host.planner.recomputed(), 0);
    }

    #[test]
    fn new_target_replaces_stored_path() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        host.plan(1, &mut record, &Pos::new(15, 10, "A"), &MoveOptions::new()).unwrap();
        host.step();
        host.plan(1, &mut record, &Pos::new(11, 15, "A"), &MoveOptions::new()).unwrap();
        let MoveRecord(tx, ty, _, lx, ly, path) = record.unwrap();
        assert_eq!((tx, ty, lx, ly), (11, 15, 11, 10));
        assert_eq!(path, "5555");
    }

    #[test]
    fn invalid_target_leaves_record_alone() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = Some(MoveRecord(3, 3, zone(), 10, 10, "8".into()));
        let before = record.clone();
        let err = host.plan(1, &mut record, &None::<Pos>, &MoveOptions::new()).unwrap_err();
        assert!(matches!(err, PlanError::InvalidTarget));
        assert_eq!(record, before);
    }

    #[test]
    fn fatigued_agent_rests() {
        let mut tired = mine(1, 10, 10);
        tired.fatigue = 2;
        let mut host = Host::new(&[tired]);
        let mut record = Some(MoveRecord(15, 10, zone(), 10, 10, "3333".into()));
        let before = record.clone();
        let options = MoveOptions::new().visualized(VisualStyle::default());
        let outcome = host.plan(1, &mut record, &Pos::new(15, 10, "A"), &options).unwrap();
        assert_eq!(outcome, PlanOutcome::Resting);
        assert_eq!(record, before);
        assert!(host.queued().is_empty());
        // The drawn path skips the step the agent has not taken yet.
        assert_eq!(host.drawn[0].points, vec![Coord::new(11, 10), Coord::new(12, 10), Coord::new(13, 10)]);
    }

    #[test]
    fn range_zero_appends_the_target() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        host.plan(1, &mut record, &Pos::new(12, 10, "A"), &MoveOptions::new().range(0)).unwrap();
        assert_eq!(path_of(&record), "33");
    }

    #[test]
    fn narrower_range_recomputes_exhausted_path() {
        let mut host = Host::new(&[mine(1, 11, 10)]);
        let mut record = None;
        let target = Pos::new(12, 10, "A");

        let in_range = host.plan(1, &mut record, &target, &MoveOptions::new().range(1));
        assert!(matches!(in_range, Err(PlanError::NoPath { .. })));
        assert_eq!(path_of(&record), "");
        host.step();

        let outcome = host.plan(1, &mut record, &target, &MoveOptions::new().range(0)).unwrap();
        assert_eq!(outcome, PlanOutcome::Queued);
        assert_eq!(path_of(&record), "3");
        assert_eq!(host.queued()[0].direction, Direction::East);
        assert_eq!(host.planner.recomputed(), 1);
    }

    #[test]
    fn stalled_in_front_of_obstacle_is_blocked() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = Some(MoveRecord(15, 10, zone(), 10, 10, "3333".into()));
        let outcome = host.plan(1, &mut record, &Pos::new(15, 10, "A"), &MoveOptions::new()).unwrap();
        assert_eq!(outcome, PlanOutcome::Blocked);
        assert!(host.queued()[0].blocked);
    }

    #[test]
    fn stalled_in_front_of_foreign_agent_avoids_it() {
        let mut host = Host::new(&[mine(1, 10, 10), foreign(9, 11, 10)]);
        let mut record = Some(MoveRecord(15, 10, zone(), 10, 10, "3333".into()));
        let outcome = host.plan(1, &mut record, &Pos::new(15, 10, "A"), &MoveOptions::new()).unwrap();
        assert_eq!(outcome, PlanOutcome::Queued);
        let queued = host.queued();
        assert!(!queued[0].blocked);
        assert_ne!(queued[0].direction, Direction::East);
    }

    #[test]
    fn zone_entry_runs_hooks_and_blocks() {
        let mut host = Host::new(&[]);
        host.world.add_zone("B");
        host.world.add_agent(AgentInfo { pos: Pos::new(0, 10, "B"), ..mine(1, 0, 0) });

        let global = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&global);
        host.hooks.push(Box::new(move |agent: &AgentInfo, zone: &ZoneName| {
            sink.borrow_mut().push((agent.id, zone.clone()));
        }));
        let local = Cell::new(0);
        let on_enter = |_: &AgentInfo, _: &ZoneName| local.set(local.get() + 1);
        let options = MoveOptions { on_zone_enter: Some(&on_enter), ..MoveOptions::new() };

        let mut record = Some(MoveRecord(20, 10, ZoneName::from("B"), 48, 10, "3".into()));
        let outcome = host.plan(1, &mut record, &Pos::new(20, 10, "B"), &options).unwrap();
        assert_eq!(outcome, PlanOutcome::Blocked);
        assert_eq!(local.get(), 1);
        assert_eq!(*global.borrow(), vec![(AgentId(1), ZoneName::from("B"))]);
    }

    #[test]
    fn stationed_workers_are_detoured_around() {
        let agents = [mine(1, 10, 10), mine(2, 12, 10)];
        let target = Pos::new(13, 10, "A");
        let working = |a: &AgentInfo| {
            (a.id == AgentId(2)).then(|| zp_world::WorkingTarget::new(Pos::new(13, 10, "A"), 1))
        };

        let mut plain = Host::new(&agents);
        let mut record = None;
        plain.plan(1, &mut record, &target, &MoveOptions::new()).unwrap();
        assert_eq!(path_of(&record), "33");

        let mut host = Host::new(&agents);
        let mut record = None;
        host.plan_with(1, &mut record, &target, &MoveOptions::new(), Some(&working as &dyn WorkingTargets))
            .unwrap();
        let path = crate::DirectionPath::decode(path_of(&record)).unwrap();
        assert_eq!(path.len(), 2);
        assert!(!path.points(Coord::new(10, 10)).contains(&Coord::new(12, 10)));
    }

    #[test]
    fn caller_overlay_and_avoided_zones() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let wall = |zone: &ZoneName, m: &mut CostMatrix| {
            if zone.as_str() == "A" {
                for y in 5..=15 {
                    m.set(Coord::new(12, y), 255);
                }
            }
        };
        let mut record = None;
        let target = Pos::new(15, 10, "A");
        host.plan(1, &mut record, &target, &MoveOptions::new().overlay(&wall)).unwrap();
        let path = crate::DirectionPath::decode(path_of(&record)).unwrap();
        assert!(path.points(Coord::new(10, 10)).iter().all(|c| c.x != 12 || !(5..=15).contains(&c.y)));

        let avoided = [zone()];
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        let result = host.plan(1, &mut record, &target, &MoveOptions::new().avoiding(&avoided));
        assert!(matches!(result, Err(PlanError::NoPath { .. })));
    }

    #[test]
    fn corrupt_record_is_replaced() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = Some(MoveRecord(15, 10, zone(), 10, 10, "??".into()));
        host.plan(1, &mut record, &Pos::new(15, 10, "A"), &MoveOptions::new()).unwrap();
        assert_eq!(path_of(&record), "3333");
    }

    #[test]
    fn visualization_draws_path_and_target_leg() {
        let mut host = Host::new(&[mine(1, 10, 10)]);
        let mut record = None;
        let options = MoveOptions::new().visualized(VisualStyle::default());
        host.plan(1, &mut record, &Pos::new(15, 10, "A"), &options).unwrap();
        assert_eq!(host.drawn.len(), 2);
        assert_eq!(host.drawn[0].points.len(), 4);
        assert_eq!(host.drawn[1].points, vec![Coord::new(14, 10), Coord::new(15, 10)]);
        assert_eq!(host.drawn[1].style.stroke, TARGET_LINE_COLOR);
    }

    #[test]
    fn agent_can_be_a_target() {
        let mut host = Host::new(&[mine(1, 10, 10), mine(2, 14, 10)]);
        let other = host.world.agent(AgentId(2)).unwrap();
        let mut record = None;
        host.plan(1, &mut record, &other, &MoveOptions::new()).unwrap();
        assert_eq!(path_of(&record), "333");
    }
}
