//! Unit tests for zp-sim.

use std::cell::RefCell;
use std::rc::Rc;

use zp_core::{AgentId, Direction, PathingConfig, Pos, Tick, ZoneName};
use zp_planner::{MoveOptions, MoveRecord, PlanError, PlanOutcome, Polyline, VisualStyle};
use zp_resolve::ResolveReport;
use zp_search::ZoneAStar;
use zp_world::{AgentClass, AgentInfo, MemoryWorld, MoveCommand, WorkingTarget, World};

use crate::{NoopObserver, Pathing, PathingBuilder, PathingError, PathingObserver, PathingStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn mine(id: u32, x: u8, y: u8, zone: &str) -> AgentInfo {
    AgentInfo {
        id:         AgentId(id),
        pos:        Pos::new(x, y, zone),
        fatigue:    0,
        controlled: true,
        class:      AgentClass::Regular,
    }
}

fn world(zones: &[&str], agents: &[AgentInfo]) -> MemoryWorld {
    let mut world = MemoryWorld::new();
    for zone in zones {
        world.add_zone(*zone);
    }
    for agent in agents {
        world.add_agent(agent.clone());
    }
    world
}

fn pathing() -> Pathing<ZoneAStar> {
    PathingBuilder::new(ZoneAStar).build().unwrap()
}

fn cmd(id: u32, direction: Direction) -> MoveCommand {
    MoveCommand { agent: AgentId(id), direction }
}

#[derive(Default)]
struct Recorder {
    zones: Vec<(ZoneName, ResolveReport)>,
    ticks: Vec<(Tick, PathingStats)>,
}

impl PathingObserver for Recorder {
    fn on_zone_resolved(&mut self, zone: &ZoneName, report: &ResolveReport) {
        self.zones.push((zone.clone(), *report));
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &PathingStats) {
        self.ticks.push((tick, *stats));
    }
}

/// Plan one agent, resolve everything, commit and advance.
fn tick(
    pathing: &mut Pathing<ZoneAStar>,
    world: &mut MemoryWorld,
    id: u32,
    record: &mut Option<MoveRecord>,
    target: &Pos,
    observer: &mut Recorder,
) -> (Result<PlanOutcome, PlanError>, Vec<MoveCommand>) {
    let agent = world.agent(AgentId(id)).unwrap();
    let planned = pathing.plan_move(&*world, &agent, record, target, &MoveOptions::new());
    let mut commands: Vec<MoveCommand> = Vec::new();
    pathing.run_resolution_for_all_zones(&*world, &mut commands, observer);
    world.apply_commands(&commands);
    world.advance();
    (planned, commands)
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let config = PathingConfig { matrix_ttl_ticks: 0, ..PathingConfig::default() };
        let result = PathingBuilder::new(ZoneAStar).config(config).build();
        assert!(matches!(result, Err(PathingError::Config(_))));
    }

    #[test]
    fn config_is_kept() {
        let config = PathingConfig { hostile_avoid_radius: 4, ..PathingConfig::default() };
        let pathing = PathingBuilder::new(ZoneAStar).config(config.clone()).build().unwrap();
        assert_eq!(pathing.config(), &config);
        assert_eq!(pathing.cached_zones(), 0);
    }
}

// ── Tick protocol ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod protocol {
    use super::*;

    #[test]
    fn agent_walks_to_target_then_reports_no_path() {
        let mut world = world(&["A"], &[mine(1, 10, 10, "A")]);
        let mut pathing = pathing();
        let mut observer = Recorder::default();
        let mut record = None;
        let target = Pos::new(15, 10, "A");

        for _ in 0..4 {
            let (planned, commands) = tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
            assert_eq!(planned.unwrap(), PlanOutcome::Queued);
            assert_eq!(commands, vec![cmd(1, Direction::East)]);
        }
        assert_eq!(world.agent(AgentId(1)).unwrap().pos, Pos::new(14, 10, "A"));

        let (planned, commands) = tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
        assert!(matches!(planned, Err(PlanError::NoPath { .. })));
        assert!(commands.is_empty());

        let stats: Vec<PathingStats> = observer.ticks.iter().map(|(_, s)| *s).collect();
        assert_eq!(stats.len(), 5);
        assert_eq!((stats[0].planned, stats[0].recomputed, stats[0].committed), (1, 1, 1));
        assert_eq!((stats[1].planned, stats[1].recomputed), (1, 0));
        assert_eq!(stats[4].no_path, 1);
        assert_eq!(observer.ticks[0].0, Tick(0));
        assert_eq!(observer.zones.len(), 4);
    }

    #[test]
    fn stalled_agent_swaps_with_idle_neighbour() {
        let mut world = world(&["A"], &[mine(1, 10, 10, "A"), mine(2, 11, 10, "A")]);
        let mut pathing = pathing();
        let mut observer = Recorder::default();
        let mut record = None;
        let target = Pos::new(13, 10, "A");

        // The first attempt bumps into the idle agent and fails in the engine.
        let (_, commands) = tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
        assert_eq!(commands, vec![cmd(1, Direction::East)]);
        assert_eq!(world.agent(AgentId(1)).unwrap().pos, Pos::new(10, 10, "A"));

        let (planned, commands) = tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
        assert_eq!(planned.unwrap(), PlanOutcome::Blocked);
        assert_eq!(commands, vec![cmd(1, Direction::East), cmd(2, Direction::West)]);
        assert_eq!(world.agent(AgentId(1)).unwrap().pos, Pos::new(11, 10, "A"));
        assert_eq!(world.agent(AgentId(2)).unwrap().pos, Pos::new(10, 10, "A"));

        let last = observer.ticks[1].1;
        assert_eq!((last.blocked, last.swapped, last.committed), (1, 1, 2));
    }

    #[test]
    fn working_neighbour_is_pushed_within_its_range() {
        let mut world = world(&["A"], &[mine(1, 10, 10, "A"), mine(2, 11, 10, "A")]);
        let assignments = |a: &AgentInfo| {
            (a.id == AgentId(2)).then(|| WorkingTarget::new(Pos::new(12, 10, "A"), 1))
        };
        let mut pathing = PathingBuilder::new(ZoneAStar)
            .working_targets(Box::new(assignments))
            .build()
            .unwrap();
        let mut observer = Recorder::default();
        let mut record = None;
        let target = Pos::new(14, 10, "A");

        tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
        let (_, commands) = tick(&mut pathing, &mut world, 1, &mut record, &target, &mut observer);
        assert_eq!(commands, vec![cmd(1, Direction::East), cmd(2, Direction::North)]);
        assert_eq!(observer.ticks[1].1.pushed, 1);
    }

    #[test]
    fn zone_resolves_once_per_tick() {
        let world = world(&["A"], &[mine(1, 10, 10, "A")]);
        let mut pathing = pathing();
        let agent = world.agent(AgentId(1)).unwrap();
        let mut record = None;
        pathing
            .plan_move(&world, &agent, &mut record, &Pos::new(20, 10, "A"), &MoveOptions::new())
            .unwrap();

        let zone = ZoneName::from("A");
        let mut commands: Vec<MoveCommand> = Vec::new();
        let first = pathing.run_resolution_for_zone(&world, &zone, &mut commands, &mut NoopObserver);
        assert_eq!(first.map(|r| r.committed), Some(1));
        assert!(pathing.run_resolution_for_zone(&world, &zone, &mut commands, &mut NoopObserver).is_none());
        assert_eq!(commands.len(), 1);

        pathing.end_tick(world.time(), &mut NoopObserver);
        assert_eq!(pathing.queues().total(), 0);
        assert_eq!(pathing.stats(), &PathingStats::default());
    }

    #[test]
    fn zone_hooks_run_on_entry() {
        let mut world = world(&["A", "B"], &[mine(1, 0, 10, "B")]);
        let entered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&entered);
        let mut pathing = PathingBuilder::new(ZoneAStar)
            .zone_hook(Box::new(move |agent: &AgentInfo, zone: &ZoneName| {
                sink.borrow_mut().push((agent.id, zone.clone()));
            }))
            .build()
            .unwrap();
        let mut observer = Recorder::default();
        let mut record = Some(MoveRecord(20, 10, ZoneName::from("B"), 48, 10, "3".into()));

        let (planned, commands) =
            tick(&mut pathing, &mut world, 1, &mut record, &Pos::new(20, 10, "B"), &mut observer);
        assert_eq!(planned.unwrap(), PlanOutcome::Blocked);
        assert_eq!(*entered.borrow(), vec![(AgentId(1), ZoneName::from("B"))]);
        assert_eq!(commands.len(), 1);
        assert_eq!(observer.ticks[0].1.blocked, 1);
    }

    #[test]
    fn shared_visualizer_receives_paths() {
        let world = world(&["A"], &[mine(1, 10, 10, "A")]);
        let drawn: Rc<RefCell<Vec<Polyline>>> = Rc::default();
        let mut pathing = PathingBuilder::new(ZoneAStar)
            .visualizer(Box::new(Rc::clone(&drawn)))
            .build()
            .unwrap();
        let agent = world.agent(AgentId(1)).unwrap();
        let options = MoveOptions::new().visualized(VisualStyle::default());
        pathing
            .plan_move(&world, &agent, &mut None, &Pos::new(15, 10, "A"), &options)
            .unwrap();
        let drawn = drawn.borrow();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].zone, ZoneName::from("A"));
    }
}

// ── Cache controls ────────────────────────────────────────────────────────────

#[cfg(test)]
mod caches {
    use super::*;

    fn plan_all(pathing: &mut Pathing<ZoneAStar>, world: &MemoryWorld) {
        let agents: Vec<AgentInfo> = world.agents().cloned().collect();
        for agent in agents {
            let target = Pos::new(25, 25, agent.pos.zone.clone());
            pathing
                .plan_move(world, &agent, &mut None, &target, &MoveOptions::new())
                .unwrap();
        }
    }

    #[test]
    fn invalidation_drops_zone_matrices() {
        let world = world(&["A", "B"], &[mine(1, 10, 10, "A"), mine(2, 10, 10, "B")]);
        let mut pathing = pathing();
        plan_all(&mut pathing, &world);
        assert_eq!(pathing.cached_zones(), 2);

        pathing.invalidate_zone(&ZoneName::from("A"));
        assert_eq!(pathing.cached_zones(), 1);
        pathing.invalidate_all_zones();
        assert_eq!(pathing.cached_zones(), 0);
    }

    #[test]
    fn oversized_matrix_cache_is_dropped_at_tick_end() {
        let world = world(&["A", "B"], &[mine(1, 10, 10, "A"), mine(2, 10, 10, "B")]);
        let config = PathingConfig { matrix_cache_capacity: 1, ..PathingConfig::default() };
        let mut pathing = PathingBuilder::new(ZoneAStar).config(config).build().unwrap();
        plan_all(&mut pathing, &world);
        assert_eq!(pathing.cached_zones(), 2);

        let mut commands: Vec<MoveCommand> = Vec::new();
        let report = pathing.run_resolution_for_all_zones(&world, &mut commands, &mut NoopObserver);
        assert_eq!(report.committed, 2);
        assert_eq!(pathing.cached_zones(), 0);
    }

    #[test]
    fn within_capacity_cache_survives_tick_end() {
        let world = world(&["A"], &[mine(1, 10, 10, "A")]);
        let mut pathing = pathing();
        plan_all(&mut pathing, &world);
        let mut commands: Vec<MoveCommand> = Vec::new();
        pathing.run_resolution_for_all_zones(&world, &mut commands, &mut NoopObserver);
        assert_eq!(pathing.cached_zones(), 1);
    }
}
