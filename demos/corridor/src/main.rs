//! `corridor` — two groups of agents cross a walled three-lane corridor in
//! opposite directions.
//!
//! The corridor has a road down the middle lane, a swamp patch, an idle
//! worker stationed on the road and a foreign agent parked in the upper
//! lane, so every tick exercises path reuse, swaps, pushes and reroutes.
//! Planning order is shuffled each tick with a seeded RNG.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -p corridor

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::rc::Rc;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use zp_core::{AgentId, Coord, PathingConfig, Pos, Tick, ZoneName};
use zp_planner::{MoveOptions, MoveRecord, PlanError, Polyline, VisualStyle};
use zp_search::ZoneAStar;
use zp_sim::{PathingBuilder, PathingObserver, PathingStats};
use zp_world::{
    AgentClass, AgentInfo, MemoryWorld, MoveCommand, Structure, StructureKind, TERRAIN_MASK_WALL,
    WorkingTarget, World, load_layout_reader,
};

// ── Inputs ────────────────────────────────────────────────────────────────────

const CONFIG: &str = r#"
ticks = 150
seed  = 7

[pathing]
matrix_ttl_ticks     = 50
hostile_avoid_radius = 2
working_agent_cost   = 60
"#;

const LAYOUT: &str = "\
zone,x,y,feature,owned,public
W1,20,21,swamp,,
W1,21,21,swamp,,
W1,22,21,swamp,,
W1,12,22,rampart,true,false
W1,35,23,container,,
W1,40,21,site:road,,
";

const ZONE:   &str    = "W1";
const WORKER: AgentId = AgentId(9);

#[derive(Deserialize)]
struct DemoConfig {
    ticks:   u64,
    seed:    u64,
    #[serde(default)]
    pathing: PathingConfig,
}

// ── World ─────────────────────────────────────────────────────────────────────

fn agent(id: u32, x: u8, y: u8, controlled: bool) -> AgentInfo {
    AgentInfo {
        id: AgentId(id),
        pos: Pos::new(x, y, ZONE),
        fatigue: 0,
        controlled,
        class: AgentClass::Regular,
    }
}

fn build_world() -> Result<MemoryWorld> {
    let mut world = MemoryWorld::new();
    world
        .add_zone(ZONE)
        .fill_terrain(ZONE, Coord::new(5, 20), Coord::new(44, 20), TERRAIN_MASK_WALL)
        .fill_terrain(ZONE, Coord::new(5, 24), Coord::new(44, 24), TERRAIN_MASK_WALL);
    for x in 5..=44 {
        world.add_structure(ZONE, Structure::new(Coord::new(x, 22), StructureKind::Road));
    }
    let rows = load_layout_reader(Cursor::new(LAYOUT), &mut world)?;
    debug!(rows, "layout loaded");

    for (id, x, y) in [(1, 3, 21), (2, 3, 22), (3, 3, 23), (4, 2, 22)] {
        world.add_agent(agent(id, x, y, true));
    }
    for (id, x, y) in [(5, 46, 21), (6, 46, 22), (7, 46, 23), (8, 47, 22)] {
        world.add_agent(agent(id, x, y, true));
    }
    world.add_agent(agent(WORKER.0, 25, 22, true));
    world.add_agent(agent(10, 30, 21, false));
    Ok(world)
}

struct Mover {
    target:   Pos,
    priority: i32,
    record:   Option<MoveRecord>,
}

fn movers() -> BTreeMap<AgentId, Mover> {
    let mut movers = BTreeMap::new();
    for id in 1..=8u32 {
        let eastbound = id <= 4;
        let lane = 21 + (id % 3) as u8;
        let (x, priority) = if eastbound { (46, 1) } else { (3, 0) };
        movers.insert(AgentId(id), Mover { target: Pos::new(x, lane, ZONE), priority, record: None });
    }
    movers
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Summary {
    ticks:  u64,
    totals: PathingStats,
}

impl PathingObserver for Summary {
    fn on_tick_end(&mut self, tick: Tick, stats: &PathingStats) {
        self.ticks += 1;
        self.totals.absorb(stats);
        if stats.pushed + stats.swapped + stats.rerouted > 0 {
            info!(
                tick = %tick,
                pushed = stats.pushed,
                swapped = stats.swapped,
                rerouted = stats.rerouted,
                "conflicts resolved"
            );
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: DemoConfig = toml::from_str(CONFIG)?;
    let mut world = build_world()?;
    let drawn: Rc<RefCell<Vec<Polyline>>> = Rc::default();

    let mut pathing = PathingBuilder::new(ZoneAStar)
        .config(config.pathing)
        .working_targets(Box::new(|a: &AgentInfo| {
            (a.id == WORKER).then(|| WorkingTarget::new(Pos::new(25, 22, ZONE), 1))
        }))
        .zone_hook(Box::new(|a: &AgentInfo, zone: &ZoneName| {
            info!(agent = %a.id, zone = %zone, "zone entered");
        }))
        .visualizer(Box::new(Rc::clone(&drawn)))
        .build()?;

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut movers = movers();
    let mut summary = Summary::default();

    info!(agents = movers.len(), ticks = config.ticks, "corridor demo starting");

    for _ in 0..config.ticks {
        let mut order: Vec<AgentId> = movers.keys().copied().collect();
        order.shuffle(&mut rng);

        for id in order {
            let (Some(agent), Some(mover)) = (world.agent(id), movers.get_mut(&id)) else { continue };
            let mut options = MoveOptions::new().priority(mover.priority);
            if id == AgentId(1) {
                options = options.visualized(VisualStyle::default());
            }
            match pathing.plan_move(&world, &agent, &mut mover.record, &mover.target, &options) {
                Ok(_) => {}
                Err(PlanError::NoPath { target }) => debug!(agent = %id, target = %target, "no path"),
                Err(err) => warn!(agent = %id, error = %err, "planning failed"),
            }
        }

        let mut commands: Vec<MoveCommand> = Vec::new();
        pathing.run_resolution_for_all_zones(&world, &mut commands, &mut summary);
        world.apply_commands(&commands);
        world.advance();

        movers.retain(|id, mover| {
            let arrived = world
                .agent(*id)
                .and_then(|a| a.pos.range_to(&mover.target))
                .is_some_and(|range| range <= 1);
            if arrived {
                info!(agent = %id, tick = %world.time(), "arrived");
            }
            !arrived
        });
        if movers.is_empty() {
            break;
        }
    }

    let totals = &summary.totals;
    info!(
        ticks = summary.ticks,
        stranded = movers.len(),
        planned = totals.planned,
        recomputed = totals.recomputed,
        no_path = totals.no_path,
        pushed = totals.pushed,
        swapped = totals.swapped,
        rerouted = totals.rerouted,
        invalidated = totals.invalidated,
        polylines = drawn.borrow().len(),
        "corridor demo finished"
    );
    Ok(())
}
