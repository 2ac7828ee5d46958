//! `MemoryWorld`: an in-memory world implementing every contract in
//! [`crate::world`].
//!
//! It is the fixture behind the workspace's tests and the `corridor` demo.
//! Besides answering queries it plays the engine's part: [`MemoryWorld::apply_commands`]
//! executes one tick's committed directions with the usual rules (walls and
//! blocking structures stop movement, a cell holds one agent, agents that
//! step out of each other's way, swaps included, all succeed).
//!
//! # Spatial index
//!
//! Each zone keeps an R-tree (via `rstar`) of agent positions, rebuilt after
//! every mutation.  Point and radius lookups are then logarithmic instead of
//! a scan over every agent.

use std::collections::{BTreeMap, BTreeSet};

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashSet;

use zp_core::{AgentId, Coord, Pos, Tick, ZONE_AREA, ZoneName};

use crate::world::{
    AgentInfo, ConstructionSite, MoveCommand, RawTerrain, Structure, StructureKind,
    TERRAIN_MASK_WALL, TerrainSource, World,
};
use crate::{WorldError, WorldResult};

// ── R-tree agent entry ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct AgentPoint {
    point: [i32; 2],
    id:    AgentId,
}

impl RTreeObject for AgentPoint {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentPoint {
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Zone state ────────────────────────────────────────────────────────────────

struct ZoneState {
    terrain:    RawTerrain,
    structures: Vec<Structure>,
    sites:      Vec<ConstructionSite>,
    visible:    bool,
    index:      RTree<AgentPoint>,
}

impl ZoneState {
    fn new() -> Self {
        Self {
            terrain:    Box::new([0; ZONE_AREA]),
            structures: Vec::new(),
            sites:      Vec::new(),
            visible:    true,
            index:      RTree::new(),
        }
    }

    /// Walls without a road (tunnel) and blocking structures stop movement.
    fn passable(&self, at: Coord) -> bool {
        let on_road = self
            .structures
            .iter()
            .any(|s| s.coord == at && s.kind == StructureKind::Road);
        if self.terrain[at.index()] & TERRAIN_MASK_WALL != 0 && !on_road {
            return false;
        }
        !self.structures.iter().any(|s| s.coord == at && s.blocks_movement())
    }
}

// ── MemoryWorld ───────────────────────────────────────────────────────────────

/// In-memory world with zones, agents, structures and a tick counter.
pub struct MemoryWorld {
    tick:   Tick,
    zones:  BTreeMap<ZoneName, ZoneState>,
    agents: BTreeMap<AgentId, AgentInfo>,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self {
            tick:   Tick::ZERO,
            zones:  BTreeMap::new(),
            agents: BTreeMap::new(),
        }
    }

    // ── Zones & terrain ───────────────────────────────────────────────────

    /// Add an all-plain, visible zone (no-op if it already exists).
    pub fn add_zone(&mut self, zone: impl Into<ZoneName>) -> &mut Self {
        self.zones.entry(zone.into()).or_insert_with(ZoneState::new);
        self
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &ZoneName> + '_ {
        self.zones.keys()
    }

    /// Overwrite one cell's raw terrain mask, creating the zone if needed.
    pub fn set_terrain(&mut self, zone: impl Into<ZoneName>, at: Coord, mask: u8) -> &mut Self {
        self.zone_mut(zone.into()).terrain[at.index()] = mask;
        self
    }

    /// Fill the inclusive rectangle `from..=to` with `mask`.
    pub fn fill_terrain(
        &mut self,
        zone: impl Into<ZoneName>,
        from: Coord,
        to:   Coord,
        mask: u8,
    ) -> &mut Self {
        let state = self.zone_mut(zone.into());
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                state.terrain[Coord::new(x, y).index()] = mask;
            }
        }
        self
    }

    pub fn set_visible(&mut self, zone: impl Into<ZoneName>, visible: bool) -> &mut Self {
        self.zone_mut(zone.into()).visible = visible;
        self
    }

    pub fn add_structure(&mut self, zone: impl Into<ZoneName>, structure: Structure) -> &mut Self {
        self.zone_mut(zone.into()).structures.push(structure);
        self
    }

    /// Remove every structure on `at`.
    pub fn clear_structures_at(&mut self, zone: &ZoneName, at: Coord) -> &mut Self {
        if let Some(state) = self.zones.get_mut(zone) {
            state.structures.retain(|s| s.coord != at);
        }
        self
    }

    pub fn add_construction_site(
        &mut self,
        zone: impl Into<ZoneName>,
        site: ConstructionSite,
    ) -> &mut Self {
        self.zone_mut(zone.into()).sites.push(site);
        self
    }

    fn zone_mut(&mut self, zone: ZoneName) -> &mut ZoneState {
        self.zones.entry(zone).or_insert_with(ZoneState::new)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Insert or replace an agent (creating its zone if needed).
    pub fn add_agent(&mut self, agent: AgentInfo) -> &mut Self {
        let zone = agent.pos.zone.clone();
        self.zone_mut(zone.clone());
        if let Some(previous) = self.agents.insert(agent.id, agent) {
            if previous.pos.zone != zone {
                self.reindex(&previous.pos.zone);
            }
        }
        self.reindex(&zone);
        self
    }

    pub fn remove_agent(&mut self, id: AgentId) -> WorldResult<AgentInfo> {
        let agent = self.agents.remove(&id).ok_or(WorldError::UnknownAgent(id))?;
        self.reindex(&agent.pos.zone);
        Ok(agent)
    }

    pub fn set_fatigue(&mut self, id: AgentId, fatigue: u32) -> WorldResult<()> {
        let agent = self.agents.get_mut(&id).ok_or(WorldError::UnknownAgent(id))?;
        agent.fatigue = fatigue;
        Ok(())
    }

    /// Teleport an agent, e.g. to simulate a zone crossing.
    pub fn place_agent(&mut self, id: AgentId, pos: Pos) -> WorldResult<()> {
        let agent = self.agents.get_mut(&id).ok_or(WorldError::UnknownAgent(id))?;
        let old_zone = std::mem::replace(&mut agent.pos, pos.clone()).zone;
        self.zone_mut(pos.zone.clone());
        self.reindex(&old_zone);
        if old_zone != pos.zone {
            self.reindex(&pos.zone);
        }
        Ok(())
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentInfo> + '_ {
        self.agents.values()
    }

    fn reindex(&mut self, zone: &ZoneName) {
        let points: Vec<AgentPoint> = self
            .agents
            .values()
            .filter(|a| &a.pos.zone == zone)
            .map(|a| AgentPoint {
                point: [i32::from(a.pos.x()), i32::from(a.pos.y())],
                id:    a.id,
            })
            .collect();
        if let Some(state) = self.zones.get_mut(zone) {
            state.index = RTree::bulk_load(points);
        }
    }

    fn infos<'a>(&self, ids: impl Iterator<Item = &'a AgentPoint>) -> Vec<AgentInfo> {
        let mut out: Vec<AgentInfo> = ids
            .filter_map(|p| self.agents.get(&p.id).cloned())
            .collect();
        out.sort_by_key(|a| a.id);
        out
    }

    // ── Clock & engine ────────────────────────────────────────────────────

    pub fn set_time(&mut self, tick: Tick) {
        self.tick = tick;
    }

    /// Advance the clock by one tick.
    pub fn advance(&mut self) {
        self.tick = self.tick.next();
    }

    /// Execute one tick of committed directions and return the agents that
    /// actually moved, in ascending id order.
    ///
    /// Rules: fatigued or unknown agents do not move; a step off the zone
    /// grid, into a wall or onto a blocking structure fails; when several
    /// agents claim one cell the earliest command wins; a step into an
    /// occupied cell succeeds only if the occupant itself moves away this
    /// tick (chains and swaps included).  A later command for the same agent
    /// replaces its earlier one.
    pub fn apply_commands(&mut self, commands: &[MoveCommand]) -> Vec<AgentId> {
        let mut latest: BTreeMap<AgentId, usize> = BTreeMap::new();
        for (order, cmd) in commands.iter().enumerate() {
            latest.insert(cmd.agent, order);
        }

        // (agent → destination) in command order.
        let mut ordered: Vec<(usize, AgentId, Pos)> = Vec::with_capacity(latest.len());
        for (&agent, &order) in &latest {
            let Some(info) = self.agents.get(&agent) else { continue };
            if info.is_fatigued() {
                continue;
            }
            let Some(dest) = info.pos.coord.offset(commands[order].direction) else { continue };
            let passable = self
                .zones
                .get(&info.pos.zone)
                .is_some_and(|z| z.passable(dest));
            if passable {
                ordered.push((order, agent, Pos::at(dest, info.pos.zone.clone())));
            }
        }
        ordered.sort_by_key(|(order, _, _)| *order);

        let mut claimed: FxHashSet<Pos> = FxHashSet::default();
        let mut moving: BTreeMap<AgentId, Pos> = BTreeMap::new();
        for (_, agent, dest) in ordered {
            if claimed.insert(dest.clone()) {
                moving.insert(agent, dest);
            }
        }

        // Drop movers whose destination stays occupied until nothing changes.
        loop {
            let mut stuck: BTreeSet<AgentId> = BTreeSet::new();
            for (&agent, dest) in &moving {
                let blocked = self.agents.values().any(|other| {
                    other.id != agent && other.pos == *dest && !moving.contains_key(&other.id)
                });
                if blocked {
                    stuck.insert(agent);
                }
            }
            if stuck.is_empty() {
                break;
            }
            moving.retain(|agent, _| !stuck.contains(agent));
        }

        let mut touched: BTreeSet<ZoneName> = BTreeSet::new();
        for (agent, dest) in &moving {
            if let Some(info) = self.agents.get_mut(agent) {
                touched.insert(info.pos.zone.clone());
                info.pos = dest.clone();
            }
        }
        for zone in &touched {
            self.reindex(zone);
        }
        moving.into_keys().collect()
    }
}

// ── Contracts ─────────────────────────────────────────────────────────────────

impl TerrainSource for MemoryWorld {
    fn raw_terrain(&self, zone: &ZoneName) -> Option<RawTerrain> {
        self.zones.get(zone).map(|z| z.terrain.clone())
    }
}

impl World for MemoryWorld {
    fn time(&self) -> Tick {
        self.tick
    }

    fn is_visible(&self, zone: &ZoneName) -> bool {
        self.zones.get(zone).is_some_and(|z| z.visible)
    }

    fn agent(&self, id: AgentId) -> Option<AgentInfo> {
        self.agents.get(&id).cloned()
    }

    fn occupants_at(&self, zone: &ZoneName, at: Coord) -> Vec<AgentInfo> {
        let Some(state) = self.zones.get(zone) else { return Vec::new() };
        self.infos(
            state
                .index
                .locate_all_at_point(&[i32::from(at.x), i32::from(at.y)]),
        )
    }

    fn agents_in_range(&self, zone: &ZoneName, center: Coord, radius: u8) -> Vec<AgentInfo> {
        let Some(state) = self.zones.get(zone) else { return Vec::new() };
        let (cx, cy, r) = (i32::from(center.x), i32::from(center.y), i32::from(radius));
        let envelope = AABB::from_corners([cx - r, cy - r], [cx + r, cy + r]);
        self.infos(state.index.locate_in_envelope(&envelope))
    }

    fn controlled_agents(&self, zone: &ZoneName) -> Vec<AgentInfo> {
        self.agents
            .values()
            .filter(|a| a.controlled && &a.pos.zone == zone)
            .cloned()
            .collect()
    }

    fn structures(&self, zone: &ZoneName) -> Vec<Structure> {
        self.zones
            .get(zone)
            .filter(|z| z.visible)
            .map(|z| z.structures.clone())
            .unwrap_or_default()
    }

    fn own_construction_sites(&self, zone: &ZoneName) -> Vec<ConstructionSite> {
        self.zones
            .get(zone)
            .filter(|z| z.visible)
            .map(|z| z.sites.clone())
            .unwrap_or_default()
    }
}
