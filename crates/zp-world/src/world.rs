//! Contracts the host world implements.
//!
//! # Read side
//!
//! [`TerrainSource`] hands out raw per-zone terrain once per zone; [`World`]
//! answers occupancy, structure and agent queries for the current tick.  All
//! queries are snapshot reads: nothing the core commits becomes visible until
//! the host advances the tick.
//!
//! # Write side
//!
//! [`MoveSink`] receives exactly one direction per resolved move.  Whether
//! the agent actually moves is the engine's business.

use zp_core::{AgentId, Coord, Direction, Pos, Tick, ZONE_AREA, ZoneName};

/// Raw terrain bit set for wall cells.
pub const TERRAIN_MASK_WALL: u8 = 1;

/// Raw terrain bit set for swamp cells.
pub const TERRAIN_MASK_SWAMP: u8 = 2;

/// One bitmask byte per cell, row-major, 50×50.
pub type RawTerrain = Box<[u8; ZONE_AREA]>;

/// Source of static terrain.  Terrain never changes once read.
pub trait TerrainSource {
    /// Raw terrain for `zone`, or `None` if the zone does not exist.
    fn raw_terrain(&self, zone: &ZoneName) -> Option<RawTerrain>;
}

// ── Agents ────────────────────────────────────────────────────────────────────

/// Body class of an agent.  Elevated agents never tire and are looked up
/// separately by the engine, but otherwise occupy cells like anyone else.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum AgentClass {
    Regular,
    Elevated,
}

/// Snapshot of an agent as seen this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentInfo {
    pub id:         AgentId,
    pub pos:        Pos,
    /// Non-zero while the agent cannot act.
    pub fatigue:    u32,
    /// `true` for agents under the acting side's control.
    pub controlled: bool,
    pub class:      AgentClass,
}

impl AgentInfo {
    #[inline]
    pub fn is_fatigued(&self) -> bool {
        self.fatigue > 0
    }
}

// ── Structures ────────────────────────────────────────────────────────────────

/// Structure types the cost model distinguishes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StructureKind {
    Road,
    Container,
    Rampart,
    /// Player-built wall (not terrain).
    Barrier,
    Spawn,
    Extension,
    Tower,
    Storage,
    Link,
    Other,
}

impl StructureKind {
    /// Parse a lowercase structure name; unknown names map to `Other`.
    pub fn from_name(name: &str) -> StructureKind {
        match name {
            "road"      => StructureKind::Road,
            "container" => StructureKind::Container,
            "rampart"   => StructureKind::Rampart,
            "barrier"   => StructureKind::Barrier,
            "spawn"     => StructureKind::Spawn,
            "extension" => StructureKind::Extension,
            "tower"     => StructureKind::Tower,
            "storage"   => StructureKind::Storage,
            "link"      => StructureKind::Link,
            _ => StructureKind::Other,
        }
    }
}

/// A built structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub coord:  Coord,
    pub kind:   StructureKind,
    /// Owned by the acting side.
    pub owned:  bool,
    /// Open to everyone (only meaningful for ramparts).
    pub public: bool,
}

impl Structure {
    pub fn new(coord: Coord, kind: StructureKind) -> Self {
        Self { coord, kind, owned: false, public: false }
    }

    /// `true` when agents cannot stand on this structure.
    ///
    /// Roads and containers are walkable; a rampart only lets through its
    /// owner or everyone when public.
    pub fn blocks_movement(&self) -> bool {
        match self.kind {
            StructureKind::Road | StructureKind::Container => false,
            StructureKind::Rampart => !(self.owned || self.public),
            _ => true,
        }
    }
}

/// One of the acting side's unfinished construction sites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructionSite {
    pub coord: Coord,
    pub kind:  StructureKind,
}

impl ConstructionSite {
    /// Whether the finished structure will block movement.
    pub fn becomes_obstacle(&self) -> bool {
        !matches!(
            self.kind,
            StructureKind::Container | StructureKind::Road | StructureKind::Rampart
        )
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Read-only view of the simulated world for the current tick.
pub trait World: TerrainSource {
    /// Current tick.
    fn time(&self) -> Tick;

    /// Whether structures/agents of `zone` can be enumerated this tick.
    fn is_visible(&self, zone: &ZoneName) -> bool;

    /// Look up one agent.
    fn agent(&self, id: AgentId) -> Option<AgentInfo>;

    /// Every agent standing on `at`, controlled or not, any class.
    fn occupants_at(&self, zone: &ZoneName, at: Coord) -> Vec<AgentInfo>;

    /// Every agent within Chebyshev `radius` of `center`.
    fn agents_in_range(&self, zone: &ZoneName, center: Coord, radius: u8) -> Vec<AgentInfo>;

    /// Every controlled agent (both classes) currently in `zone`.
    fn controlled_agents(&self, zone: &ZoneName) -> Vec<AgentInfo>;

    /// Every built structure in `zone`.
    fn structures(&self, zone: &ZoneName) -> Vec<Structure>;

    /// The acting side's construction sites in `zone`.
    fn own_construction_sites(&self, zone: &ZoneName) -> Vec<ConstructionSite>;
}

// ── MoveSink ──────────────────────────────────────────────────────────────────

/// Movement commit primitive.
pub trait MoveSink {
    fn commit_direction(&mut self, agent: AgentId, direction: Direction);
}

/// A committed direction, as recorded by the `Vec` sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveCommand {
    pub agent:     AgentId,
    pub direction: Direction,
}

impl MoveSink for Vec<MoveCommand> {
    fn commit_direction(&mut self, agent: AgentId, direction: Direction) {
        self.push(MoveCommand { agent, direction });
    }
}
