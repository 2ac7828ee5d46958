//! TTL-bounded cache of structure overlays.
//!
//! One entry per zone holds up to `slots_per_zone` matrices, one per
//! [`LayerKey`], and a single creation tick shared by all of them.  Once
//! `now >= created + ttl` the whole entry is replaced on the next lookup;
//! matrices are never patched in place.  Entries are handed out as
//! `Arc<CostMatrix>`, so two lookups with the same key inside the TTL window
//! return the same instance.
//!
//! The cache itself never evicts mid-tick.  The host calls
//! [`CostMatrixCache::maybe_evict_all`] once at each tick boundary.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use zp_core::{PathingConfig, Tick, ZoneName};
use zp_world::{StructureKind, World};

use crate::layer::{LayerKey, MatrixOptions};
use crate::matrix::{CostMatrix, IMPASSABLE};
use crate::terrain::{TerrainCache, TerrainGrid};
use crate::MatrixResult;

// ── Zone entry ────────────────────────────────────────────────────────────────

struct ZoneEntry {
    created: Tick,
    slots:   Vec<(LayerKey, Arc<CostMatrix>)>,
    /// Slot overwritten next when every slot is taken.
    victim:  usize,
}

impl ZoneEntry {
    fn new(created: Tick) -> Self {
        Self { created, slots: Vec::new(), victim: 0 }
    }

    fn find(&self, key: &LayerKey) -> Option<&Arc<CostMatrix>> {
        self.slots.iter().find(|(k, _)| k == key).map(|(_, m)| m)
    }

    fn store(&mut self, key: LayerKey, matrix: Arc<CostMatrix>, limit: usize) {
        if self.slots.len() < limit {
            self.slots.push((key, matrix));
        } else {
            let at = self.victim % self.slots.len();
            self.slots[at] = (key, matrix);
            self.victim = (at + 1) % self.slots.len();
        }
    }
}

// ── CostMatrixCache ───────────────────────────────────────────────────────────

pub struct CostMatrixCache {
    ttl:            u64,
    capacity:       usize,
    slots_per_zone: usize,
    entries:        FxHashMap<ZoneName, ZoneEntry>,
}

impl CostMatrixCache {
    pub fn new(ttl: u64, capacity: usize, slots_per_zone: usize) -> Self {
        Self {
            ttl: ttl.max(1),
            capacity,
            slots_per_zone: slots_per_zone.max(1),
            entries: FxHashMap::default(),
        }
    }

    pub fn from_config(config: &PathingConfig) -> Self {
        Self::new(
            config.matrix_ttl_ticks,
            config.matrix_cache_capacity,
            config.matrix_slots_per_zone,
        )
    }

    /// Overlay for `zone` under `options`.
    ///
    /// `Ok(None)` means either that `options` select terrain only or that the
    /// zone is not visible; in both cases the caller uses terrain costs.
    pub fn get<W>(
        &mut self,
        zone: &ZoneName,
        options: &MatrixOptions,
        world: &W,
        terrain: &mut TerrainCache,
    ) -> MatrixResult<Option<Arc<CostMatrix>>>
    where
        W: World + ?Sized,
    {
        let Some(key) = LayerKey::from_options(options) else {
            return Ok(None);
        };
        let now = world.time();
        let ttl = self.ttl;
        let entry = self
            .entries
            .entry(zone.clone())
            .or_insert_with(|| ZoneEntry::new(now));
        if now >= entry.created + ttl {
            trace!(zone = %zone, created = %entry.created, "cost matrices expired");
            *entry = ZoneEntry::new(now);
        }
        if let Some(matrix) = entry.find(&key) {
            return Ok(Some(Arc::clone(matrix)));
        }
        if !world.is_visible(zone) {
            return Ok(None);
        }

        let grid = terrain.get(zone, world)?;
        let matrix = Arc::new(build_structure_matrix(world, zone, &grid, options));
        debug!(zone = %zone, ?key, overrides = matrix.overrides().count(), "built cost matrix");
        entry.store(key, Arc::clone(&matrix), self.slots_per_zone);
        Ok(Some(matrix))
    }

    /// Drop the entry for `zone` (its overlays are suspected stale).
    pub fn invalidate(&mut self, zone: &ZoneName) {
        if self.entries.remove(zone).is_some() {
            debug!(zone = %zone, "cost matrices invalidated");
        }
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Clear everything if more than `capacity` zones are cached.  Returns
    /// `true` when the cache was cleared.
    pub fn maybe_evict_all(&mut self) -> bool {
        if self.entries.len() > self.capacity {
            debug!(zones = self.entries.len(), "cost matrix cache over capacity, clearing");
            self.entries.clear();
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Overlay builder ───────────────────────────────────────────────────────────

/// Build the structure overlay for one zone.
///
/// Rules per structure:
///
/// * road on a wall: 1 (tunnel) unless tunnels are ignored;
/// * other roads: the road cost (1, or 2 for off-road callers) when roads are
///   wanted or the road covers a swamp for a swamp-roads caller, and only if
///   the cell is still unset;
/// * container: 1 when the caller's container cost is at most 1, else 5,
///   unless containers are ignored;
/// * anything else blocks (255) unless structures are ignored, except a
///   rampart that is owned or public.
///
/// Own construction sites that will become obstacles are also marked 255
/// unless structures are ignored.
pub fn build_structure_matrix<W>(
    world: &W,
    zone: &ZoneName,
    terrain: &TerrainGrid,
    options: &MatrixOptions,
) -> CostMatrix
where
    W: World + ?Sized,
{
    let mut matrix = CostMatrix::new();
    let road_cost = if options.off_roads { 2 } else { 1 };
    let swamp_roads = options.swamp_roads();
    let container_cost = if options.container_cost <= 1 { 1 } else { 5 };

    let any_layer = !options.ignore_structures
        || !options.ignore_roads
        || !options.ignore_tunnels
        || !options.ignore_containers
        || swamp_roads;
    if !any_layer {
        return matrix;
    }

    for structure in world.structures(zone) {
        let at = structure.coord;
        match structure.kind {
            StructureKind::Road => {
                if !options.ignore_tunnels && terrain.is_wall(at) {
                    matrix.set(at, 1);
                } else if (!options.ignore_roads || (swamp_roads && terrain.is_swamp(at)))
                    && !matrix.is_set(at)
                {
                    matrix.set(at, road_cost);
                }
            }
            StructureKind::Container => {
                if !options.ignore_containers {
                    matrix.set(at, container_cost);
                }
            }
            _ => {
                if !options.ignore_structures && structure.blocks_movement() {
                    matrix.set(at, IMPASSABLE);
                }
            }
        }
    }

    if !options.ignore_structures {
        for site in world.own_construction_sites(zone) {
            if site.becomes_obstacle() {
                matrix.set(site.coord, IMPASSABLE);
            }
        }
    }
    matrix
}
