//! Overlay layer selection.
//!
//! A [`LayerKey`] names which structure-derived layers an overlay carries.
//! Each zone entry in the matrix cache stores at most one matrix per key.
//! A request that selects no layer at all yields `None`: the caller reads
//! terrain costs directly and no overlay is built.

/// The inputs that decide which overlay a search needs and how it is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixOptions {
    pub ignore_structures: bool,
    pub ignore_tunnels:    bool,
    pub ignore_containers: bool,
    pub ignore_roads:      bool,
    /// Roads are usable but should not be preferred over plains.
    pub off_roads:         bool,
    pub plain_cost:        u8,
    pub swamp_cost:        u8,
    pub container_cost:    u8,
}

impl Default for MatrixOptions {
    /// Every layer honoured, on-road movement costs.
    fn default() -> Self {
        Self {
            ignore_structures: false,
            ignore_tunnels:    false,
            ignore_containers: false,
            ignore_roads:      false,
            off_roads:         false,
            plain_cost:        2,
            swamp_cost:        10,
            container_cost:    5,
        }
    }
}

impl MatrixOptions {
    /// Roads are laid over swamps only (they are otherwise ignored).
    #[inline]
    pub fn swamp_roads(&self) -> bool {
        self.swamp_cost > self.plain_cost
    }
}

/// How containers appear in the overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerLayer {
    Absent,
    Present,
    /// Containers are cheaper than plains for this caller.
    Preferred,
}

/// How roads appear in the overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoadLayer {
    Absent,
    Roads,
    OffRoads,
    SwampRoads,
}

/// One recognized overlay combination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerKey {
    pub structures: bool,
    pub tunnels:    bool,
    pub containers: ContainerLayer,
    pub roads:      RoadLayer,
}

impl LayerKey {
    /// Derive the key for `options`, or `None` when only terrain is needed.
    pub fn from_options(options: &MatrixOptions) -> Option<LayerKey> {
        let containers = if options.ignore_containers {
            ContainerLayer::Absent
        } else if options.container_cost < options.plain_cost {
            ContainerLayer::Preferred
        } else {
            ContainerLayer::Present
        };
        let roads = if options.off_roads {
            RoadLayer::OffRoads
        } else if !options.ignore_roads {
            RoadLayer::Roads
        } else if options.swamp_roads() {
            RoadLayer::SwampRoads
        } else {
            RoadLayer::Absent
        };
        let key = LayerKey {
            structures: !options.ignore_structures,
            tunnels: !options.ignore_tunnels,
            containers,
            roads,
        };
        (!key.is_terrain_only()).then_some(key)
    }

    pub fn is_terrain_only(&self) -> bool {
        !self.structures
            && !self.tunnels
            && self.containers == ContainerLayer::Absent
            && self.roads == RoadLayer::Absent
    }
}
