//! Movement-core configuration.
//!
//! Every constant that shapes caching or conflict resolution lives here so a
//! host can load it from a file (see the `corridor` demo, which reads TOML)
//! instead of patching code.

use crate::{ZoneName, ZpError, ZpResult};

/// Tunables for caching, overlays and conflict resolution.
///
/// `Default` reproduces the reference behaviour; every field is documented
/// with the default value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathingConfig {
    /// Ticks a zone's cost-matrix entry stays valid.  Default: 50.
    pub matrix_ttl_ticks: u64,

    /// Distinct zones kept in the terrain cache before it is cleared wholesale.
    /// Default: 20.
    pub terrain_cache_capacity: usize,

    /// Zones kept in the cost-matrix cache; exceeding it clears the cache at
    /// the next tick boundary.  Default: 200.
    pub matrix_cache_capacity: usize,

    /// Overlay matrices kept per zone entry (one per layer combination).
    /// Default: 5.
    pub matrix_slots_per_zone: usize,

    /// Radius around a stalled agent in which foreign agents are marked
    /// impassable for the recompute.  Default: 2.
    pub hostile_avoid_radius: u8,

    /// Cost written on cells held by stationed friendly workers.  Default: 60.
    pub working_agent_cost: u8,

    /// Reroute tie-break weight per cell of distance to the path end.
    /// Default: 10.
    pub path_end_weight: u8,

    /// Extra cost for pushing an agent onto an exit cell.  Default: 10.
    pub push_exit_penalty: u8,

    /// Extra cost for pushing an agent out of its working range.  Default: 10.
    pub push_range_penalty: u8,

    /// Zones the search must never enter, for every caller.
    pub avoid_zones: Vec<ZoneName>,
}

impl Default for PathingConfig {
    fn default() -> Self {
        Self {
            matrix_ttl_ticks:       50,
            terrain_cache_capacity: 20,
            matrix_cache_capacity:  200,
            matrix_slots_per_zone:  5,
            hostile_avoid_radius:   2,
            working_agent_cost:     60,
            path_end_weight:        10,
            push_exit_penalty:      10,
            push_range_penalty:     10,
            avoid_zones:            Vec::new(),
        }
    }
}

impl PathingConfig {
    /// Reject configurations that would disable caching outright.
    pub fn validate(&self) -> ZpResult<()> {
        if self.matrix_ttl_ticks == 0 {
            return Err(ZpError::Config("matrix_ttl_ticks must be at least 1".into()));
        }
        if self.terrain_cache_capacity == 0 {
            return Err(ZpError::Config("terrain_cache_capacity must be at least 1".into()));
        }
        if self.matrix_cache_capacity == 0 {
            return Err(ZpError::Config("matrix_cache_capacity must be at least 1".into()));
        }
        if self.matrix_slots_per_zone == 0 {
            return Err(ZpError::Config("matrix_slots_per_zone must be at least 1".into()));
        }
        if self.working_agent_cost == 0 || self.working_agent_cost == u8::MAX {
            return Err(ZpError::Config(
                "working_agent_cost must raise cost without blocking (1..=254)".into(),
            ));
        }
        Ok(())
    }
}
