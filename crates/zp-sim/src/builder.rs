//! Fluent builder for constructing a [`Pathing`].

use zp_core::PathingConfig;
use zp_matrix::{CostMatrixCache, TerrainCache};
use zp_planner::{PathPlanner, PathVisualizer};
use zp_resolve::ZoneQueues;
use zp_search::PathSearch;
use zp_world::{WorkingTargets, ZoneEnterHook};

use crate::{Pathing, PathingResult, PathingStats};

/// Fluent builder for [`Pathing<S>`].
///
/// # Required inputs
///
/// - `S: PathSearch` — the search service (e.g. [`zp_search::ZoneAStar`])
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                      |
/// |-------------------------|------------------------------|
/// | `.config(c)`            | `PathingConfig::default()`   |
/// | `.zone_hook(h)`         | No process-wide hooks        |
/// | `.working_targets(w)`   | No agent has an assignment   |
/// | `.visualizer(v)`        | Nothing is drawn             |
///
/// # Example
///
/// ```rust,ignore
/// let mut pathing = PathingBuilder::new(ZoneAStar)
///     .config(config)
///     .working_targets(Box::new(assignments))
///     .build()?;
/// ```
pub struct PathingBuilder<S: PathSearch> {
    search:     S,
    config:     PathingConfig,
    zone_hooks: Vec<Box<dyn ZoneEnterHook>>,
    working:    Option<Box<dyn WorkingTargets>>,
    visualizer: Option<Box<dyn PathVisualizer>>,
}

impl<S: PathSearch> PathingBuilder<S> {
    pub fn new(search: S) -> Self {
        Self {
            search,
            config:     PathingConfig::default(),
            zone_hooks: Vec::new(),
            working:    None,
            visualizer: None,
        }
    }

    pub fn config(mut self, config: PathingConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a hook run for every agent detected entering a zone, after
    /// the per-call hook of `MoveOptions`.  Hooks run in registration order.
    pub fn zone_hook(mut self, hook: Box<dyn ZoneEnterHook>) -> Self {
        self.zone_hooks.push(hook);
        self
    }

    /// Supply the agents' stationary assignments, used by both the planner's
    /// working-agent overlay and the resolver's push rules.
    pub fn working_targets(mut self, working: Box<dyn WorkingTargets>) -> Self {
        self.working = Some(working);
        self
    }

    /// Surface that receives paths planned with `MoveOptions::visualize`.
    pub fn visualizer(mut self, visualizer: Box<dyn PathVisualizer>) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    /// Validate the configuration and size the caches from it.
    pub fn build(self) -> PathingResult<Pathing<S>> {
        self.config.validate()?;
        Ok(Pathing {
            terrain:    TerrainCache::new(self.config.terrain_cache_capacity),
            matrices:   CostMatrixCache::from_config(&self.config),
            queues:     ZoneQueues::new(),
            planner:    PathPlanner::new(self.search),
            zone_hooks: self.zone_hooks,
            working:    self.working,
            visualizer: self.visualizer,
            stats:      PathingStats::default(),
            config:     self.config,
        })
    }
}
