//! Observer trait for per-zone and per-tick reporting.

use zp_core::{Tick, ZoneName};
use zp_resolve::ResolveReport;

use crate::PathingStats;

/// Callbacks invoked by [`Pathing`][crate::Pathing] at resolution and tick
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — conflict logger
///
/// ```rust,ignore
/// struct Conflicts(usize);
///
/// impl PathingObserver for Conflicts {
///     fn on_zone_resolved(&mut self, _zone: &ZoneName, report: &ResolveReport) {
///         self.0 += report.pushed + report.swapped + report.rerouted;
///     }
/// }
/// ```
pub trait PathingObserver {
    /// Called after one zone's queue was resolved.
    fn on_zone_resolved(&mut self, _zone: &ZoneName, _report: &ResolveReport) {}

    /// Called once per tick from `end_tick`, before the counters reset.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &PathingStats) {}
}

/// A [`PathingObserver`] that does nothing.
pub struct NoopObserver;

impl PathingObserver for NoopObserver {}
