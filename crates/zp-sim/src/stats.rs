//! Per-tick counters.

use zp_planner::{PlanError, PlanOutcome, PlanResult};
use zp_resolve::ResolveReport;

/// What happened during one tick, across all zones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathingStats {
    /// Moves queued by the planner (blocked ones included).
    pub planned:     usize,
    /// Fresh searches run by the planner.
    pub recomputed:  usize,
    pub no_path:     usize,
    pub invalid:     usize,
    /// Moves queued flagged blocked.
    pub blocked:     usize,
    /// Plan calls for fatigued agents.
    pub resting:     usize,
    /// Directions committed by the resolver.
    pub committed:   usize,
    pub pushed:      usize,
    pub swapped:     usize,
    pub rerouted:    usize,
    pub unroutable:  usize,
    /// Zone matrices dropped because a move hit an unexpected obstacle.
    pub invalidated: usize,
}

impl PathingStats {
    /// Add `other`'s counters to these.
    pub fn absorb(&mut self, other: &PathingStats) {
        self.planned += other.planned;
        self.recomputed += other.recomputed;
        self.no_path += other.no_path;
        self.invalid += other.invalid;
        self.blocked += other.blocked;
        self.resting += other.resting;
        self.committed += other.committed;
        self.pushed += other.pushed;
        self.swapped += other.swapped;
        self.rerouted += other.rerouted;
        self.unroutable += other.unroutable;
        self.invalidated += other.invalidated;
    }

    pub(crate) fn record_plan(&mut self, result: &PlanResult<PlanOutcome>) {
        match result {
            Ok(PlanOutcome::Queued) => self.planned += 1,
            Ok(PlanOutcome::Blocked) => {
                self.planned += 1;
                self.blocked += 1;
            }
            Ok(PlanOutcome::Resting) => self.resting += 1,
            Err(PlanError::NoPath { .. }) => self.no_path += 1,
            Err(PlanError::InvalidTarget) => self.invalid += 1,
            Err(_) => {}
        }
    }

    pub(crate) fn record_resolution(&mut self, report: &ResolveReport) {
        self.committed += report.committed;
        self.pushed += report.pushed;
        self.swapped += report.swapped;
        self.rerouted += report.rerouted;
        self.unroutable += report.unroutable;
        self.invalidated += report.invalidated;
    }
}
