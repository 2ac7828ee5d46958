//! Host callbacks.
//!
//! Both hooks are optional.  Without a [`WorkingTargets`] provider the core
//! never biases routes around stationed workers and always swaps instead of
//! pushing; without a [`ZoneEnterHook`] zone crossings only cost the usual
//! one-tick pause.

use zp_core::{Pos, ZoneName};

use crate::AgentInfo;

/// A stationary task: the agent wants to stay within `range` of `pos`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingTarget {
    pub pos:      Pos,
    pub range:    u8,
    /// When set, only movers with a priority at most this value route around
    /// the worker.  `Some(0)` counts as unset.
    pub priority: Option<i32>,
}

impl WorkingTarget {
    pub fn new(pos: Pos, range: u8) -> Self {
        Self { pos, range, priority: None }
    }

    /// `true` when `at` is inside the working range.
    pub fn holds(&self, at: &Pos) -> bool {
        at.range_to(&self.pos).is_some_and(|r| r <= self.range)
    }

    /// `true` when a mover of `priority` must respect this worker.
    pub fn admits(&self, priority: i32) -> bool {
        self.priority.filter(|&gate| gate != 0).is_none_or(|gate| gate >= priority)
    }
}

/// Resolves an agent's current stationary assignment, if any.
pub trait WorkingTargets {
    fn working_target(&self, agent: &AgentInfo) -> Option<WorkingTarget>;
}

impl<F> WorkingTargets for F
where
    F: Fn(&AgentInfo) -> Option<WorkingTarget>,
{
    fn working_target(&self, agent: &AgentInfo) -> Option<WorkingTarget> {
        self(agent)
    }
}

/// Called when an agent is detected standing on the edge of a zone it just
/// entered.
pub trait ZoneEnterHook {
    fn on_zone_enter(&mut self, agent: &AgentInfo, zone: &ZoneName);
}

impl<F> ZoneEnterHook for F
where
    F: FnMut(&AgentInfo, &ZoneName),
{
    fn on_zone_enter(&mut self, agent: &AgentInfo, zone: &ZoneName) {
        self(agent, zone)
    }
}
