//! Per-zone move queues.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;

use zp_core::{AgentId, Coord, ZoneName};

use crate::Move;

// ── MoveQueue ─────────────────────────────────────────────────────────────────

/// Moves of one zone, highest priority first, ties in arrival order.
#[derive(Clone, Debug, Default)]
pub struct MoveQueue {
    moves: Vec<Move>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert by priority, scanning from the tail past strictly lower
    /// priorities.  Returns the index the move landed at.
    pub fn insert(&mut self, mv: Move) -> usize {
        let mut at = self.moves.len();
        while at > 0 && self.moves[at - 1].priority < mv.priority {
            at -= 1;
        }
        self.moves.insert(at, mv);
        at
    }

    /// Insert directly behind `index`, regardless of priority.
    pub fn insert_after(&mut self, index: usize, mv: Move) {
        let at = (index + 1).min(self.moves.len());
        self.moves.insert(at, mv);
    }

    pub fn all(&self) -> &[Move] {
        &self.moves
    }

    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Move> {
        self.moves.get_mut(index)
    }

    /// `true` when some queued move lands on `at`.
    pub fn claims(&self, at: Coord) -> bool {
        self.moves.iter().any(|m| m.destination() == Some(at))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

// ── ZoneQueues ────────────────────────────────────────────────────────────────

/// All move queues of the current tick, plus who already has a move and
/// which zones were resolved.
///
/// Zones iterate in name order so a full resolution pass is reproducible.
#[derive(Debug, Default)]
pub struct ZoneQueues {
    queues:   BTreeMap<ZoneName, MoveQueue>,
    has_move: FxHashSet<AgentId>,
    resolved: BTreeSet<ZoneName>,
}

impl ZoneQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `mv` in `zone`.  Returns `false` (and drops it) when the agent
    /// already has a move this tick.
    pub fn enqueue(&mut self, zone: &ZoneName, mv: Move) -> bool {
        if !self.has_move.insert(mv.agent) {
            return false;
        }
        self.queues.entry(zone.clone()).or_default().insert(mv);
        true
    }

    pub fn has_move(&self, agent: AgentId) -> bool {
        self.has_move.contains(&agent)
    }

    pub fn queue(&self, zone: &ZoneName) -> Option<&MoveQueue> {
        self.queues.get(zone)
    }

    /// Zones with a queue, in name order.
    pub fn zones(&self) -> Vec<ZoneName> {
        self.queues.keys().cloned().collect()
    }

    /// Record that `zone` was resolved.  Returns `false` if it already was.
    pub fn mark_resolved(&mut self, zone: &ZoneName) -> bool {
        self.resolved.insert(zone.clone())
    }

    pub fn is_resolved(&self, zone: &ZoneName) -> bool {
        self.resolved.contains(zone)
    }

    /// The zone's queue together with the has-move set, for the resolver.
    pub fn split_mut(&mut self, zone: &ZoneName) -> Option<(&mut MoveQueue, &mut FxHashSet<AgentId>)> {
        let queue = self.queues.get_mut(zone)?;
        Some((queue, &mut self.has_move))
    }

    /// Moves queued across all zones.
    pub fn total(&self) -> usize {
        self.queues.values().map(MoveQueue::len).sum()
    }

    /// Forget everything; called at the end of each tick.
    pub fn clear(&mut self) {
        self.queues.clear();
        self.has_move.clear();
        self.resolved.clear();
    }
}
