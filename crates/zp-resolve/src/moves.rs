use zp_core::{AgentId, Coord, Direction};

/// One agent's movement intent for the current tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub agent:     AgentId,
    /// The agent's cell when the move was queued.
    pub from:      Coord,
    pub direction: Direction,
    pub priority:  i32,
    /// Synthesized by the resolver to clear the way for another agent.
    pub pushed:    bool,
    /// The planner expects the destination to be obstructed.
    pub blocked:   bool,
    /// Destination once resolved; `from + direction` until then.
    pub dest:      Option<Coord>,
    /// Last cell of the agent's current path inside this zone.
    pub path_end:  Option<Coord>,
}

impl Move {
    pub fn new(agent: AgentId, from: Coord, direction: Direction, priority: i32) -> Self {
        Self {
            agent,
            from,
            direction,
            priority,
            pushed: false,
            blocked: false,
            dest: None,
            path_end: None,
        }
    }

    /// A resolver-made move that sends `agent` from `from` to `to`.
    pub fn pushed(agent: AgentId, from: Coord, to: Coord, direction: Direction, priority: i32) -> Self {
        Self {
            pushed: true,
            dest: Some(to),
            ..Self::new(agent, from, direction, priority)
        }
    }

    /// The cell this move lands on, `None` when it would leave the grid.
    #[inline]
    pub fn destination(&self) -> Option<Coord> {
        self.dest.or_else(|| self.from.offset(self.direction))
    }
}
