//! Direction-coded paths.

use std::collections::VecDeque;
use std::fmt;

use zp_core::{Coord, Direction, Pos};

/// Remaining steps of a path, one compass direction per step.
///
/// Encoded for storage as one character `'1'..='8'` per step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionPath {
    steps: VecDeque<Direction>,
}

impl DirectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored direction string; `None` on any foreign character.
    pub fn decode(encoded: &str) -> Option<Self> {
        encoded
            .chars()
            .map(Direction::from_char)
            .collect::<Option<VecDeque<_>>>()
            .map(|steps| Self { steps })
    }

    pub fn encode(&self) -> String {
        self.steps.iter().map(|d| d.as_char()).collect()
    }

    pub fn push(&mut self, direction: Direction) {
        self.steps.push_back(direction);
    }

    pub fn first(&self) -> Option<Direction> {
        self.steps.front().copied()
    }

    /// Drop the leading step.
    pub fn advance(&mut self) -> Option<Direction> {
        self.steps.pop_front()
    }

    /// Cells visited when walking the path from `start`.  Stops early if a
    /// step would leave the zone grid.
    pub fn points(&self, start: Coord) -> Vec<Coord> {
        let mut points = Vec::with_capacity(self.steps.len());
        let mut at = start;
        for &direction in &self.steps {
            let Some(next) = at.offset(direction) else { break };
            points.push(next);
            at = next;
        }
        points
    }

    /// Where the path ends when walked from `start`.
    pub fn end_from(&self, start: Coord) -> Coord {
        self.points(start).last().copied().unwrap_or(start)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for DirectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Convert a search result into directions anchored at `start`.
///
/// Only the part of `path` inside the zone of its first position is kept.
/// Returns the directions and the last position they reach (`start` when
/// nothing was kept).
pub fn serialize_path(start: &Pos, path: &[Pos]) -> (DirectionPath, Pos) {
    let zone = path.first().map_or(&start.zone, |p| &p.zone);
    let mut directions = DirectionPath::new();
    let mut last = start.clone();
    for pos in path {
        if &pos.zone != zone {
            break;
        }
        let Some(direction) = last.direction_to(pos) else { break };
        directions.push(direction);
        last = pos.clone();
    }
    (directions, last)
}
