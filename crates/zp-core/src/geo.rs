//! Zone-local grid geometry.
//!
//! The world is split into fixed 50×50 zones.  Positions inside a zone are
//! [`Coord`]s; a [`Pos`] pairs a coordinate with the [`ZoneName`] it belongs
//! to.  Agents step in one of eight compass [`Direction`]s per tick.
//!
//! # Coordinate convention
//!
//! `x` grows to the east, `y` grows to the south.  Cells on row/column 0 or
//! 49 are *exit* cells: stepping off them moves an agent into the adjacent
//! zone.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Side length of a zone in cells.
pub const ZONE_SIZE: u8 = 50;

/// Largest valid coordinate on either axis.
pub const ZONE_MAX: u8 = ZONE_SIZE - 1;

/// Number of cells in a zone.
pub const ZONE_AREA: usize = ZONE_SIZE as usize * ZONE_SIZE as usize;

// ── ZoneName ──────────────────────────────────────────────────────────────────

/// Name of a zone.  Cheap to clone (shared `Arc<str>`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ZoneName(Arc<str>);

impl ZoneName {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ZoneName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&ZoneName> for ZoneName {
    fn from(name: &ZoneName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for ZoneName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ZoneName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Coord ─────────────────────────────────────────────────────────────────────

/// A cell inside one zone.  Both axes are always in `0..=49`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Construct a coordinate.  Callers guarantee `x, y <= 49`.
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x <= ZONE_MAX && y <= ZONE_MAX, "({x}, {y}) outside zone");
        Self { x, y }
    }

    /// Construct from signed components, `None` when off the grid.
    #[inline]
    pub fn try_new(x: i32, y: i32) -> Option<Self> {
        let max = i32::from(ZONE_MAX);
        if (0..=max).contains(&x) && (0..=max).contains(&y) {
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    /// Row-major offset into a 2500-cell grid.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.y) * usize::from(ZONE_SIZE) + usize::from(self.x)
    }

    /// Inverse of [`Coord::index`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        let size = usize::from(ZONE_SIZE);
        Self::new((index % size) as u8, (index / size) as u8)
    }

    /// `true` on the outermost ring of the zone.
    #[inline]
    pub fn is_exit(self) -> bool {
        self.x == 0 || self.y == 0 || self.x == ZONE_MAX || self.y == ZONE_MAX
    }

    /// Chebyshev distance (diagonal steps cost the same as straight ones).
    #[inline]
    pub fn range_to(self, other: Coord) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// `true` when `other` is one of the eight neighbours of `self`.
    #[inline]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.range_to(other) == 1
    }

    /// One step in `direction`, `None` when it would leave the zone.
    #[inline]
    pub fn offset(self, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.offset();
        Coord::try_new(i32::from(self.x) + i32::from(dx), i32::from(self.y) + i32::from(dy))
    }

    /// The up-to-eight in-bounds neighbours of this cell.
    #[inline]
    pub fn adjacent(self) -> Adjacent {
        Adjacent::new(self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Pos ───────────────────────────────────────────────────────────────────────

/// A cell in a named zone.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub coord: Coord,
    pub zone:  ZoneName,
}

impl Pos {
    pub fn new(x: u8, y: u8, zone: impl Into<ZoneName>) -> Self {
        Self { coord: Coord::new(x, y), zone: zone.into() }
    }

    pub fn at(coord: Coord, zone: impl Into<ZoneName>) -> Self {
        Self { coord, zone: zone.into() }
    }

    #[inline]
    pub fn x(&self) -> u8 {
        self.coord.x
    }

    #[inline]
    pub fn y(&self) -> u8 {
        self.coord.y
    }

    /// Chebyshev range to `other`, `None` across zones.
    pub fn range_to(&self, other: &Pos) -> Option<u8> {
        (self.zone == other.zone).then(|| self.coord.range_to(other.coord))
    }

    /// Direction of a single step from `self` to `other`.
    ///
    /// Steps across a zone edge are recognized: leaving column 49 lands on
    /// column 0 of the neighbouring zone (and vice versa; likewise for rows).
    pub fn direction_to(&self, other: &Pos) -> Option<Direction> {
        if self.zone == other.zone {
            return Direction::between(self.coord, other.coord);
        }
        let dx = edge_delta(self.coord.x, other.coord.x);
        let dy = edge_delta(self.coord.y, other.coord.y);
        Direction::from_delta(dx, dy)
    }
}

fn edge_delta(from: u8, to: u8) -> i32 {
    match (from, to) {
        (ZONE_MAX, 0) => 1,
        (0, ZONE_MAX) => -1,
        _ => i32::from(to) - i32::from(from),
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {},{}]", self.zone, self.coord.x, self.coord.y)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the eight compass steps, numbered clockwise from north as `1..=8`.
///
/// The numeric code doubles as the single-character symbol used in
/// serialized direction sequences (`'1'..='8'`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    North     = 1,
    NorthEast = 2,
    East      = 3,
    SouthEast = 4,
    South     = 5,
    SouthWest = 6,
    West      = 7,
    NorthWest = 8,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            1..=8 => Some(Self::ALL[usize::from(code - 1)]),
            _ => None,
        }
    }

    /// Serialized symbol, `'1'..='8'`.
    #[inline]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.code())
    }

    pub fn from_char(symbol: char) -> Option<Direction> {
        symbol
            .to_digit(10)
            .and_then(|digit| Self::from_code(digit as u8))
    }

    /// `(dx, dy)` of one step.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::North     => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East      => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South     => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West      => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The opposite direction (180° around the compass).
    #[inline]
    pub fn reverse(self) -> Direction {
        Self::ALL[usize::from((self.code() + 3) % 8)]
    }

    /// Direction for a unit step `(dx, dy)`; `None` for the null step or any
    /// component outside `-1..=1`.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1)  => Some(Direction::North),
            (1, -1)  => Some(Direction::NorthEast),
            (1, 0)   => Some(Direction::East),
            (1, 1)   => Some(Direction::SouthEast),
            (0, 1)   => Some(Direction::South),
            (-1, 1)  => Some(Direction::SouthWest),
            (-1, 0)  => Some(Direction::West),
            (-1, -1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// Direction of the single step from `from` to the adjacent `to`.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        Self::from_delta(
            i32::from(to.x) - i32::from(from.x),
            i32::from(to.y) - i32::from(from.y),
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ── Adjacent ──────────────────────────────────────────────────────────────────

/// Bounded iterator over the in-bounds neighbours of a cell.
///
/// Yields row by row (north row first, west to east), skipping the centre and
/// anything off the grid, so corner cells produce 3 items and edge cells 5.
/// The only state is the cursor; [`Adjacent::restart`] rewinds it.
#[derive(Clone, Debug)]
pub struct Adjacent {
    center: Coord,
    cursor: u8,
}

impl Adjacent {
    pub fn new(center: Coord) -> Self {
        Self { center, cursor: 0 }
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for Adjacent {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while self.cursor < 9 {
            let slot = self.cursor;
            self.cursor += 1;
            if slot == 4 {
                continue;
            }
            let dx = i32::from(slot % 3) - 1;
            let dy = i32::from(slot / 3) - 1;
            if let Some(cell) = Coord::try_new(
                i32::from(self.center.x) + dx,
                i32::from(self.center.y) + dy,
            ) {
                return Some(cell);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(9usize.saturating_sub(usize::from(self.cursor))))
    }
}
