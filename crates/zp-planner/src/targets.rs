//! Edge-aware expansion of a ranged target.

use zp_core::{Coord, Pos, ZONE_MAX};
use zp_matrix::IMPASSABLE;
use zp_search::{SearchTarget, ZoneCosts};

/// Replace `(target, range)` by the walkable cells of its range ring when
/// the ring touches the zone edge.
///
/// The square of side `2·range + 1` around the target is clamped to
/// `1..=48` (or `0..=49` when `move_off_exit` is off).  If no clamping
/// happened the result is empty and the caller keeps the plain ranged
/// target.  Otherwise every cell on the clamped square's border whose cost
/// is below 255 becomes an exact (range 0) target.
pub fn ring_targets(target: &Pos, range: u8, move_off_exit: bool, costs: &ZoneCosts) -> Vec<SearchTarget> {
    let (low, high) = if move_off_exit { (1, i32::from(ZONE_MAX) - 1) } else { (0, i32::from(ZONE_MAX)) };
    let (x, y, r) = (i32::from(target.x()), i32::from(target.y()), i32::from(range));

    let min_x = (x - r).max(low);
    let max_x = (x + r).min(high);
    let min_y = (y - r).max(low);
    let max_y = (y + r).min(high);
    let clamped = min_x != x - r || max_x != x + r || min_y != y - r || max_y != y + r;
    if !clamped {
        return Vec::new();
    }

    let mut border = Vec::new();
    for cx in min_x..=max_x {
        border.push((cx, min_y));
        border.push((cx, max_y));
    }
    for cy in (min_y + 1)..max_y {
        border.push((min_x, cy));
        border.push((max_x, cy));
    }

    border
        .into_iter()
        .filter_map(|(cx, cy)| Coord::try_new(cx, cy))
        .filter(|&c| costs.cell_cost(c) < IMPASSABLE)
        .map(|c| SearchTarget::new(Pos::at(c, &target.zone), 0))
        .collect()
}
