//! Zone-local weighted A*.
//!
//! # Scope
//!
//! The search never leaves the start zone.  Targets in other zones are
//! unreachable for it; when none of the targets lies in the start zone the
//! result is an empty, incomplete path.
//!
//! # Determinism
//!
//! Heap entries are ordered by `(f, h, d², index)` where `d²` is the squared
//! straight-line distance to the nearest target.  Among equal-cost routes
//! the one hugging the straight line wins, and the same input always yields
//! the same path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use zp_core::{Coord, Pos, ZONE_AREA};
use zp_matrix::IMPASSABLE;

use crate::costs::ZoneCostProvider;
use crate::search::{PathSearch, SearchOutcome, SearchParams, SearchTarget};
use crate::SearchError;

const NO_PARENT: u16 = u16::MAX;

/// Default [`PathSearch`]: weighted A* over one zone's 8-connected grid.
///
/// Step cost is the cost of the cell entered.  The heuristic is the
/// Chebyshev distance beyond each target's range times the cheapest terrain
/// step, scaled by `heuristic_weight`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoneAStar;

impl PathSearch for ZoneAStar {
    fn search(
        &self,
        start: &Pos,
        targets: &[SearchTarget],
        params: &SearchParams,
        provider: &mut dyn ZoneCostProvider,
    ) -> Result<SearchOutcome, SearchError> {
        let zone = &start.zone;
        let costs = provider
            .zone_costs(zone)
            .ok_or_else(|| SearchError::ZoneUnavailable(zone.clone()))?;

        let local: Vec<(Coord, u8)> = targets
            .iter()
            .filter(|t| &t.pos.zone == zone)
            .map(|t| (t.pos.coord, t.range))
            .collect();
        if local.is_empty() {
            return Ok(SearchOutcome { path: Vec::new(), incomplete: true, ops: 0 });
        }

        let unit = u32::from(params.costs.cheapest());
        let weight = params.heuristic_weight.max(0.0);
        let steps_left = |at: Coord| -> u32 {
            local
                .iter()
                .map(|&(c, range)| u32::from(at.range_to(c).saturating_sub(range)))
                .min()
                .unwrap_or(0)
        };
        let line_dist = |at: Coord| -> u32 {
            local
                .iter()
                .map(|&(c, _)| {
                    let dx = i32::from(at.x) - i32::from(c.x);
                    let dy = i32::from(at.y) - i32::from(c.y);
                    (dx * dx + dy * dy) as u32
                })
                .min()
                .unwrap_or(0)
        };
        // Scaled by 100 so fractional weights keep integer heap keys.
        let priority = |g: u32, h: u32| -> u32 {
            g * 100 + (h as f32 * weight * 100.0).round() as u32
        };

        let mut dist = vec![u32::MAX; ZONE_AREA];
        let mut parent = vec![NO_PARENT; ZONE_AREA];
        let mut heap: BinaryHeap<Reverse<(u32, u32, u32, u16)>> = BinaryHeap::new();

        let origin = start.coord;
        dist[origin.index()] = 0;
        let h0 = steps_left(origin) * unit;
        heap.push(Reverse((priority(0, h0), h0, line_dist(origin), origin.index() as u16)));

        // Closest node seen so far, by (h, g).
        let mut best = (h0, 0u32, origin);
        let mut ops = 0u32;
        let mut reached = None;

        while let Some(Reverse((f, h, _, index))) = heap.pop() {
            let at = Coord::from_index(usize::from(index));
            let g = dist[at.index()];
            // Skip stale heap entries.
            if f > priority(g, h) {
                continue;
            }
            if h == 0 {
                reached = Some(at);
                break;
            }
            if (h, g) < (best.0, best.1) {
                best = (h, g, at);
            }
            if ops >= params.max_ops {
                break;
            }
            ops += 1;

            for next in at.adjacent() {
                let step = costs.step_cost(next, &params.costs);
                if step == IMPASSABLE {
                    continue;
                }
                let cost = g + u32::from(step);
                if cost < dist[next.index()] {
                    dist[next.index()] = cost;
                    parent[next.index()] = index;
                    let hn = steps_left(next) * unit;
                    heap.push(Reverse((priority(cost, hn), hn, line_dist(next), next.index() as u16)));
                }
            }
        }

        let (end, incomplete) = match reached {
            Some(at) => (at, false),
            None => (best.2, true),
        };
        let path = unwind(&parent, origin, end)
            .into_iter()
            .map(|c| Pos::at(c, zone))
            .collect::<Vec<_>>();
        trace!(zone = %zone, from = %origin, to = %end, steps = path.len(), ops, incomplete, "zone search");
        Ok(SearchOutcome { path, incomplete, ops })
    }
}

/// Walk parents back from `end` to `origin`, excluding `origin`.
fn unwind(parent: &[u16], origin: Coord, end: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut cur = end;
    while cur != origin {
        path.push(cur);
        let up = parent[cur.index()];
        if up == NO_PARENT {
            break;
        }
        cur = Coord::from_index(usize::from(up));
    }
    path.reverse();
    path
}
