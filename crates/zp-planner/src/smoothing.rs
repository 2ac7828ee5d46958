//! Path smoothing.

use zp_core::Pos;
use zp_search::ZoneCosts;

/// Pull one-step detours back onto cost-1 corridors.
///
/// Walking the part of `path` inside its first zone, whenever the costs of
/// three consecutive waypoints read (1, >1, 1) the middle waypoint is
/// replaced by the first cost-1 neighbour of the third that is also adjacent
/// to the first.  Costs are overlay-or-terrain values.
pub fn fix_path(path: &mut [Pos], costs: &ZoneCosts) {
    let Some(zone) = path.first().map(|p| p.zone.clone()) else { return };
    let mut seen: Vec<u8> = Vec::with_capacity(path.len());

    for i in 0..path.len() {
        if path[i].zone != zone {
            break;
        }
        let here = path[i].coord;
        let mut cost = costs.cell_cost(here);
        if i >= 2 && cost == 1 && seen[i - 1] != 1 && seen[i - 2] == 1 {
            let detour = path[i - 1].coord;
            let anchor = path[i - 2].coord;
            let shortcut = here
                .adjacent()
                .filter(|&c| c != detour && c != anchor && c.is_adjacent(anchor))
                .find(|&c| costs.cell_cost(c) == 1);
            if let Some(c) = shortcut {
                path[i - 1] = Pos::at(c, &zone);
                cost = 1;
            }
        }
        seen.push(cost);
    }
}
