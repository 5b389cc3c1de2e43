use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tileworld_common::NavGrid;

/// Default movement directions: 4 orthogonal then 4 diagonal.
pub const DEFAULT_NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

type Pos = (i32, i32);

/// Frontier entry ordered by `f`, then `h` (prefer nodes closer to the goal),
/// then insertion order for determinism.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: u32,
    h: u32,
    seq: u64,
    pos: Pos,
}

/// Chebyshev distance: admissible when diagonal and orthogonal steps cost
/// the same.
fn heuristic(a: Pos, b: Pos) -> u32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs()) as u32
}

/// A* over a nav grid with the default 8-direction neighborhood, unweighted.
///
/// Returns the tile path from `start` to `goal` inclusive, or `None` when no
/// path exists.
pub fn a_star(grid: &NavGrid, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    a_star_with(grid, start, goal, &DEFAULT_NEIGHBOR_OFFSETS, false)
}

/// A* with a custom neighbor set and optional weighted mode.
///
/// Cell value 0 is impassable. In weighted mode the step cost is the
/// destination cell's value; otherwise every step costs 1. A diagonal step is
/// rejected when either orthogonal corner cell beside it is impassable, so
/// paths cannot squeeze through blocked corners. Stale frontier entries are
/// skipped on pop rather than removed eagerly.
pub fn a_star_with(
    grid: &NavGrid,
    start: Pos,
    goal: Pos,
    neighbor_offsets: &[(i32, i32)],
    weighted: bool,
) -> Option<Vec<Pos>> {
    let mut open = BinaryHeap::new();
    // Best known g and parent per coordinate.
    let mut best: HashMap<Pos, (u32, Option<Pos>)> = HashMap::new();
    let mut closed: HashSet<Pos> = HashSet::new();
    let mut seq: u64 = 0;

    let h0 = heuristic(start, goal);
    best.insert(start, (0, None));
    open.push(Reverse(OpenEntry {
        f: h0,
        h: h0,
        seq,
        pos: start,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let pos = entry.pos;
        if closed.contains(&pos) {
            continue;
        }
        let (g, _) = best[&pos];
        // Lazy deletion: a better path to this coordinate was recorded after
        // this entry was pushed.
        if entry.f - entry.h > g {
            continue;
        }

        if pos == goal {
            return Some(reconstruct(&best, pos));
        }
        closed.insert(pos);

        for &(dx, dy) in neighbor_offsets {
            let np = (pos.0 + dx, pos.1 + dy);
            // Outside the grid: routine pruning, not an error.
            let Some(value) = grid.get(np.0, np.1) else {
                continue;
            };
            if value == 0 {
                continue;
            }
            // A diagonal move must not cut past a blocked orthogonal corner.
            if dx != 0
                && dy != 0
                && (!grid.passable(pos.0 + dx, pos.1) || !grid.passable(pos.0, pos.1 + dy))
            {
                continue;
            }
            if closed.contains(&np) {
                continue;
            }

            let step = if weighted { value as u32 } else { 1 };
            let ng = g + step;
            if let Some(&(existing, _)) = best.get(&np) {
                if ng >= existing {
                    continue;
                }
            }
            best.insert(np, (ng, Some(pos)));
            let nh = heuristic(np, goal);
            seq += 1;
            open.push(Reverse(OpenEntry {
                f: ng + nh,
                h: nh,
                seq,
                pos: np,
            }));
        }
    }

    tracing::debug!(?start, ?goal, "frontier exhausted, no path");
    None
}

fn reconstruct(best: &HashMap<Pos, (u32, Option<Pos>)>, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&(_, Some(parent))) = best.get(&cursor) {
        path.push(parent);
        cursor = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of(rows: &[&[u8]]) -> NavGrid {
        NavGrid::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>())
    }

    fn open_grid(n: i32) -> NavGrid {
        NavGrid::filled(n, n, 1)
    }

    /// Every step in a path must be legal: adjacent, passable, and no
    /// diagonal past a blocked corner.
    fn assert_valid(grid: &NavGrid, path: &[(i32, i32)]) {
        for pair in path.windows(2) {
            let (dx, dy) = (pair[1].0 - pair[0].0, pair[1].1 - pair[0].1);
            assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0));
            assert!(grid.passable(pair[1].0, pair[1].1));
            if dx != 0 && dy != 0 {
                assert!(
                    grid.passable(pair[0].0 + dx, pair[0].1)
                        && grid.passable(pair[0].0, pair[0].1 + dy),
                    "corner cut at {:?} -> {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn open_grid_takes_the_diagonal() {
        let grid = open_grid(6);
        let path = a_star(&grid, (0, 0), (2, 2)).unwrap();
        assert_eq!(path, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn start_equals_goal() {
        let grid = open_grid(3);
        assert_eq!(a_star(&grid, (1, 1), (1, 1)).unwrap(), vec![(1, 1)]);
    }

    #[test]
    fn blocked_goal_returns_none() {
        let grid = grid_of(&[&[1, 1], &[1, 0]]);
        assert_eq!(a_star(&grid, (0, 0), (1, 1)), None);
    }

    #[test]
    fn walled_off_goal_returns_none_and_terminates() {
        let grid = grid_of(&[
            &[1, 1, 1, 1],
            &[1, 1, 1, 1],
            &[1, 1, 0, 0],
            &[1, 1, 0, 1],
        ]);
        assert_eq!(a_star(&grid, (0, 0), (3, 3)), None);
    }

    #[test]
    fn out_of_bounds_goal_returns_none() {
        let grid = open_grid(4);
        assert_eq!(a_star(&grid, (0, 0), (10, 10)), None);
    }

    #[test]
    fn corner_cut_is_rejected() {
        // The straight diagonal (0,0)->(1,1)->(2,0) would squeeze past the
        // blocked (1,0); the detour below the wall is mandatory.
        let grid = grid_of(&[
            &[1, 0, 1],
            &[1, 1, 1],
            &[1, 1, 1],
        ]);
        let path = a_star(&grid, (0, 0), (2, 0)).unwrap();
        assert_valid(&grid, &path);
        assert_eq!(path.len(), 5);
        assert!(!path.windows(2).any(|p| p[0] == (0, 0) && p[1] == (1, 1)));
    }

    #[test]
    fn orthogonal_only_offsets_are_respected() {
        let grid = open_grid(4);
        let orthogonal = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        let path = a_star_with(&grid, (0, 0), (2, 2), &orthogonal, false).unwrap();
        assert_eq!(path.len(), 5);
        for pair in path.windows(2) {
            let (dx, dy) = (pair[1].0 - pair[0].0, pair[1].1 - pair[0].1);
            assert!(dx == 0 || dy == 0);
        }
    }

    #[test]
    fn weighted_mode_minimizes_cost_not_steps() {
        // Direct middle row costs 9 per step; the top corridor costs 1.
        let grid = grid_of(&[
            &[1, 1, 1, 1, 1],
            &[1, 9, 9, 9, 1],
            &[1, 9, 9, 9, 1],
        ]);
        let path = a_star_with(
            &grid,
            (0, 2),
            (4, 2),
            &DEFAULT_NEIGHBOR_OFFSETS,
            true,
        )
        .unwrap();
        assert_valid(&grid, &path);
        // The cheap route climbs to the top row and back down.
        let cost: u32 = path[1..]
            .iter()
            .map(|&(x, y)| grid.get(x, y).unwrap() as u32)
            .sum();
        assert_eq!(cost, 6, "expected the cost-6 corridor, got {path:?}");
        assert!(path.contains(&(2, 0)));
    }

    #[test]
    fn unweighted_mode_ignores_cell_values() {
        let grid = grid_of(&[
            &[1, 1, 1, 1, 1],
            &[1, 9, 9, 9, 1],
            &[1, 9, 9, 9, 1],
        ]);
        let path = a_star(&grid, (0, 2), (4, 2)).unwrap();
        // Step count wins; the 9s are just as passable.
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn prefers_fewer_steps_around_an_obstacle() {
        let grid = grid_of(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 1, 1],
        ]);
        let path = a_star(&grid, (0, 1), (4, 1)).unwrap();
        assert_valid(&grid, &path);
        // Corner pruning forces the full walk over (or under) the wall.
        assert_eq!(path.len(), 7);
    }
}
