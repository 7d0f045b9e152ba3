//! A* pathfinding over an injected walkability predicate.
//!
//! The search is decoupled from `TileGrid`: any `Fn(i32, i32) -> bool`
//! works as the walkable test, so callers can path over raw boolean maps
//! or grid snapshots alike.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Safety bound on the number of finalized cells per search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1000;

fn manhattan(a: (i32, i32), b: (i32, i32)) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Find a path from `start` to `goal` over a 4-connected grid.
///
/// Unit step cost, Manhattan heuristic, frontier ordered by `(f, g)`.
/// The returned path includes both endpoints. An empty vec means either
/// "no path" or "invalid request" (unwalkable endpoint, exhausted search);
/// callers treat both as the same normal outcome.
pub fn find_path<F>(
    start: (i32, i32),
    goal: (i32, i32),
    walkable: F,
    max_expansions: usize,
) -> Vec<(i32, i32)>
where
    F: Fn(i32, i32) -> bool,
{
    if !walkable(start.0, start.1) || !walkable(goal.0, goal.1) {
        return Vec::new();
    }

    // Frontier entries are (f, g, cell); Reverse turns the max-heap into
    // a min-heap over that composite key.
    let mut frontier: BinaryHeap<Reverse<(u32, u32, (i32, i32))>> = BinaryHeap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut g_score: HashMap<(i32, i32), u32> = HashMap::new();
    let mut closed: HashSet<(i32, i32)> = HashSet::new();

    g_score.insert(start, 0);
    frontier.push(Reverse((manhattan(start, goal), 0, start)));

    while closed.len() < max_expansions {
        let Some(Reverse((_f, g, current))) = frontier.pop() else {
            break;
        };

        // Success the instant the goal is popped, not merely enqueued.
        if current == goal {
            return reconstruct(&came_from, current);
        }

        // A cell is finalized at most once.
        if !closed.insert(current) {
            continue;
        }

        for (dx, dy) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
            let next = (current.0 + dx, current.1 + dy);
            if closed.contains(&next) || !walkable(next.0, next.1) {
                continue;
            }
            let next_g = g + 1;
            if next_g < *g_score.get(&next).unwrap_or(&u32::MAX) {
                g_score.insert(next, next_g);
                came_from.insert(next, current);
                frontier.push(Reverse((next_g + manhattan(next, goal), next_g, next)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<(i32, i32), (i32, i32)>, goal: (i32, i32)) -> Vec<(i32, i32)> {
    let mut path = vec![goal];
    let mut node = goal;
    while let Some(&prev) = came_from.get(&node) {
        path.push(prev);
        node = prev;
    }
    path.reverse();
    path
}
