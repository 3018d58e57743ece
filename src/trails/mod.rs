pub mod dead_ends;

pub use dead_ends::{find_dead_ends, tag_dead_ends};

use crate::errors::{MazeError, MazeResult};
use crate::maze::{MazeGraph, Position};
use pathfinding::prelude::dijkstra_all;
use std::collections::{BTreeMap, BTreeSet};

/// Hop distance from `source` to every cell reachable over links
pub fn distances_from(graph: &MazeGraph, source: usize) -> MazeResult<BTreeMap<usize, usize>> {
    if source >= graph.len() {
        return Err(MazeError::OutOfBounds {
            position: graph.position_of(source),
            size: graph.size(),
        });
    }
    let reached = dijkstra_all(&source, |&cell| {
        graph
            .cell(cell)
            .links()
            .iter()
            .map(|&link| (link, 1usize))
            .collect::<Vec<_>>()
    });

    let mut distances: BTreeMap<usize, usize> = reached
        .into_iter()
        .map(|(cell, (_, distance))| (cell, distance))
        .collect();
    distances.insert(source, 0);
    Ok(distances)
}

/// Shortest path from `start` to `end`, or `None` when they are not connected.
///
/// Walks back from `end` through the first link (in ascending index order) that
/// is one step closer to `start`.
pub fn solve(graph: &MazeGraph, start: usize, end: usize) -> MazeResult<Option<Vec<usize>>> {
    let distances = distances_from(graph, start)?;
    Ok(trace_back(graph, &distances, end))
}

/// Same as [`solve`] for grid positions
pub fn solve_positions(
    graph: &MazeGraph,
    start: Position,
    end: Position,
) -> MazeResult<Option<Vec<Position>>> {
    let path = solve(graph, graph.index_of(start)?, graph.index_of(end)?)?;
    Ok(path.map(|cells| cells.into_iter().map(|cell| graph.position_of(cell)).collect()))
}

fn trace_back(
    graph: &MazeGraph,
    distances: &BTreeMap<usize, usize>,
    end: usize,
) -> Option<Vec<usize>> {
    let mut current = end;
    let mut distance = *distances.get(&end)?;
    let mut path = vec![end];
    while distance > 0 {
        current = graph
            .cell(current)
            .links()
            .iter()
            .copied()
            .find(|link| distances.get(link) == Some(&(distance - 1)))?;
        distance -= 1;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Farthest cell in a distance map, lowest index on ties
fn farthest(distances: &BTreeMap<usize, usize>) -> Option<(usize, usize)> {
    distances
        .iter()
        .fold(None, |best, (&cell, &distance)| match best {
            Some((_, best_distance)) if best_distance >= distance => best,
            _ => Some((cell, distance)),
        })
}

/// Longest trail by double sweep: farthest cell from any cell, then the
/// farthest cell from that one. Exact on trees; on graphs with loops the
/// result is a long trail but not necessarily the longest one.
///
/// Every linked component is swept and the longest trail overall wins.
pub fn find_longest_trail(graph: &MazeGraph) -> Vec<usize> {
    let mut swept = BTreeSet::new();
    let mut longest: Vec<usize> = Vec::new();

    for (index, cell) in graph.cells().iter().enumerate() {
        if !cell.is_connected() || swept.contains(&index) {
            continue;
        }
        let Ok(first) = distances_from(graph, index) else {
            continue;
        };
        swept.extend(first.keys().copied());

        let Some((from, _)) = farthest(&first) else {
            continue;
        };
        let Ok(second) = distances_from(graph, from) else {
            continue;
        };
        let Some((to, _)) = farthest(&second) else {
            continue;
        };
        if let Some(trail) = trace_back(graph, &second, to) {
            if trail.len() > longest.len() {
                longest = trail;
            }
        }
    }
    longest
}

/// Find the longest trail and tag its cells on the graph
pub fn tag_longest_trail(graph: &mut MazeGraph) -> Vec<usize> {
    let trail = find_longest_trail(graph);
    graph.mark_longest_trail(trail.clone());
    trail
}
