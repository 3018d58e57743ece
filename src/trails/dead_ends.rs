use crate::maze::MazeGraph;

/// Connected cells with exactly one link
pub fn find_dead_ends(graph: &MazeGraph) -> Vec<usize> {
    graph
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.links().len() == 1)
        .map(|(index, _)| index)
        .collect()
}

pub fn tag_dead_ends(graph: &mut MazeGraph) -> Vec<usize> {
    let dead_ends = find_dead_ends(graph);
    graph.mark_dead_ends(dead_ends.clone());
    dead_ends
}
