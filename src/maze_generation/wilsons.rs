use super::builder::MazeBuilder;
use crate::errors::MazeResult;
use rand::seq::SliceRandom;
use tracing::debug;

/// Loop-erased random walks from unvisited cells until they hit the visited tree.
///
/// Each isolated cell group gets its own visited seed the first time a walk
/// starts inside it, so every walk has something to reach.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    let groups = builder.cell_groups().to_vec();
    let mut seeded = vec![false; groups.len()];

    while !builder.is_fill_complete() {
        let start = builder.pick_random_cell_to_link()?;
        if let Some(group) = builder.group_of(start) {
            if !seeded[group] {
                let others: Vec<usize> = groups[group]
                    .iter()
                    .copied()
                    .filter(|&cell| cell != start)
                    .collect();
                if let Some(&seed) = others.choose(builder.rng()) {
                    builder.mark_connected(seed);
                    debug!("Seeded cell group {} at {}", group, builder.graph().position_of(seed));
                }
                seeded[group] = true;
            }
        }

        let path = walk(builder, start)?;
        for step in path.windows(2) {
            builder.connect(step[0], step[1])?;
        }
    }
    Ok(())
}

/// Walk until a visited cell is reached, erasing loops as they form
fn walk(builder: &mut MazeBuilder, start: usize) -> MazeResult<Vec<usize>> {
    let mut path = vec![start];
    let mut current = start;
    loop {
        builder.check_progress()?;
        let Some(next) = builder.pick_random_walk_neighbor(current) else {
            return Err(builder.stuck(format!(
                "cell {} has no connectable neighbors",
                builder.graph().position_of(current)
            )));
        };
        if builder.is_connected(next) {
            path.push(next);
            return Ok(path);
        }
        match path.iter().position(|&cell| cell == next) {
            Some(index) => path.truncate(index + 1),
            None => path.push(next),
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{GridSize, MazeGraph, Position, Zone, ZoneType};
    use crate::maze_generation::FillFactor;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_wilsons_spanning_tree() {
        let mut maze = MazeGraph::new(GridSize::new(6, 5), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(21));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        assert_eq!(maze.edge_count(), 29);
        assert_eq!(maze.connected_count(), 30);
    }

    #[test]
    fn test_wilsons_with_caves_and_pockets() {
        let zones = vec![
            Zone::new(ZoneType::Fill, Position::new(4, 0), GridSize::new(1, 6)),
            Zone::new(ZoneType::Cave, Position::new(0, 0), GridSize::new(3, 3)),
        ];
        let mut maze = MazeGraph::new(GridSize::new(8, 6), zones).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(2));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        // Trees over 24 and 18 cells
        assert_eq!(maze.edge_count(), 23 + 17);
    }

    #[test]
    fn test_walk_erases_loops() {
        let mut maze = MazeGraph::new(GridSize::new(5, 5), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(6));
        builder.mark_connected(24);
        let path = walk(&mut builder, 0).unwrap();

        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&24));
        let mut unique = path.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), path.len());
        for step in path.windows(2) {
            assert!(builder.graph().cell(step[0]).is_neighbor(step[1]));
        }
    }
}
