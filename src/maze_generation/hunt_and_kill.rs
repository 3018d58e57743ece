use super::builder::MazeBuilder;
use crate::errors::MazeResult;
use tracing::debug;

/// Random walk through unvisited cells; when walled in, hunt in raster order
/// for an unvisited cell next to the visited region and continue from there.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    if builder.is_fill_complete() {
        return Ok(());
    }
    let mut current = builder.pick_random_cell_to_link()?;
    builder.mark_connected(current);

    loop {
        builder.check_progress()?;

        if let Some(next) = builder.pick_random_unconnected_neighbor(current) {
            builder.connect(current, next)?;
            current = next;
        } else if let Some((cell, visited)) = hunt(builder) {
            builder.connect(cell, visited)?;
            current = cell;
        } else {
            // Nothing left next to the visited region: start over in another group
            current = builder.pick_random_cell_to_link()?;
            builder.mark_connected(current);
            debug!("Hunt restarted at {}", builder.graph().position_of(current));
            continue;
        }

        if builder.is_fill_complete() {
            break;
        }
    }
    Ok(())
}

/// First unvisited cell with a visited neighbor, paired with that neighbor
fn hunt(builder: &MazeBuilder) -> Option<(usize, usize)> {
    builder
        .connectable_cells()
        .iter()
        .copied()
        .filter(|&cell| !builder.is_connected(cell))
        .find_map(|cell| {
            builder
                .graph()
                .cell(cell)
                .neighbors()
                .iter()
                .copied()
                .find(|&neighbor| builder.is_connectable(neighbor) && builder.is_connected(neighbor))
                .map(|neighbor| (cell, neighbor))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{GridSize, MazeGraph, Position, Zone, ZoneType};
    use crate::maze_generation::FillFactor;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_hunt_and_kill_spanning_tree() {
        let mut maze = MazeGraph::new(GridSize::new(9, 7), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(17));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        assert_eq!(maze.edge_count(), 62);
    }

    #[test]
    fn test_hunt_and_kill_restarts_in_other_group() {
        let zones = vec![Zone::new(ZoneType::Fill, Position::new(0, 2), GridSize::new(5, 1))];
        let mut maze = MazeGraph::new(GridSize::new(5, 5), zones).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(12));
        assert_eq!(builder.cell_groups().len(), 2);
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        assert_eq!(maze.edge_count(), 9 + 9);
    }

    #[test]
    fn test_hunt_finds_first_frontier_cell() {
        let mut maze = MazeGraph::new(GridSize::new(3, 3), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(0));
        builder.connect(4, 5).unwrap();
        // (1,0) is the first unvisited cell in raster order touching (1,1)
        assert_eq!(hunt(&builder), Some((1, 4)));
    }
}
