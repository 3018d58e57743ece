use super::builder::MazeBuilder;
use crate::errors::MazeResult;

/// Depth-first walk with an explicit stack.
///
/// An empty stack before the fill completes means the remaining eligible
/// cells cannot be reached from the start, which is reported as a stall.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    if builder.is_fill_complete() {
        return Ok(());
    }
    let start = builder.pick_random_cell_to_link()?;
    builder.mark_connected(start);
    let mut stack = vec![start];

    loop {
        builder.check_progress()?;
        let Some(&top) = stack.last() else {
            return Err(builder.stuck(format!(
                "backtracked to an empty stack with {} cells still unconnected",
                builder.cells_to_connect_count()
            )));
        };

        match builder.pick_random_unconnected_neighbor(top) {
            Some(next) => {
                builder.connect(top, next)?;
                stack.push(next);
                if builder.is_fill_complete() {
                    break;
                }
            }
            None => {
                stack.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MazeError;
    use crate::maze::{GridSize, MazeGraph, Position, Zone, ZoneType};
    use crate::maze_generation::FillFactor;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_backtracker_spanning_tree() {
        let mut maze = MazeGraph::new(GridSize::new(10, 8), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(99));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        assert_eq!(maze.edge_count(), 79);
    }

    #[test]
    fn test_backtracker_full_height() {
        let mut maze = MazeGraph::new(GridSize::new(6, 6), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(
            &mut maze,
            FillFactor::FullHeight,
            Pcg64::seed_from_u64(13),
        );
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());

        let rows: Vec<i32> = maze
            .cells()
            .iter()
            .filter(|cell| cell.is_connected())
            .map(|cell| cell.position.y)
            .collect();
        assert_eq!(rows.iter().min(), Some(&0));
        assert_eq!(rows.iter().max(), Some(&5));
    }

    #[test]
    fn test_backtracker_stuck_on_split_maze() {
        let zones = vec![Zone::new(ZoneType::Fill, Position::new(2, 0), GridSize::new(1, 4))];
        let mut maze = MazeGraph::new(GridSize::new(5, 4), zones).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(31));
        let err = generate(&mut builder).unwrap_err();
        assert!(matches!(err, MazeError::GenerationStuck { .. }));
        // One half was carved before the stack ran dry
        let partial = MazeGraph::parse(err.partial_maze().unwrap()).unwrap();
        assert_eq!(partial.edge_count(), 7);
    }
}
