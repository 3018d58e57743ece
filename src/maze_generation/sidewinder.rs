use super::builder::MazeBuilder;
use crate::errors::MazeResult;
use crate::maze::Position;
use rand::seq::SliceRandom;

/// Sweep rows west to east, either extending the current run east or closing
/// it by carving north from one of its members.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    let cells = builder.connectable_cells().to_vec();
    let states = builder.random_bytes(cells.len());
    let mut run: Vec<usize> = Vec::new();

    for (&cell, state) in cells.iter().zip(states) {
        run.push(cell);
        let east = builder.neighbor_in(cell, Position::EAST);

        if (east.is_none() || state % 2 == 0) && close_run(builder, &run, state)? {
            run.clear();
            continue;
        }

        match east {
            Some(east) => builder.connect(cell, east)?,
            None => {
                // Run ends here and nobody in it can carve north
                if !builder.graph().cell(cell).is_connected() {
                    if let Some(neighbor) = builder.pick_random_neighbor_to_link(cell) {
                        builder.connect(cell, neighbor)?;
                    }
                }
                run.clear();
            }
        }
    }
    Ok(())
}

/// Carve north from a run member, returns false when no member can
fn close_run(builder: &mut MazeBuilder, run: &[usize], state: u8) -> MazeResult<bool> {
    let member = run[state as usize % run.len()];
    if let Some(north) = builder.neighbor_in(member, Position::NORTH) {
        builder.connect(member, north)?;
        return Ok(true);
    }

    let candidates: Vec<(usize, usize)> = run
        .iter()
        .filter_map(|&member| {
            builder
                .neighbor_in(member, Position::NORTH)
                .map(|north| (member, north))
        })
        .collect();
    match candidates.choose(builder.rng()) {
        Some(&(member, north)) => {
            builder.connect(member, north)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{GridSize, MazeGraph, Zone, ZoneType};
    use crate::maze_generation::FillFactor;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_sidewinder_spanning_tree() {
        let mut maze = MazeGraph::new(GridSize::new(7, 5), Vec::new()).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(11));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());
        assert_eq!(maze.edge_count(), 34);

        // Top row is one corridor
        for x in 0..6 {
            let index = maze.index_of(Position::new(x, 4)).unwrap();
            assert!(maze.are_linked(index, index + 1));
        }
    }

    #[test]
    fn test_sidewinder_around_fill() {
        let zones = vec![
            Zone::new(ZoneType::Fill, Position::new(2, 1), GridSize::new(2, 2)),
            Zone::new(ZoneType::Fill, Position::new(0, 4), GridSize::new(6, 1)),
        ];
        let mut maze = MazeGraph::new(GridSize::new(6, 5), zones).unwrap();
        let mut builder = MazeBuilder::new(&mut maze, FillFactor::Full, Pcg64::seed_from_u64(5));
        generate(&mut builder).unwrap();
        assert!(builder.is_fill_complete());

        for cell in maze.cells() {
            assert_eq!(cell.is_connected(), !cell.is_excluded());
        }
    }
}
