use super::builder::MazeBuilder;
use crate::errors::MazeResult;
use crate::maze::Position;

/// Link every cell north or east depending on a pre-drawn byte.
/// Cells with neither direction available fall back to any connectable neighbor.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    let cells = builder.connectable_cells().to_vec();
    let states = builder.random_bytes(cells.len());

    for (&cell, state) in cells.iter().zip(states) {
        let link_north = state % 2 == 0;
        let north = builder.neighbor_in(cell, Position::NORTH);
        let east = builder.neighbor_in(cell, Position::EAST);

        match (north, east) {
            (Some(north), _) if link_north || east.is_none() => builder.connect(cell, north)?,
            (_, Some(east)) => builder.connect(cell, east)?,
            _ => {
                if !builder.graph().cell(cell).is_connected() {
                    if let Some(neighbor) = builder.pick_random_neighbor_to_link(cell) {
                        builder.connect(cell, neighbor)?;
                    }
                }
            }
        }
    }
    Ok(())
}
