use super::builder::MazeBuilder;
use crate::errors::MazeResult;
use tracing::debug;

/// Unbiased random walk, linking each step that enters an unvisited cell.
pub fn generate(builder: &mut MazeBuilder) -> MazeResult<()> {
    if builder.is_fill_complete() {
        return Ok(());
    }
    let mut current = builder.pick_random_cell_to_link()?;
    builder.mark_connected(current);

    loop {
        builder.check_progress()?;

        // The walk cannot leave an isolated pocket, so jump once it is done
        if builder
            .group_of(current)
            .is_some_and(|group| builder.is_group_complete(group))
        {
            current = builder.pick_random_cell_to_link()?;
            builder.mark_connected(current);
            debug!("Walk restarted at {}", builder.graph().position_of(current));
            continue;
        }

        let Some(next) = builder.pick_random_neighbor_to_link(current) else {
            return Err(builder.stuck(format!(
                "cell {} has no connectable neighbors",
                builder.graph().position_of(current)
            )));
        };
        if !builder.is_connected(next) {
            builder.connect(current, next)?;
        }
        current = next;

        if builder.is_fill_complete() {
            break;
        }
    }
    Ok(())
}
