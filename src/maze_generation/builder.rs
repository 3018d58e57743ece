use super::FillFactor;
use super::cell_set::CellSet;
use super::constants::MIN_WALK_BUDGET;
use crate::errors::{MazeError, MazeResult};
use crate::maze::{MazeGraph, Position, ZoneId, ZoneType};
use pathfinding::prelude::connected_components;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg64;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct HallEntrances {
    zone: ZoneId,
    walk_ins: Vec<usize>,
}

/// Generation session over a maze graph.
///
/// Tracks which cells may still be picked, which are already connected, and
/// which should be picked first so caves and hall surroundings get stitched in
/// early. Algorithms touch the graph only through this type.
pub struct MazeBuilder<'a> {
    graph: &'a mut MazeGraph,
    fill_factor: FillFactor,
    rng: Pcg64,
    connectable: Vec<bool>,
    connectable_cells: Vec<usize>,
    cells_to_connect: CellSet,
    connected: Vec<bool>,
    connected_count: usize,
    /// Lowest and highest coordinates among connected cells
    span: Option<(Position, Position)>,
    priority: CellSet,
    priority_group: Vec<Option<usize>>,
    priority_groups: Vec<Vec<usize>>,
    cell_group: Vec<Option<usize>>,
    cell_groups: Vec<Vec<usize>>,
    group_remaining: Vec<usize>,
    halls: Vec<HallEntrances>,
    steps: u64,
    max_steps: u64,
}

impl<'a> MazeBuilder<'a> {
    pub fn new(graph: &'a mut MazeGraph, fill_factor: FillFactor, rng: Pcg64) -> Self {
        let len = graph.len();
        let mut connectable: Vec<bool> = (0..len)
            .map(|index| {
                !graph.cell(index).is_excluded()
                    && !graph.is_in_zone_type(index, ZoneType::Fill)
                    && !graph.is_in_zone_type(index, ZoneType::Hall)
            })
            .collect();

        let cell_groups = find_cell_groups(graph, &mut connectable);
        let mut cell_group = vec![None; len];
        for (group_id, group) in cell_groups.iter().enumerate() {
            for &index in group {
                cell_group[index] = Some(group_id);
            }
        }
        let group_remaining = cell_groups.iter().map(Vec::len).collect();

        let mut priority_group = vec![None; len];
        let mut priority_groups = Vec::new();
        let mut halls = Vec::new();
        for (zone_id, zone) in graph.zones().iter().enumerate() {
            let group: Vec<usize> = match zone.zone_type {
                ZoneType::Cave => graph
                    .zone_cells(zone_id)
                    .iter()
                    .copied()
                    .filter(|&index| connectable[index])
                    .collect(),
                ZoneType::Hall => {
                    let walk_ins = walk_in_cells(graph, zone_id, &connectable);
                    halls.push(HallEntrances {
                        zone: zone_id,
                        walk_ins: walk_ins.clone(),
                    });
                    walk_ins
                }
                _ => continue,
            };
            if group.is_empty() {
                continue;
            }
            // A cell in several groups keeps the last one
            for &index in &group {
                priority_group[index] = Some(priority_groups.len());
            }
            priority_groups.push(group);
        }
        let priority: CellSet = (0..len)
            .filter(|&index| priority_group[index].is_some())
            .collect();

        let connectable_cells: Vec<usize> = (0..len).filter(|&index| connectable[index]).collect();
        let cells_to_connect: CellSet = connectable_cells.iter().copied().collect();
        let max_steps = (len as u64).saturating_mul(len as u64).max(MIN_WALK_BUDGET);

        debug!(
            "Builder ready: {} connectable cells in {} groups, {} priority cells, {} halls",
            connectable_cells.len(),
            cell_groups.len(),
            priority.len(),
            halls.len()
        );

        Self {
            graph,
            fill_factor,
            rng,
            connectable,
            connectable_cells,
            cells_to_connect,
            connected: vec![false; len],
            connected_count: 0,
            span: None,
            priority,
            priority_group,
            priority_groups,
            cell_group,
            cell_groups,
            group_remaining,
            halls,
            steps: 0,
            max_steps,
        }
    }

    pub fn graph(&self) -> &MazeGraph {
        self.graph
    }

    pub fn fill_factor(&self) -> FillFactor {
        self.fill_factor
    }

    pub fn rng(&mut self) -> &mut Pcg64 {
        &mut self.rng
    }

    /// All connectable cells in ascending index order
    pub fn connectable_cells(&self) -> &[usize] {
        &self.connectable_cells
    }

    pub fn is_connectable(&self, cell: usize) -> bool {
        self.connectable.get(cell).copied().unwrap_or(false)
    }

    /// Marked connected during this session
    pub fn is_connected(&self, cell: usize) -> bool {
        self.connected.get(cell).copied().unwrap_or(false)
    }

    pub fn is_priority(&self, cell: usize) -> bool {
        self.priority.contains(cell)
    }

    pub fn are_linked(&self, a: usize, b: usize) -> bool {
        self.graph.are_linked(a, b)
    }

    pub fn cells_to_connect_count(&self) -> usize {
        self.cells_to_connect.len()
    }

    pub fn connected_count(&self) -> usize {
        self.connected_count
    }

    pub fn priority_count(&self) -> usize {
        self.priority.len()
    }

    /// Isolated pockets of connectable cells, each sorted, ordered by lowest index
    pub fn cell_groups(&self) -> &[Vec<usize>] {
        &self.cell_groups
    }

    pub fn group_of(&self, cell: usize) -> Option<usize> {
        self.cell_group.get(cell).copied().flatten()
    }

    /// Whether every cell of the group has been connected
    pub fn is_group_complete(&self, group: usize) -> bool {
        self.group_remaining.get(group).is_none_or(|&remaining| remaining == 0)
    }

    /// Connectable neighbor one step away in the given direction
    pub fn neighbor_in(&self, cell: usize, direction: Position) -> Option<usize> {
        let position = self.graph.position_of(cell) + direction;
        self.graph
            .size()
            .index_of(position)
            .filter(|&neighbor| self.connectable[neighbor])
    }

    /// One random byte per cell, drawn up front
    pub fn random_bytes(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.rng.gen_range(0..=u8::MAX)).collect()
    }

    /// Random unconnected cell, priority cells first
    pub fn pick_random_cell_to_link(&mut self) -> MazeResult<usize> {
        let pool = if self.priority.is_empty() {
            &self.cells_to_connect
        } else {
            &self.priority
        };
        pool.choose(&mut self.rng).ok_or(MazeError::NoEligibleCells)
    }

    /// Random connectable neighbor, connected or not, priority cells first
    pub fn pick_random_neighbor_to_link(&mut self, cell: usize) -> Option<usize> {
        self.pick_neighbor(cell, false, true)
    }

    /// Random neighbor that is still waiting to be connected, priority cells first
    pub fn pick_random_unconnected_neighbor(&mut self, cell: usize) -> Option<usize> {
        self.pick_neighbor(cell, true, true)
    }

    /// Uniformly random connectable neighbor. Walks that do not connect as they
    /// go would circle between adjacent priority cells, so priority is ignored.
    pub fn pick_random_walk_neighbor(&mut self, cell: usize) -> Option<usize> {
        self.pick_neighbor(cell, false, false)
    }

    fn pick_neighbor(
        &mut self,
        cell: usize,
        only_unconnected: bool,
        honor_priority: bool,
    ) -> Option<usize> {
        let neighbors = self.graph.cell(cell).neighbors();
        let mut candidates: Vec<usize> = if honor_priority {
            neighbors
                .iter()
                .copied()
                .filter(|&neighbor| self.priority.contains(neighbor))
                .collect()
        } else {
            Vec::new()
        };
        if candidates.is_empty() {
            candidates = neighbors
                .iter()
                .copied()
                .filter(|&neighbor| {
                    if only_unconnected {
                        self.cells_to_connect.contains(neighbor)
                    } else {
                        self.connectable[neighbor]
                    }
                })
                .collect();
        }
        candidates.choose(&mut self.rng).copied()
    }

    /// Link two adjacent cells and mark both as connected
    pub fn connect(&mut self, a: usize, b: usize) -> MazeResult<()> {
        for index in [a, b] {
            if self.graph.get_cell(index).is_some_and(|cell| cell.is_excluded()) {
                return Err(MazeError::CellExcluded {
                    position: self.graph.position_of(index),
                });
            }
        }
        self.graph.link(a, b)?;
        debug!(
            "Connected {} to {}",
            self.graph.position_of(a),
            self.graph.position_of(b)
        );
        self.mark_connected(a);
        self.mark_connected(b);
        Ok(())
    }

    /// Record a cell as part of the maze without linking it
    pub fn mark_connected(&mut self, cell: usize) {
        if let Some(group) = self.priority_group.get(cell).copied().flatten() {
            if self.priority.contains(cell) {
                for &member in &self.priority_groups[group] {
                    self.priority.remove(member);
                }
            }
        }
        if self.cells_to_connect.remove(cell) {
            if let Some(group) = self.cell_group[cell] {
                self.group_remaining[group] -= 1;
            }
        }
        if cell < self.connected.len() && !self.connected[cell] {
            self.connected[cell] = true;
            self.connected_count += 1;
            let p = self.graph.position_of(cell);
            self.span = Some(match self.span {
                None => (p, p),
                Some((low, high)) => (
                    Position::new(low.x.min(p.x), low.y.min(p.y)),
                    Position::new(high.x.max(p.x), high.y.max(p.y)),
                ),
            });
        }
    }

    /// Give every hall exactly one entrance from an already connected walk-in cell
    pub fn connect_halls(&mut self) -> MazeResult<()> {
        let halls = std::mem::take(&mut self.halls);
        for hall in &halls {
            let members = self.graph.zone_cells(hall.zone);
            let entrance_exists = hall.walk_ins.iter().any(|&walk_in| {
                self.graph
                    .cell(walk_in)
                    .links()
                    .iter()
                    .any(|link| members.binary_search(link).is_ok())
            });
            if entrance_exists {
                debug!("Hall {} already has an entrance", hall.zone);
                continue;
            }

            let visited: Vec<usize> = hall
                .walk_ins
                .iter()
                .copied()
                .filter(|&walk_in| self.connected[walk_in])
                .collect();
            let Some(&walkway) = visited.choose(&mut self.rng) else {
                if let Some(zone) = self.graph.zone(hall.zone) {
                    warn!("Hall {} has no visited entrance cells", zone);
                }
                continue;
            };
            let entrance = self
                .graph
                .cell(walkway)
                .neighbors()
                .iter()
                .copied()
                .find(|&n| members.binary_search(&n).is_ok() && !self.graph.cell(n).is_excluded());
            if let Some(entrance) = entrance {
                self.connect(walkway, entrance)?;
            }
        }
        self.halls = halls;
        Ok(())
    }

    /// Whether enough cells are connected for the configured fill factor
    pub fn is_fill_complete(&self) -> bool {
        if self.cells_to_connect.is_empty() {
            return true;
        }
        let Some((low, high)) = self.span else {
            return false;
        };
        let size = self.graph.size();
        match self.fill_factor {
            FillFactor::Full => false,
            FillFactor::FullWidth => low.x == 0 && high.x == size.width - 1,
            FillFactor::FullHeight => low.y == 0 && high.y == size.height - 1,
            FillFactor::Quarter
            | FillFactor::Half
            | FillFactor::ThreeQuarters
            | FillFactor::NinetyPercent => {
                let fraction = self.fill_factor.fraction().unwrap_or(1.0);
                self.cells_to_connect.len() as f64
                    <= self.connectable_cells.len() as f64 * (1.0 - fraction)
            }
        }
    }

    /// Count one walk step, failing once the walk budget is spent
    pub fn check_progress(&mut self) -> MazeResult<()> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(self.stuck(format!(
                "no progress after {} steps, {} of {} cells connected",
                self.max_steps,
                self.connected_count,
                self.connectable_cells.len()
            )));
        }
        Ok(())
    }

    /// Stall error carrying the partially built maze
    pub fn stuck(&self, reason: impl Into<String>) -> MazeError {
        MazeError::GenerationStuck {
            reason: reason.into(),
            partial_maze: self.graph.serialize(),
        }
    }
}

/// Split connectable cells into isolated pockets. Single-cell pockets can never
/// be linked, so they are dropped from the connectable set.
fn find_cell_groups(graph: &MazeGraph, connectable: &mut [bool]) -> Vec<Vec<usize>> {
    let starts: Vec<usize> = (0..graph.len()).filter(|&index| connectable[index]).collect();
    let components = connected_components(&starts, |&index| {
        graph
            .cell(index)
            .neighbors()
            .iter()
            .copied()
            .filter(|&neighbor| connectable[neighbor])
            .collect::<Vec<_>>()
    });

    let mut groups: Vec<Vec<usize>> = components
        .into_iter()
        .map(|component| {
            let mut group: Vec<usize> = component.into_iter().collect();
            group.sort_unstable();
            group
        })
        .collect();
    groups.sort_by_key(|group| group.first().copied());
    groups.retain(|group| {
        if group.len() > 1 {
            return true;
        }
        for &index in group {
            debug!("Cell {} has no connectable neighbors", graph.position_of(index));
            connectable[index] = false;
        }
        false
    });
    groups
}

/// Connectable cells just outside a hall that touch one of its included cells
fn walk_in_cells(graph: &MazeGraph, zone_id: ZoneId, connectable: &[bool]) -> Vec<usize> {
    let Some(zone) = graph.zone(zone_id) else {
        return Vec::new();
    };
    let members = graph.zone_cells(zone_id);
    let (columns, rows) = zone.clipped_span(graph.size(), 1);
    let mut walk_ins = Vec::new();
    for y in rows {
        for x in columns.clone() {
            let position = Position::new(x, y);
            let Some(index) = graph.size().index_of(position) else {
                continue;
            };
            if zone.contains(position) || !connectable[index] {
                continue;
            }
            let touches_hall = graph.cell(index).neighbors().iter().any(|&neighbor| {
                members.binary_search(&neighbor).is_ok() && !graph.cell(neighbor).is_excluded()
            });
            if touches_hall {
                walk_ins.push(index);
            }
        }
    }
    walk_ins
}
