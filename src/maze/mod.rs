pub mod cell;
pub mod coordinates;
pub mod serialization;
pub mod zones;

pub use cell::{Cell, CellAttribute};
pub use coordinates::{GridSize, Position};
pub use zones::{Zone, ZoneId, ZoneType};

use crate::errors::{MazeError, MazeResult};

/// A rectangular maze: the cell arena plus the zone registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGraph {
    size: GridSize,
    cells: Vec<Cell>,
    zones: Vec<Zone>,
    zone_cells: Vec<Vec<usize>>,
    dead_ends: Vec<usize>,
    longest_trail: Vec<usize>,
}

impl MazeGraph {
    /// Allocate every cell of the grid and register the given zones
    pub fn new(size: GridSize, zones: Vec<Zone>) -> MazeResult<Self> {
        let size = GridSize::validated(size.width, size.height)?;

        let cells = (0..size.area())
            .map(|index| {
                let position = size.position_of(index);
                // Direction order keeps neighbor indices ascending
                let neighbors = Position::DIRECTIONS
                    .iter()
                    .filter_map(|direction| size.index_of(position + *direction))
                    .collect();
                Cell::new(position, neighbors)
            })
            .collect();

        let mut graph = Self {
            size,
            cells,
            zones: Vec::new(),
            zone_cells: Vec::new(),
            dead_ends: Vec::new(),
            longest_trail: Vec::new(),
        };
        for zone in zones {
            graph.register_zone(zone);
        }
        graph.bake_exclusions();
        Ok(graph)
    }

    /// Register a zone after construction and re-apply exclusion rules
    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = self.register_zone(zone);
        self.bake_exclusions();
        id
    }

    fn register_zone(&mut self, zone: Zone) -> ZoneId {
        let id = self.zones.len();
        let members: Vec<usize> = zone
            .positions_within(self.size)
            .filter_map(|position| self.size.index_of(position))
            .collect();
        for &index in &members {
            self.cells[index].join_zone(id);
        }
        self.zones.push(zone);
        self.zone_cells.push(members);
        id
    }

    /// None zones exclude, any other zone re-includes, Fill always excludes
    fn bake_exclusions(&mut self) {
        let mut excluded = vec![false; self.cells.len()];
        let mut apply = |applies: &dyn Fn(ZoneType) -> bool, value: bool| {
            for (zone, members) in self.zones.iter().zip(&self.zone_cells) {
                if applies(zone.zone_type) {
                    for &index in members {
                        excluded[index] = value;
                    }
                }
            }
        };
        apply(&|t| t == ZoneType::None, true);
        apply(&|t| t != ZoneType::None, false);
        apply(&|t| t == ZoneType::Fill, true);

        for (cell, excluded) in self.cells.iter_mut().zip(excluded) {
            cell.set_excluded(excluded);
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell by arena index. Indices come from this graph, so out of range is a caller bug.
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn get_cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_at(&self, position: Position) -> MazeResult<&Cell> {
        let index = self.index_of(position)?;
        Ok(&self.cells[index])
    }

    pub fn index_of(&self, position: Position) -> MazeResult<usize> {
        self.size.index_of(position).ok_or(MazeError::OutOfBounds {
            position,
            size: self.size,
        })
    }

    pub fn position_of(&self, index: usize) -> Position {
        self.size.position_of(index)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Member cells of a zone in ascending index order
    pub fn zone_cells(&self, id: ZoneId) -> &[usize] {
        self.zone_cells.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_in_zone_type(&self, index: usize, zone_type: ZoneType) -> bool {
        self.cells[index]
            .zones()
            .iter()
            .any(|&id| self.zones[id].zone_type == zone_type)
    }

    fn checked_index(&self, index: usize) -> MazeResult<()> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                position: self.position_of(index),
                size: self.size,
            })
        }
    }

    /// Create a symmetric link between two adjacent cells
    pub fn link(&mut self, a: usize, b: usize) -> MazeResult<()> {
        self.checked_index(a)?;
        self.checked_index(b)?;
        let (from, to) = (self.position_of(a), self.position_of(b));
        if !self.cells[a].is_neighbor(b) {
            return Err(MazeError::NotAdjacent { from, to });
        }
        if self.cells[a].is_linked(b) {
            return Err(MazeError::AlreadyLinked { from, to });
        }
        self.cells[a].add_link(b);
        self.cells[b].add_link(a);
        Ok(())
    }

    pub fn are_linked(&self, a: usize, b: usize) -> bool {
        self.cells.get(a).is_some_and(|cell| cell.is_linked(b))
    }

    /// Every undirected edge once, lower index first
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(index, cell)| {
            cell.links()
                .iter()
                .filter(move |&&link| link > index)
                .map(move |&link| (index, link))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn connected_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_connected()).count()
    }

    /// Link every pair of adjacent included cells sharing a Hall or Cave zone
    pub fn merge_zone_interiors(&mut self) -> usize {
        let mut pending = Vec::new();
        for (zone, members) in self.zones.iter().zip(&self.zone_cells) {
            if !zone.zone_type.is_open_area() {
                continue;
            }
            for &index in members {
                let cell = &self.cells[index];
                if cell.is_excluded() {
                    continue;
                }
                for &neighbor in cell.neighbors() {
                    if neighbor > index
                        && !self.cells[neighbor].is_excluded()
                        && members.binary_search(&neighbor).is_ok()
                        && !cell.is_linked(neighbor)
                    {
                        pending.push((index, neighbor));
                    }
                }
            }
        }

        let mut merged = 0;
        for (a, b) in pending {
            // Overlapping open zones can queue the same pair twice
            if self.link(a, b).is_ok() {
                merged += 1;
            }
        }
        merged
    }

    pub fn dead_ends(&self) -> &[usize] {
        &self.dead_ends
    }

    pub fn longest_trail(&self) -> &[usize] {
        &self.longest_trail
    }

    pub(crate) fn mark_dead_ends(&mut self, dead_ends: Vec<usize>) {
        for cell in &mut self.cells {
            cell.clear_attribute(CellAttribute::DeadEnd);
        }
        for &index in &dead_ends {
            self.cells[index].set_attribute(CellAttribute::DeadEnd);
        }
        self.dead_ends = dead_ends;
    }

    pub(crate) fn mark_longest_trail(&mut self, trail: Vec<usize>) {
        for cell in &mut self.cells {
            cell.clear_attribute(CellAttribute::LongestTrail);
            cell.clear_attribute(CellAttribute::LongestTrailStart);
            cell.clear_attribute(CellAttribute::LongestTrailEnd);
        }
        for &index in &trail {
            self.cells[index].set_attribute(CellAttribute::LongestTrail);
        }
        if let (Some(&start), Some(&end)) = (trail.first(), trail.last()) {
            self.cells[start].set_attribute(CellAttribute::LongestTrailStart);
            self.cells[end].set_attribute(CellAttribute::LongestTrailEnd);
        }
        self.longest_trail = trail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(zone_type: ZoneType, x: i32, y: i32, w: i32, h: i32) -> Zone {
        Zone::new(zone_type, Position::new(x, y), GridSize::new(w, h))
    }

    #[test]
    fn test_new_builds_neighbors() {
        let graph = MazeGraph::new(GridSize::new(3, 2), Vec::new()).unwrap();
        assert_eq!(graph.len(), 6);
        // (0,0) corner
        assert_eq!(graph.cell(0).neighbors(), &[1, 3]);
        // (1,0) bottom edge
        assert_eq!(graph.cell(1).neighbors(), &[0, 2, 4]);
        // (1,1) top edge
        assert_eq!(graph.cell(4).neighbors(), &[1, 3, 5]);
        assert_eq!(graph.cell_at(Position::new(2, 1)).unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(matches!(
            MazeGraph::new(GridSize::new(0, 4), Vec::new()),
            Err(MazeError::InvalidSize { .. })
        ));
        assert!(MazeGraph::new(GridSize::new(3, -1), Vec::new()).is_err());
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let graph = MazeGraph::new(GridSize::new(2, 2), Vec::new()).unwrap();
        assert!(matches!(
            graph.cell_at(Position::new(2, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_link_contract() {
        let mut graph = MazeGraph::new(GridSize::new(3, 3), Vec::new()).unwrap();
        graph.link(0, 1).unwrap();
        assert!(graph.are_linked(0, 1));
        assert!(graph.are_linked(1, 0));

        assert!(matches!(graph.link(1, 0), Err(MazeError::AlreadyLinked { .. })));
        assert!(matches!(graph.link(0, 0), Err(MazeError::NotAdjacent { .. })));
        assert!(matches!(graph.link(0, 4), Err(MazeError::NotAdjacent { .. })));
        // Row wrap is not adjacency
        assert!(matches!(graph.link(2, 3), Err(MazeError::NotAdjacent { .. })));
        assert!(matches!(graph.link(0, 9), Err(MazeError::OutOfBounds { .. })));
    }

    #[test]
    fn test_exclusion_baking_order() {
        let zones = vec![
            zone(ZoneType::None, 0, 0, 4, 4),
            zone(ZoneType::Maze, 0, 0, 2, 2),
            zone(ZoneType::Fill, 1, 1, 2, 2),
        ];
        let graph = MazeGraph::new(GridSize::new(4, 4), zones).unwrap();
        let excluded = |x, y| graph.cell_at(Position::new(x, y)).unwrap().is_excluded();

        // Only claimed by the None zone
        assert!(excluded(3, 0));
        // Re-included by the Maze zone
        assert!(!excluded(0, 0));
        assert!(!excluded(0, 1));
        // Fill wins over Maze
        assert!(excluded(1, 1));
        assert!(excluded(2, 2));
    }

    #[test]
    fn test_add_zone_updates_membership() {
        let mut graph = MazeGraph::new(GridSize::new(4, 4), Vec::new()).unwrap();
        let id = graph.add_zone(zone(ZoneType::Fill, 2, 2, 5, 5));
        // Clipped to the grid
        assert_eq!(graph.zone_cells(id), &[10, 11, 14, 15]);
        assert_eq!(graph.cell(15).zones(), &[id]);
        assert!(graph.cell(15).is_excluded());
        assert!(graph.is_in_zone_type(10, ZoneType::Fill));
        assert!(!graph.cell(0).is_excluded());
    }

    #[test]
    fn test_merge_zone_interiors() {
        let zones = vec![
            zone(ZoneType::Cave, 0, 0, 2, 2),
            zone(ZoneType::Fill, 3, 0, 1, 1),
        ];
        let mut graph = MazeGraph::new(GridSize::new(4, 3), zones).unwrap();
        graph.link(0, 1).unwrap();

        assert_eq!(graph.merge_zone_interiors(), 3);
        assert!(graph.are_linked(0, 4));
        assert!(graph.are_linked(1, 5));
        assert!(graph.are_linked(4, 5));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.merge_zone_interiors(), 0);
    }

    #[test]
    fn test_edges_listed_once() {
        let mut graph = MazeGraph::new(GridSize::new(2, 2), Vec::new()).unwrap();
        graph.link(0, 1).unwrap();
        graph.link(3, 1).unwrap();
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 3)]);
        assert_eq!(graph.connected_count(), 3);
    }
}
