use crate::maze::coordinates::Position;
use crate::maze::zones::ZoneId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Navigation tags attached to cells after generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellAttribute {
    DeadEnd,
    LongestTrail,
    LongestTrailStart,
    LongestTrailEnd,
}

/// One grid cell of a maze. Neighbor and link lists hold arena indices in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    neighbors: Vec<usize>,
    links: Vec<usize>,
    zones: Vec<ZoneId>,
    excluded: bool,
    attributes: BTreeSet<CellAttribute>,
}

impl Cell {
    pub(crate) fn new(position: Position, neighbors: Vec<usize>) -> Self {
        Self {
            position,
            neighbors,
            links: Vec::new(),
            zones: Vec::new(),
            excluded: false,
            attributes: BTreeSet::new(),
        }
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn links(&self) -> &[usize] {
        &self.links
    }

    /// Zones this cell belongs to, in registration order
    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    pub fn is_neighbor(&self, index: usize) -> bool {
        self.neighbors.binary_search(&index).is_ok()
    }

    pub fn is_linked(&self, index: usize) -> bool {
        self.links.binary_search(&index).is_ok()
    }

    /// A cell is connected once it has at least one link
    pub fn is_connected(&self) -> bool {
        !self.links.is_empty()
    }

    /// Excluded cells never take part in generation
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn has_attribute(&self, attribute: CellAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = CellAttribute> + '_ {
        self.attributes.iter().copied()
    }

    pub(crate) fn add_link(&mut self, index: usize) -> bool {
        match self.links.binary_search(&index) {
            Ok(_) => false,
            Err(slot) => {
                self.links.insert(slot, index);
                true
            }
        }
    }

    pub(crate) fn join_zone(&mut self, zone: ZoneId) {
        if !self.zones.contains(&zone) {
            self.zones.push(zone);
        }
    }

    pub(crate) fn set_excluded(&mut self, excluded: bool) {
        self.excluded = excluded;
    }

    pub(crate) fn set_attribute(&mut self, attribute: CellAttribute) {
        self.attributes.insert(attribute);
    }

    pub(crate) fn clear_attribute(&mut self, attribute: CellAttribute) {
        self.attributes.remove(&attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_stay_sorted() {
        let mut cell = Cell::new(Position::new(1, 1), vec![1, 3, 5, 7]);
        assert!(cell.add_link(7));
        assert!(cell.add_link(1));
        assert!(cell.add_link(5));
        assert!(!cell.add_link(5));
        assert_eq!(cell.links(), &[1, 5, 7]);
        assert!(cell.is_connected());
    }

    #[test]
    fn test_attributes() {
        let mut cell = Cell::new(Position::default(), Vec::new());
        assert!(!cell.is_connected());
        cell.set_attribute(CellAttribute::DeadEnd);
        cell.set_attribute(CellAttribute::LongestTrail);
        assert!(cell.has_attribute(CellAttribute::DeadEnd));
        cell.clear_attribute(CellAttribute::DeadEnd);
        assert_eq!(
            cell.attributes().collect::<Vec<_>>(),
            vec![CellAttribute::LongestTrail]
        );
    }
}
