use rand::Rng;

/// Set of arena indices with O(1) insert, remove and uniform sampling
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    items: Vec<usize>,
    slots: Vec<Option<usize>>,
}

impl CellSet {
    pub fn insert(&mut self, cell: usize) -> bool {
        if cell >= self.slots.len() {
            self.slots.resize(cell + 1, None);
        }
        if self.slots[cell].is_some() {
            return false;
        }
        self.slots[cell] = Some(self.items.len());
        self.items.push(cell);
        true
    }

    pub fn remove(&mut self, cell: usize) -> bool {
        let Some(slot) = self.slots.get_mut(cell).and_then(Option::take) else {
            return false;
        };
        self.items.swap_remove(slot);
        if let Some(&moved) = self.items.get(slot) {
            self.slots[moved] = Some(slot);
        }
        true
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.slots.get(cell).is_some_and(Option::is_some)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Uniformly random member
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items[rng.gen_range(0..self.items.len())])
        }
    }
}

impl FromIterator<usize> for CellSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = CellSet::default();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}
