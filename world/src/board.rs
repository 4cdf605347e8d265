//! Authoritative board storage.

use std::collections::HashSet;

use farmstead_core::{BoardLayout, CellIndex, House};
use tracing::warn;

/// Fixed-size sequence of plot slots, each holding at most one house.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    layout: BoardLayout,
    slots: Vec<Option<House>>,
}

impl Board {
    /// Creates an empty board for the provided layout.
    pub(crate) fn new(layout: BoardLayout) -> Self {
        let capacity = usize::try_from(layout.total_cells()).unwrap_or(0);
        Self {
            layout,
            slots: vec![None; capacity],
        }
    }

    pub(crate) const fn layout(&self) -> BoardLayout {
        self.layout
    }

    /// Reports whether the cell holds a house. Out-of-range cells report
    /// unoccupied; callers range-check through the layout first.
    pub(crate) fn is_occupied(&self, cell: CellIndex) -> bool {
        self.index(cell)
            .map_or(false, |index| self.slots[index].is_some())
    }

    pub(crate) fn occupant(&self, cell: CellIndex) -> Option<&House> {
        self.index(cell).and_then(|index| self.slots[index].as_ref())
    }

    /// Writes a house into its slot.
    ///
    /// The caller must have validated range and vacancy through a prior
    /// transaction; the board only asserts.
    pub(crate) fn place(&mut self, house: House) {
        debug_assert!(self.layout.contains(house.cell), "cell out of range");
        debug_assert!(!self.is_occupied(house.cell), "cell already occupied");

        if let Some(index) = self.index(house.cell) {
            self.slots[index] = Some(house);
        }
    }

    /// Enumerates every cell without an occupant, recomputed on demand.
    pub(crate) fn free_cells(&self) -> Vec<CellIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| CellIndex::new(index as u32))
            .collect()
    }

    pub(crate) fn houses(&self) -> impl Iterator<Item = &House> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Replaces all slots from a freshly fetched authoritative list.
    ///
    /// Entries with out-of-range cells, duplicate cells or duplicate
    /// identifiers are skipped individually; the rest of the load proceeds.
    /// Returns how many houses were placed and how many were skipped.
    pub(crate) fn bulk_load(&mut self, houses: Vec<House>) -> (u32, u32) {
        self.slots.fill(None);

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut placed = 0;
        let mut skipped = 0;

        for house in houses {
            if !self.layout.contains(house.cell) {
                warn!(
                    id = house.id.as_str(),
                    cell = house.cell.get(),
                    "skipping house with out-of-range cell"
                );
                skipped += 1;
                continue;
            }
            if self.is_occupied(house.cell) {
                warn!(
                    id = house.id.as_str(),
                    cell = house.cell.get(),
                    "skipping house whose cell is already taken"
                );
                skipped += 1;
                continue;
            }
            if !seen_ids.insert(house.id.as_str().to_owned()) {
                warn!(id = house.id.as_str(), "skipping house with duplicate id");
                skipped += 1;
                continue;
            }

            self.place(house);
            placed += 1;
        }

        (placed, skipped)
    }

    fn index(&self, cell: CellIndex) -> Option<usize> {
        if self.layout.contains(cell) {
            usize::try_from(cell.get()).ok()
        } else {
            None
        }
    }
}
