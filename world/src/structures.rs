//! Authoritative structure storage and the per-cell index.

use std::collections::BTreeMap;

use lane_defense_core::{CellCoord, Structure, StructureId};

/// Registry that owns every structure and indexes them by cell.
///
/// Iteration follows identifier order, which is also placement order.
#[derive(Clone, Debug)]
pub(crate) struct StructureRegistry {
    entries: BTreeMap<StructureId, Structure>,
    by_cell: Vec<Option<StructureId>>,
    width: u32,
}

impl StructureRegistry {
    /// Creates an empty registry covering a `width` by `height` map.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            entries: BTreeMap::new(),
            by_cell: vec![None; width as usize * height as usize],
            width,
        }
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width {
            return None;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        (index < self.by_cell.len()).then_some(index)
    }

    /// Stores the structure and indexes its cell.
    pub(crate) fn insert(&mut self, structure: Structure) {
        if let Some(slot) = self.slot(structure.cell) {
            self.by_cell[slot] = Some(structure.id);
        }
        let _ = self.entries.insert(structure.id, structure);
    }

    /// Removes the structure and clears its cell.
    pub(crate) fn remove(&mut self, id: StructureId) -> Option<Structure> {
        let structure = self.entries.remove(&id)?;
        if let Some(slot) = self.slot(structure.cell) {
            self.by_cell[slot] = None;
        }
        Some(structure)
    }

    pub(crate) fn get(&self, id: StructureId) -> Option<&Structure> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the structure occupying the cell.
    pub(crate) fn at(&self, cell: CellCoord) -> Option<StructureId> {
        self.slot(cell).and_then(|slot| self.by_cell[slot])
    }

    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.at(cell).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Structure> {
        self.entries.values_mut()
    }

    pub(crate) fn bank_count(&self) -> usize {
        self.entries.values().filter(|structure| structure.is_bank()).count()
    }
}
