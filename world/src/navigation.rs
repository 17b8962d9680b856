//! Distance field builder used by the world crate.

use std::collections::VecDeque;

use lane_defense_core::{CellCoord, GridMap, NavigationFieldView, UNREACHABLE};

/// Dense hop-count grid seeded from the exit.
///
/// The field mirrors the map dimensions and stores the reverse breadth-first
/// search results that ground creeps descend. Distances default to
/// [`UNREACHABLE`] so callers can distinguish blocked cells from traversable
/// ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl NavigationField {
    /// Rebuilds the distances using a reverse breadth-first search.
    ///
    /// When the exit itself is blocked every cell stays unreachable.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: u32,
        height: u32,
        exit: CellCoord,
        mut is_blocked: F,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        let width_usize = width as usize;
        self.width = width;
        self.height = height;
        self.distances.clear();
        self.distances.resize(width_usize * height as usize, UNREACHABLE);

        if exit.column() >= width || exit.row() >= height || is_blocked(exit) {
            return;
        }
        let Some(exit_index) = index(width_usize, exit) else {
            return;
        };

        let mut queue = VecDeque::new();
        self.distances[exit_index] = 0;
        queue.push_back(exit);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(width_usize, cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in neighbors(cell, width, height) {
                let Some(slot) = index(width_usize, neighbor) else {
                    continue;
                };
                if self.distances[slot] != UNREACHABLE || is_blocked(neighbor) {
                    continue;
                }
                self.distances[slot] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Width of the field in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        index(width, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Borrows the field as a read-only view for systems.
    #[must_use]
    pub fn view(&self) -> NavigationFieldView<'_> {
        NavigationFieldView::new(&self.distances, self.width, self.height)
    }
}

/// Computes the distance field of a map for the provided occupancy.
///
/// Cliffs and occupied cells are impassable. The result is a pure function of
/// its inputs.
#[must_use]
pub fn compute_distances<F>(map: &GridMap, is_occupied: F) -> NavigationField
where
    F: Fn(CellCoord) -> bool,
{
    let mut field = NavigationField::default();
    field.rebuild_with(map.width(), map.height(), map.exit(), |cell| {
        is_occupied(cell) || !map.is_passable(cell)
    });
    field
}

/// Column and row steps in the order neighbours are expanded: +x, -x, +y, -y.
const STEPS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    STEPS.into_iter().filter_map(move |(dx, dy)| {
        let column = u32::try_from(i64::from(cell.column()) + dx).ok()?;
        let row = u32::try_from(i64::from(cell.row()) + dy).ok()?;
        (column < width && row < height).then(|| CellCoord::new(column, row))
    })
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
