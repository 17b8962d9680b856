//! Immutable grid map and the fixed flight path derived from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, CellPoint};

/// Terrain of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Walkable ground.
    Ground,
    /// Impassable rock.
    Cliff,
}

/// Static properties of one map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapCell {
    /// Terrain of the cell.
    pub terrain: Terrain,
    /// Whether structures may be placed on the cell.
    pub buildable: bool,
}

impl MapCell {
    /// Buildable ground.
    pub const OPEN: MapCell = MapCell {
        terrain: Terrain::Ground,
        buildable: true,
    };
}

/// Errors raised while constructing a [`GridMap`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The map has no cells along one axis.
    #[error("map dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The cell buffer does not match the dimensions.
    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells provided.
        actual: usize,
    },
    /// A row of an ASCII layout has the wrong length.
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// An ASCII layout contains an unknown glyph.
    #[error("unknown map glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column index.
        column: usize,
        /// Zero-based row index.
        row: usize,
    },
    /// The spawn or exit is missing or defined more than once.
    #[error("map must define exactly one {0}")]
    Endpoint(&'static str),
    /// The spawn or exit lies outside the map or on a cliff.
    #[error("{0} must be ground inside the map")]
    InvalidEndpoint(&'static str),
    /// The spawn and exit share a cell.
    #[error("spawn and exit must differ")]
    SpawnIsExit,
}

/// Immutable rectangular map of a single game.
///
/// Deserialised maps pass through the same validation as [`GridMap::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridMapRaw")]
pub struct GridMap {
    width: u32,
    height: u32,
    cells: Vec<MapCell>,
    spawn: CellCoord,
    exit: CellCoord,
}

/// Unvalidated wire form of a [`GridMap`].
#[derive(Deserialize)]
struct GridMapRaw {
    width: u32,
    height: u32,
    cells: Vec<MapCell>,
    spawn: CellCoord,
    exit: CellCoord,
}

impl TryFrom<GridMapRaw> for GridMap {
    type Error = MapError;

    fn try_from(raw: GridMapRaw) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.cells, raw.spawn, raw.exit)
    }
}

impl GridMap {
    /// Width of the default lane map.
    pub const DEFAULT_WIDTH: u32 = 8;
    /// Height of the default lane map.
    pub const DEFAULT_HEIGHT: u32 = 15;

    /// Creates a map from row-major cells.
    pub fn new(
        width: u32,
        height: u32,
        cells: Vec<MapCell>,
        spawn: CellCoord,
        exit: CellCoord,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(MapError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        if spawn == exit {
            return Err(MapError::SpawnIsExit);
        }
        let map = Self {
            width,
            height,
            cells,
            spawn,
            exit,
        };
        if !map.is_passable(spawn) {
            return Err(MapError::InvalidEndpoint("spawn"));
        }
        if !map.is_passable(exit) {
            return Err(MapError::InvalidEndpoint("exit"));
        }
        Ok(map)
    }

    /// Open ground with the spawn at the top and the exit at the bottom of the
    /// middle column; both endpoints are unbuildable.
    pub fn lane(width: u32, height: u32) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::EmptyDimensions { width, height });
        }
        let lane = (width - 1) / 2;
        let spawn = CellCoord::new(lane, 0);
        let exit = CellCoord::new(lane, height - 1);
        let mut cells = vec![MapCell::OPEN; width as usize * height as usize];
        for endpoint in [spawn, exit] {
            let index = endpoint.row() as usize * width as usize + endpoint.column() as usize;
            cells[index].buildable = false;
        }
        Self::new(width, height, cells, spawn, exit)
    }

    /// Default 8x15 lane map.
    pub fn standard() -> Result<Self, MapError> {
        Self::lane(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }

    /// Parses an ASCII layout.
    ///
    /// `.` is buildable ground, `x` unbuildable ground, `#` cliff, `S` the spawn
    /// and `E` the exit. Endpoints are unbuildable ground.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(width * height);
        let mut spawn = None;
        let mut exit = None;

        for (row_index, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(MapError::RaggedRow {
                    row: row_index,
                    expected: width,
                    actual,
                });
            }
            for (column, glyph) in row.chars().enumerate() {
                let coord = CellCoord::new(column as u32, row_index as u32);
                let cell = match glyph {
                    '.' => MapCell::OPEN,
                    'x' => MapCell {
                        terrain: Terrain::Ground,
                        buildable: false,
                    },
                    '#' => MapCell {
                        terrain: Terrain::Cliff,
                        buildable: false,
                    },
                    'S' | 'E' => {
                        let (slot, name) = if glyph == 'S' {
                            (&mut spawn, "spawn")
                        } else {
                            (&mut exit, "exit")
                        };
                        if slot.replace(coord).is_some() {
                            return Err(MapError::Endpoint(name));
                        }
                        MapCell {
                            terrain: Terrain::Ground,
                            buildable: false,
                        }
                    }
                    _ => {
                        return Err(MapError::UnknownGlyph {
                            glyph,
                            column,
                            row: row_index,
                        })
                    }
                };
                cells.push(cell);
            }
        }

        let spawn = spawn.ok_or(MapError::Endpoint("spawn"))?;
        let exit = exit.ok_or(MapError::Endpoint("exit"))?;
        Self::new(width as u32, height as u32, cells, spawn, exit)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell where creeps enter.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Cell where creeps leak.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[MapCell] {
        &self.cells
    }

    /// Row-major index of the cell, or `None` when out of bounds.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row() as usize * self.width as usize + cell.column() as usize)
        } else {
            None
        }
    }

    /// Reports whether the cell lies inside the map.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Static properties of the cell.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&MapCell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Reports whether the terrain allows ground movement.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.cell(cell)
            .is_some_and(|cell| cell.terrain == Terrain::Ground)
    }

    /// Reports whether the terrain allows construction.
    #[must_use]
    pub fn is_buildable(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(|cell| cell.buildable)
    }

    /// Cell holding the point, clamped to the map bounds.
    #[must_use]
    pub fn cell_containing(&self, point: CellPoint) -> CellCoord {
        let clamp = |value: f64, limit: u32| -> u32 {
            let floored = value.floor();
            if floored <= 0.0 || floored.is_nan() {
                0
            } else {
                (floored as u32).min(limit.saturating_sub(1))
            }
        };
        CellCoord::new(clamp(point.x(), self.width), clamp(point.y(), self.height))
    }

    /// Flight path from the spawn to the exit.
    ///
    /// The path bends through a midpoint three cells above the straight line,
    /// never higher than the first row's centre.
    #[must_use]
    pub fn air_path(&self) -> AirPath {
        let spawn = self.spawn.center();
        let exit = self.exit.center();
        let mid = CellPoint::new(
            (spawn.x() + exit.x()) / 2.0,
            ((spawn.y() + exit.y()) / 2.0 - 3.0).max(0.5),
        );
        AirPath::new(vec![spawn, mid, exit])
    }
}

/// Polyline followed by flying creeps, addressed by arc length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirPath {
    points: Vec<CellPoint>,
    lengths: Vec<f64>,
    total: f64,
}

impl AirPath {
    /// Builds a path through the provided points.
    #[must_use]
    pub fn new(points: Vec<CellPoint>) -> Self {
        let lengths: Vec<f64> = points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let total = lengths.iter().sum();
        Self {
            points,
            lengths,
            total,
        }
    }

    /// Points the path passes through.
    #[must_use]
    pub fn points(&self) -> &[CellPoint] {
        &self.points
    }

    /// Total arc length.
    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total
    }

    /// Arc length left after travelling `distance`, never negative.
    #[must_use]
    pub fn remaining(&self, distance: f64) -> f64 {
        (self.total - distance).max(0.0)
    }

    /// Point reached after travelling `distance` along the path.
    #[must_use]
    pub fn position_at(&self, distance: f64) -> CellPoint {
        let mut remaining = distance;
        for (index, length) in self.lengths.iter().enumerate() {
            if remaining <= *length {
                let start = self.points[index];
                let end = self.points[index + 1];
                let t = if *length == 0.0 {
                    0.0
                } else {
                    remaining / length
                };
                return CellPoint::new(
                    start.x() + (end.x() - start.x()) * t,
                    start.y() + (end.y() - start.y()) * t,
                );
            }
            remaining -= length;
        }
        self.points.last().copied().unwrap_or_default()
    }
}
