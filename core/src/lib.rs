#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defense simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing player actions or the passage of time, the world executes
//! them via its `apply` entry point and broadcasts [`Event`] values describing
//! what changed. Systems operate on the data model defined here ([`Creep`],
//! [`Structure`]) through read-only [`Battlefield`] views plus the single
//! shared [`DeterministicRng`] stream.

mod content;
mod entities;
mod map;
mod rng;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use content::{
    BankDefinition, Catalog, Content, ContentError, CreepDefinition, CreepKind, GameConfig,
    Resistances, ResolvedWave, SlowEffect, TowerDefinition, TowerKind, TowerTier, WaveDefinition,
    WaveGroup,
};
pub use entities::{Creep, Structure, StructureKind, TowerState};
pub use map::{AirPath, GridMap, MapCell, MapError, Terrain};
pub use rng::DeterministicRng;

/// Sentinel stored in navigation fields for cells that cannot reach the exit.
pub const UNREACHABLE: u32 = u32::MAX;

/// Lifecycle phase of a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Timed build window between waves.
    Prep,
    /// Creeps are spawning and advancing toward the exit.
    Wave,
    /// Every defined wave was cleared.
    Victory,
    /// Lives dropped to zero or below.
    Defeat,
}

impl Phase {
    /// Reports whether the phase ends the game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Preference used by a tower when several creeps are in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Creep closest to the exit.
    #[default]
    First,
    /// Creep farthest from the exit.
    Last,
    /// Creep with the most hit points.
    Strong,
    /// Creep with the fewest hit points.
    Weak,
}

impl TargetMode {
    /// Every mode in the order the HUD lists them.
    pub const ALL: [TargetMode; 4] = [Self::First, Self::Last, Self::Strong, Self::Weak];
}

/// Static flight-class preference of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPriority {
    /// Prefer ground creeps when any are in range.
    Ground,
    /// Prefer flying creeps when any are in range.
    Air,
    /// No preference; every eligible creep is a candidate.
    Any,
}

/// Damage channel used for resistance lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Arrows, bolts and other kinetic hits.
    Physical,
    /// Magical damage such as frost.
    Arcane,
    /// Fire and explosive damage.
    Siege,
}

/// Kind of structure a player asks to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    /// A tower of the provided kind at tier zero.
    Tower(TowerKind),
    /// An economy building paying income after each wave.
    Bank,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests construction of a structure on a single cell.
    PlaceStructure {
        /// Structure that should be built.
        kind: BuildKind,
        /// Cell the structure occupies.
        cell: CellCoord,
    },
    /// Requests that a structure be sold for a partial refund.
    SellStructure {
        /// Identifier of the structure to sell.
        structure: StructureId,
    },
    /// Requests that a tower advance to its next tier.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        structure: StructureId,
    },
    /// Changes the target selection mode of a tower.
    SetTargetMode {
        /// Identifier of the tower to reconfigure.
        structure: StructureId,
        /// Mode the tower should use from now on.
        mode: TargetMode,
    },
    /// Skips the remainder of the prep timer and launches the next wave.
    StartNextWave,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the game entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms that a wave's spawn queue was built.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of creeps queued for the wave.
        queued: usize,
    },
    /// Reports that a wave was fully resolved and the economy settled.
    WaveCleared {
        /// One-based wave number that was cleared.
        wave: u32,
        /// Gold paid out by banks.
        bank_income: u32,
        /// Gold paid out as interest.
        interest: u32,
    },
    /// Confirms that the wave director created a creep.
    CreepSpawned {
        /// Identifier assigned to the creep.
        creep: CreepId,
        /// Creep type that spawned.
        kind: CreepKind,
    },
    /// Reports that a creep reached the exit.
    CreepLeaked {
        /// Identifier of the creep that leaked.
        creep: CreepId,
        /// Lives removed by the leak.
        damage: i32,
    },
    /// Reports that a creep was destroyed.
    CreepKilled {
        /// Identifier of the destroyed creep.
        creep: CreepId,
        /// Gold awarded for the kill.
        bounty: u32,
    },
    /// Reports that a tower fired at a creep.
    TowerFired {
        /// Identifier of the firing tower.
        tower: StructureId,
        /// Primary target of the shot.
        target: CreepId,
        /// Total damage dealt by the shot, splash included.
        damage: f64,
    },
    /// Confirms that a structure was placed.
    StructurePlaced {
        /// Identifier assigned to the structure.
        structure: StructureId,
        /// Structure that was built.
        kind: BuildKind,
        /// Cell the structure occupies.
        cell: CellCoord,
    },
    /// Confirms that a structure was sold.
    StructureSold {
        /// Identifier of the sold structure.
        structure: StructureId,
        /// Cell the structure occupied.
        cell: CellCoord,
        /// Gold refunded to the player.
        refund: u32,
    },
    /// Confirms that a tower advanced a tier.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        structure: StructureId,
        /// Tier the tower reached.
        tier: u8,
    },
    /// Confirms that a tower changed its target selection mode.
    TargetModeChanged {
        /// Identifier of the reconfigured tower.
        structure: StructureId,
        /// Mode now in use.
        mode: TargetMode,
    },
    /// Reports that the distance field was recomputed.
    PathRebuilt {
        /// Hop count from the spawn to the exit, or `None` when blocked.
        length: Option<u32>,
    },
}

/// Reasons a player action may be rejected by the world.
///
/// A rejected action never leaves partial side effects behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ActionError {
    /// The game already ended in victory or defeat.
    #[error("the game is over")]
    GameOver,
    /// Only allowed during the prep phase.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// The requested cell lies outside the map.
    #[error("cell is outside the map")]
    OutOfBounds,
    /// The requested cell already holds a structure.
    #[error("cell is already occupied")]
    Occupied,
    /// The requested cell does not allow construction.
    #[error("cell is not buildable")]
    Unbuildable,
    /// Building on the cell would disconnect the spawn from the exit.
    #[error("placement would block the path")]
    WouldBlockPath,
    /// The player cannot afford the action.
    #[error("not enough gold: {required} required, {available} available")]
    InsufficientGold {
        /// Gold the action costs.
        required: u32,
        /// Gold the player holds.
        available: u32,
    },
    /// The tower kind is not part of the content tables.
    #[error("unknown tower kind")]
    UnknownKind,
    /// No structure with the provided identifier exists.
    #[error("no such structure")]
    UnknownStructure,
    /// The structure is a bank, not a tower.
    #[error("structure is not a tower")]
    NotATower,
    /// The tower already reached its last tier.
    #[error("tower is already at its maximum tier")]
    MaxTier,
}

/// Unique identifier assigned to a creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepId(u32);

impl CreepId {
    /// Creates a new creep identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(u32);

impl StructureId {
    /// Creates a new structure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous point at the centre of the cell.
    #[must_use]
    pub fn center(self) -> CellPoint {
        CellPoint::new(f64::from(self.column) + 0.5, f64::from(self.row) + 0.5)
    }
}

/// Continuous position measured in cell units.
///
/// The point `(0.0, 0.0)` is the upper-left corner of cell `(0, 0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellPoint {
    x: f64,
    y: f64,
}

impl CellPoint {
    /// Creates a new point from cell-space coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: CellPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Read-only view into a dense distance field.
///
/// Values are hop counts to the exit, with [`UNREACHABLE`] marking cells that
/// have no passable route.
#[derive(Clone, Copy, Debug)]
pub struct NavigationFieldView<'a> {
    cells: &'a [u32],
    width: u32,
    height: u32,
}

impl<'a> NavigationFieldView<'a> {
    /// Captures a new navigation view backed by the provided row-major slice.
    #[must_use]
    pub const fn new(cells: &'a [u32], width: u32, height: u32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Hop count stored for the cell; [`UNREACHABLE`] when out of bounds.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> u32 {
        if cell.column() >= self.width || cell.row() >= self.height {
            return UNREACHABLE;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        self.cells.get(index).copied().unwrap_or(UNREACHABLE)
    }

    /// Reports whether the cell has a finite route to the exit.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell) != UNREACHABLE
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub const fn cells(&self) -> &'a [u32] {
        self.cells
    }

    /// Provides the dimensions of the underlying field.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Read-only bundle of everything systems need to reason about the map.
#[derive(Clone, Copy, Debug)]
pub struct Battlefield<'a> {
    /// Validated content tables.
    pub catalog: &'a Catalog,
    /// Immutable grid map.
    pub map: &'a GridMap,
    /// Current distance field.
    pub navigation: NavigationFieldView<'a>,
    /// Fixed flight path shared by every flying creep.
    pub air_path: &'a AirPath,
}

impl Battlefield<'_> {
    /// Remaining distance a creep must travel before leaking.
    ///
    /// Flying creeps report the remaining arc length of the flight path, ground
    /// creeps the hop count stored for their current cell. Unreachable cells
    /// report positive infinity.
    #[must_use]
    pub fn remaining_distance(&self, creep: &Creep) -> f64 {
        if creep.is_flying {
            return self.air_path.remaining(creep.air_distance);
        }
        let cell = self.map.cell_containing(creep.position);
        match self.navigation.distance(cell) {
            UNREACHABLE => f64::INFINITY,
            hops => f64::from(hops),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellPoint, NavigationFieldView, Phase, UNREACHABLE};

    #[test]
    fn cell_center_is_offset_by_half() {
        assert_eq!(CellCoord::new(3, 0).center(), CellPoint::new(3.5, 0.5));
    }

    #[test]
    fn only_victory_and_defeat_are_terminal() {
        assert!(!Phase::Prep.is_terminal());
        assert!(!Phase::Wave.is_terminal());
        assert!(Phase::Victory.is_terminal());
        assert!(Phase::Defeat.is_terminal());
    }

    #[test]
    fn navigation_view_reports_out_of_bounds_as_unreachable() {
        let cells = vec![2, 1, 0, UNREACHABLE];
        let view = NavigationFieldView::new(&cells, 2, 2);
        assert_eq!(view.distance(CellCoord::new(1, 0)), 1);
        assert_eq!(view.distance(CellCoord::new(0, 1)), 0);
        assert!(!view.is_reachable(CellCoord::new(1, 1)));
        assert!(!view.is_reachable(CellCoord::new(2, 0)));
    }
}
