//! Mutable simulation entities owned by the world.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CellPoint, CreepId, CreepKind, StructureId, TargetMode, TowerKind};

/// A creep walking or flying toward the exit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creep {
    /// Unique identifier.
    pub id: CreepId,
    /// Creep type.
    pub kind: CreepKind,
    /// Remaining hit points; may drop below zero before the creep is reaped.
    pub hp: f64,
    /// Hit points at spawn.
    pub max_hp: f64,
    /// Cells per second before slows.
    pub speed: f64,
    /// Continuous position in cell space.
    pub position: CellPoint,
    /// Whether the creep follows the flight path.
    pub is_flying: bool,
    /// Speed multiplier of the active slow, `1.0` when unslowed.
    pub slow_multiplier: f64,
    /// Seconds left on the active slow.
    pub slow_timer: f64,
    /// Arc length travelled along the flight path.
    pub air_distance: f64,
}

impl Creep {
    /// Reports whether the creep still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Speed after slows.
    #[must_use]
    pub fn effective_speed(&self) -> f64 {
        self.speed * self.slow_multiplier
    }
}

/// Tower payload of a [`Structure`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    /// Tower type.
    pub kind: TowerKind,
    /// Zero-based upgrade tier.
    pub tier: u8,
    /// Seconds until the tower may fire again.
    pub cooldown: f64,
    /// Target selection mode.
    pub target_mode: TargetMode,
    /// Damage dealt during the current wave. Display only.
    pub round_damage: f64,
    /// Damage dealt during the previous wave, rounded. Display only.
    pub last_round_damage: f64,
    /// Firing animation intensity in `[0, 1]`. Display only.
    pub recoil: f64,
}

impl TowerState {
    /// Freshly built tower of the provided kind.
    #[must_use]
    pub fn new(kind: TowerKind) -> Self {
        Self {
            kind,
            tier: 0,
            cooldown: 0.0,
            target_mode: TargetMode::First,
            round_damage: 0.0,
            last_round_damage: 0.0,
            recoil: 0.0,
        }
    }
}

/// Variant specific data of a structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StructureKind {
    /// A tower that may fire at creeps.
    Tower(TowerState),
    /// An economy building.
    Bank,
}

/// Anything a player can build on a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Unique identifier.
    pub id: StructureId,
    /// Occupied cell.
    pub cell: CellCoord,
    /// Gold invested so far, upgrades included.
    pub spent: u32,
    /// Variant specific data.
    pub kind: StructureKind,
}

impl Structure {
    /// Tower payload, if the structure is a tower.
    #[must_use]
    pub fn tower(&self) -> Option<&TowerState> {
        match &self.kind {
            StructureKind::Tower(tower) => Some(tower),
            StructureKind::Bank => None,
        }
    }

    /// Mutable tower payload, if the structure is a tower.
    pub fn tower_mut(&mut self) -> Option<&mut TowerState> {
        match &mut self.kind {
            StructureKind::Tower(tower) => Some(tower),
            StructureKind::Bank => None,
        }
    }

    /// Reports whether the structure is a bank.
    #[must_use]
    pub fn is_bank(&self) -> bool {
        matches!(self.kind, StructureKind::Bank)
    }
}
