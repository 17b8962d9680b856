#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world state.

use lane_defense_core::{
    Battlefield, CellCoord, Creep, DeterministicRng, TargetMode, TargetPriority, TowerDefinition,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    ground: Vec<usize>,
    air: Vec<usize>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the indices of creeps a tower could hit this tick.
    ///
    /// Only live creeps inside the tier's range whose flight class the tower
    /// can hit qualify. The preferred class is returned when non-empty, then
    /// the other class, and both combined (ground first) when the tower has no
    /// preference. The output buffer is cleared before populating it.
    pub fn acquire(
        &mut self,
        definition: &TowerDefinition,
        range: f64,
        cell: CellCoord,
        creeps: &[Creep],
        out: &mut Vec<usize>,
    ) {
        out.clear();
        self.ground.clear();
        self.air.clear();

        if definition.is_blocker() {
            return;
        }

        let origin = cell.center();
        let range_sq = range * range;
        for (index, creep) in creeps.iter().enumerate() {
            if !creep.is_alive() {
                continue;
            }
            if creep.is_flying && !definition.can_hit_air {
                continue;
            }
            if !creep.is_flying && !definition.can_hit_ground {
                continue;
            }
            if origin.distance_squared(creep.position) > range_sq {
                continue;
            }
            if creep.is_flying {
                self.air.push(index);
            } else {
                self.ground.push(index);
            }
        }

        let (preferred, fallback) = match definition.priority {
            TargetPriority::Air => (&self.air, &self.ground),
            TargetPriority::Ground => (&self.ground, &self.air),
            TargetPriority::Any => {
                out.extend_from_slice(&self.ground);
                out.extend_from_slice(&self.air);
                return;
            }
        };
        if preferred.is_empty() {
            out.extend_from_slice(fallback);
        } else {
            out.extend_from_slice(preferred);
        }
    }
}

/// Picks the preferred creep among the candidates.
///
/// Candidates are scanned in order and a strictly better metric replaces the
/// current pick. An exact tie draws one value from `rng` and switches to the
/// later candidate when the draw exceeds one half.
pub fn pick_target(
    mode: TargetMode,
    candidates: &[usize],
    creeps: &[Creep],
    battlefield: &Battlefield<'_>,
    rng: &mut DeterministicRng,
) -> Option<usize> {
    let metric = |creep: &Creep| match mode {
        TargetMode::Strong => creep.hp,
        TargetMode::Weak => -creep.hp,
        TargetMode::Last => battlefield.remaining_distance(creep),
        TargetMode::First => -battlefield.remaining_distance(creep),
    };

    let (&first, rest) = candidates.split_first()?;
    let mut best = first;
    let mut best_value = metric(&creeps[first]);
    for &candidate in rest {
        let value = metric(&creeps[candidate]);
        if value > best_value {
            best = candidate;
            best_value = value;
        } else if value == best_value && rng.next_unit() > 0.5 {
            best = candidate;
        }
    }
    Some(best)
}
