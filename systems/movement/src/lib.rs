#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances creeps toward the exit.
//!
//! Ground creeps descend the distance field one neighbour at a time while
//! flying creeps follow the fixed flight path. Creeps that reach the exit are
//! removed and reported as leaks.

use lane_defense_core::{Battlefield, CellCoord, CellPoint, Creep, Event, UNREACHABLE};

/// Distance below which a creep snaps onto its goal cell centre.
const SNAP_DISTANCE: f64 = 0.01;

/// Pure system that moves creeps and removes the ones that leak.
#[derive(Debug, Default)]
pub struct Movement {
    leaked: Vec<usize>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every creep by `dt` seconds.
    ///
    /// Leaked creeps are removed from `creeps` and reported through
    /// `Event::CreepLeaked`. Returns the total number of lives lost.
    pub fn handle(
        &mut self,
        dt: f64,
        battlefield: &Battlefield<'_>,
        creeps: &mut Vec<Creep>,
        out: &mut Vec<Event>,
    ) -> i32 {
        self.leaked.clear();
        for (index, creep) in creeps.iter_mut().enumerate() {
            decay_slow(creep, dt);
            let progress = if creep.is_flying {
                fly(creep, dt, battlefield)
            } else {
                walk(creep, dt, battlefield)
            };
            if progress == Progress::Leaked {
                self.leaked.push(index);
            }
        }

        if self.leaked.is_empty() {
            return 0;
        }

        let mut lives_lost = 0;
        for &index in self.leaked.iter().rev() {
            let creep = creeps.remove(index);
            let damage = battlefield
                .catalog
                .creep(creep.kind)
                .map_or(0, |definition| definition.leak_damage);
            log::debug!("creep {} leaked for {damage} lives", creep.id.get());
            lives_lost += damage;
            out.push(Event::CreepLeaked {
                creep: creep.id,
                damage,
            });
        }
        lives_lost
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Progress {
    Moving,
    Leaked,
}

fn decay_slow(creep: &mut Creep, dt: f64) {
    if creep.slow_timer > 0.0 {
        creep.slow_timer = (creep.slow_timer - dt).max(0.0);
        if creep.slow_timer == 0.0 {
            creep.slow_multiplier = 1.0;
        }
    }
}

fn fly(creep: &mut Creep, dt: f64, battlefield: &Battlefield<'_>) -> Progress {
    creep.air_distance += creep.effective_speed() * dt;
    creep.position = battlefield.air_path.position_at(creep.air_distance);
    if creep.air_distance >= battlefield.air_path.total_length() {
        Progress::Leaked
    } else {
        Progress::Moving
    }
}

fn walk(creep: &mut Creep, dt: f64, battlefield: &Battlefield<'_>) -> Progress {
    let map = battlefield.map;
    let current = map.cell_containing(creep.position);
    if current == map.exit() {
        return Progress::Leaked;
    }

    let Some(goal) = next_cell(current, battlefield) else {
        return Progress::Moving;
    };

    let target = goal.center();
    let dx = target.x() - creep.position.x();
    let dy = target.y() - creep.position.y();
    let distance = dx.hypot(dy);
    if distance < SNAP_DISTANCE {
        creep.position = target;
    } else {
        let step = distance.min(creep.effective_speed() * dt);
        creep.position = CellPoint::new(
            creep.position.x() + dx / distance * step,
            creep.position.y() + dy / distance * step,
        );
    }
    Progress::Moving
}

/// Neighbour with the strictly smallest distance, or the current cell when no
/// neighbour improves on it. `None` when no finite route exists.
fn next_cell(current: CellCoord, battlefield: &Battlefield<'_>) -> Option<CellCoord> {
    let navigation = &battlefield.navigation;
    let (width, height) = navigation.dimensions();
    let column = current.column();
    let row = current.row();

    let neighbors = [
        (column.checked_add(1).filter(|c| *c < width), Some(row)),
        (column.checked_sub(1), Some(row)),
        (Some(column), row.checked_add(1).filter(|r| *r < height)),
        (Some(column), row.checked_sub(1)),
    ];

    let mut best = (current, navigation.distance(current));
    for (column, row) in neighbors {
        let (Some(column), Some(row)) = (column, row) else {
            continue;
        };
        let neighbor = CellCoord::new(column, row);
        let distance = navigation.distance(neighbor);
        if distance < best.1 {
            best = (neighbor, distance);
        }
    }

    if best.1 == UNREACHABLE {
        None
    } else {
        Some(best.0)
    }
}
