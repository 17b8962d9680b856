//! Random action generator used to check that replays are deterministic.

use std::collections::BTreeMap;

use lane_defense_core::{BuildKind, Catalog, CellCoord, Command, GridMap, StructureId, TargetMode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds a schedule of random player actions spread over `ticks`.
///
/// Commands may well be rejected by the world; replays must reject them the
/// same way every time.
pub(crate) fn random_schedule(
    seed: u64,
    catalog: &Catalog,
    map: &GridMap,
    actions: usize,
    ticks: u64,
) -> BTreeMap<u64, Vec<Command>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let towers: Vec<_> = catalog.tower_kinds().collect();
    let mut schedule: BTreeMap<u64, Vec<Command>> = BTreeMap::new();
    let horizon = ticks.max(1);
    let id_ceiling = u32::try_from(actions).unwrap_or(u32::MAX).saturating_add(1);

    for _ in 0..actions {
        let tick = rng.gen_range(0..horizon);
        let structure = StructureId::new(rng.gen_range(1..=id_ceiling));
        let command = match rng.gen_range(0..10u8) {
            0..=4 => {
                let kind = if towers.is_empty() || rng.gen_bool(0.15) {
                    BuildKind::Bank
                } else {
                    BuildKind::Tower(towers[rng.gen_range(0..towers.len())])
                };
                let cell = CellCoord::new(
                    rng.gen_range(0..map.width()),
                    rng.gen_range(0..map.height()),
                );
                Command::PlaceStructure { kind, cell }
            }
            5 => Command::SellStructure { structure },
            6 | 7 => Command::UpgradeTower { structure },
            8 => Command::SetTargetMode {
                structure,
                mode: TargetMode::ALL[rng.gen_range(0..TargetMode::ALL.len())],
            },
            _ => Command::StartNextWave,
        };
        schedule.entry(tick).or_default().push(command);
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defense_core::Content;

    #[test]
    fn schedules_are_reproducible_from_the_seed() {
        let catalog = Catalog::new(Content::default()).expect("shipped content validates");
        let map = GridMap::standard().expect("standard map");

        let first = random_schedule(99, &catalog, &map, 40, 500);
        let second = random_schedule(99, &catalog, &map, 40, 500);
        let other = random_schedule(100, &catalog, &map, 40, 500);

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.values().map(Vec::len).sum::<usize>(), 40);
        assert!(first.keys().all(|tick| *tick < 500));
    }
}
