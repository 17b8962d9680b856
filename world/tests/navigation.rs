use std::collections::HashSet;

use lane_defense_core::{CellCoord, GridMap, UNREACHABLE};
use lane_defense_world::{compute_distances, query, World};
use proptest::prelude::*;

const WIDTH: u32 = 6;
const HEIGHT: u32 = 7;

fn layout(cliffs: &HashSet<(u32, u32)>) -> GridMap {
    let rows: Vec<String> = (0..HEIGHT)
        .map(|row| {
            (0..WIDTH)
                .map(|column| match (column, row) {
                    (2, 0) => 'S',
                    (3, r) if r == HEIGHT - 1 => 'E',
                    cell if cliffs.contains(&cell) => '#',
                    _ => '.',
                })
                .collect()
        })
        .collect();
    let borrowed: Vec<&str> = rows.iter().map(String::as_str).collect();
    GridMap::from_rows(&borrowed).expect("generated layout parses")
}

/// Relaxes hop counts until nothing changes.
fn relaxed_distances(map: &GridMap, occupied: &HashSet<(u32, u32)>) -> Vec<u32> {
    let width = map.width();
    let height = map.height();
    let blocked = |column: u32, row: u32| {
        occupied.contains(&(column, row)) || !map.is_passable(CellCoord::new(column, row))
    };
    let mut distances = vec![UNREACHABLE; (width * height) as usize];
    let exit = map.exit();
    if blocked(exit.column(), exit.row()) {
        return distances;
    }
    distances[(exit.row() * width + exit.column()) as usize] = 0;

    let mut changed = true;
    while changed {
        changed = false;
        for row in 0..height {
            for column in 0..width {
                if blocked(column, row) {
                    continue;
                }
                let index = (row * width + column) as usize;
                let mut best = distances[index];
                let neighbours = [
                    (column.wrapping_sub(1), row),
                    (column + 1, row),
                    (column, row.wrapping_sub(1)),
                    (column, row + 1),
                ];
                for (x, y) in neighbours {
                    if x >= width || y >= height || blocked(x, y) {
                        continue;
                    }
                    let candidate = distances[(y * width + x) as usize];
                    if candidate != UNREACHABLE && candidate + 1 < best {
                        best = candidate + 1;
                    }
                }
                if best < distances[index] {
                    distances[index] = best;
                    changed = true;
                }
            }
        }
    }
    distances
}

fn cell_set() -> impl Strategy<Value = HashSet<(u32, u32)>> {
    prop::collection::hash_set((0..WIDTH, 0..HEIGHT), 0..14)
}

#[test]
fn empty_standard_map_is_fourteen_hops_long() {
    let map = GridMap::standard().expect("standard map");
    let field = compute_distances(&map, |_| false);

    assert_eq!(field.distance(map.spawn()), Some(14));
    assert_eq!(field.distance(map.exit()), Some(0));
    assert_eq!(field.distance(CellCoord::new(0, 0)), Some(17));
}

#[test]
fn world_field_matches_fresh_computation() {
    let world = World::standard(3).expect("standard world");
    let map = query::map(&world);
    let fresh = compute_distances(map, |_| false);

    assert_eq!(query::navigation_view(&world).cells(), fresh.cells());
}

proptest! {
    #[test]
    fn distances_match_relaxation(cliffs in cell_set(), occupied in cell_set()) {
        let map = layout(&cliffs);
        let field = compute_distances(&map, |cell| occupied.contains(&(cell.column(), cell.row())));
        let expected = relaxed_distances(&map, &occupied);

        prop_assert_eq!(field.cells(), expected.as_slice());
    }

    #[test]
    fn computation_is_pure(occupied in cell_set()) {
        let map = layout(&HashSet::new());
        let is_occupied = |cell: CellCoord| occupied.contains(&(cell.column(), cell.row()));

        prop_assert_eq!(compute_distances(&map, is_occupied), compute_distances(&map, is_occupied));
    }
}
