use std::collections::HashSet;

use lane_defense_core::{
    ActionError, BuildKind, CellCoord, Command, Content, Event, GridMap, Phase, StructureId,
    TargetMode, TowerKind,
};
use lane_defense_world::{self as world, compute_distances, query, World};
use proptest::prelude::*;

fn standard() -> World {
    World::standard(11).expect("standard world")
}

fn tower(world: &World, name: &str) -> BuildKind {
    BuildKind::Tower(query::catalog(world).tower_kind(name).expect("tower exists"))
}

fn place(world: &mut World, kind: BuildKind, column: u32, row: u32) -> StructureId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceStructure {
            kind,
            cell: CellCoord::new(column, row),
        },
        &mut events,
    )
    .expect("placement accepted");
    match events.first() {
        Some(Event::StructurePlaced { structure, .. }) => *structure,
        other => panic!("unexpected first event: {other:?}"),
    }
}

#[test]
fn placement_emits_structure_then_path_events() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let mut events = Vec::new();
    let cell = CellCoord::new(2, 5);

    world::apply(&mut world, Command::PlaceStructure { kind: basic, cell }, &mut events)
        .expect("placement accepted");

    assert_eq!(
        events,
        vec![
            Event::StructurePlaced {
                structure: StructureId::new(1),
                kind: basic,
                cell,
            },
            Event::PathRebuilt { length: Some(14) },
        ]
    );
    assert_eq!(query::gold(&world), 640 - 70);
    assert_eq!(
        query::structure_at(&world, cell).map(|structure| structure.id),
        Some(StructureId::new(1))
    );
    assert!(!query::can_place_structure(&world, cell));
}

fn try_place(
    world: &mut World,
    kind: BuildKind,
    column: u32,
    row: u32,
    events: &mut Vec<Event>,
) -> Result<(), ActionError> {
    world::apply(
        world,
        Command::PlaceStructure {
            kind,
            cell: CellCoord::new(column, row),
        },
        events,
    )
}

#[test]
fn placement_errors_are_reported_in_order() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let unknown = BuildKind::Tower(TowerKind::new(99));
    let mut events = Vec::new();

    assert_eq!(try_place(&mut world, basic, 8, 0, &mut events), Err(ActionError::OutOfBounds));
    assert_eq!(try_place(&mut world, basic, 3, 0, &mut events), Err(ActionError::Unbuildable));
    assert_eq!(try_place(&mut world, basic, 3, 14, &mut events), Err(ActionError::Unbuildable));
    assert_eq!(try_place(&mut world, unknown, 1, 1, &mut events), Err(ActionError::UnknownKind));
    assert!(events.is_empty());

    let _ = place(&mut world, basic, 1, 1);
    assert_eq!(
        try_place(&mut world, BuildKind::Bank, 1, 1, &mut events),
        Err(ActionError::Occupied)
    );
    assert!(events.is_empty());
}

#[test]
fn sealing_the_lane_is_rejected_before_gold_is_checked() {
    let mut content = Content::default();
    content.config.start_gold = 140;
    let mut world = World::with_content(content, 5).expect("world builds");
    let wall = tower(&world, "wall");

    for column in 0..7 {
        let _ = place(&mut world, wall, column, 6);
    }
    assert_eq!(query::gold(&world), 0);
    assert_eq!(query::path_length(&world), Some(22));

    let mut events = Vec::new();
    assert_eq!(
        world::apply(
            &mut world,
            Command::PlaceStructure {
                kind: wall,
                cell: CellCoord::new(7, 6),
            },
            &mut events,
        ),
        Err(ActionError::WouldBlockPath)
    );
    assert_eq!(
        world::apply(
            &mut world,
            Command::PlaceStructure {
                kind: wall,
                cell: CellCoord::new(0, 10),
            },
            &mut events,
        ),
        Err(ActionError::InsufficientGold {
            required: 20,
            available: 0,
        })
    );
    assert!(events.is_empty());
    assert!(!query::can_place_structure(&world, CellCoord::new(7, 6)));
    assert!(query::can_place_structure(&world, CellCoord::new(0, 10)));
}

#[test]
fn selling_refunds_and_restores_the_field() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let id = place(&mut world, basic, 3, 4);
    assert_eq!(query::path_length(&world), Some(16));
    assert_eq!(query::sell_value(&world, id), Some(45));

    let mut events = Vec::new();
    world::apply(&mut world, Command::SellStructure { structure: id }, &mut events)
        .expect("sale accepted");

    assert_eq!(
        events,
        vec![
            Event::StructureSold {
                structure: id,
                cell: CellCoord::new(3, 4),
                refund: 45,
            },
            Event::PathRebuilt { length: Some(14) },
        ]
    );
    assert_eq!(query::gold(&world), 640 - 70 + 45);
    let fresh = compute_distances(query::map(&world), |_| false);
    assert_eq!(query::navigation_view(&world).cells(), fresh.cells());

    events.clear();
    assert_eq!(
        world::apply(&mut world, Command::SellStructure { structure: id }, &mut events),
        Err(ActionError::UnknownStructure)
    );
}

#[test]
fn upgrades_walk_the_tier_table() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let id = place(&mut world, basic, 0, 3);
    assert_eq!(query::upgrade_cost(&world, id), Some(110));

    let mut events = Vec::new();
    world::apply(&mut world, Command::UpgradeTower { structure: id }, &mut events)
        .expect("upgrade accepted");
    assert_eq!(events, vec![Event::TowerUpgraded { structure: id, tier: 1 }]);
    assert_eq!(query::gold(&world), 640 - 70 - 110);
    assert_eq!(query::sell_value(&world, id), Some(117));

    events.clear();
    world::apply(&mut world, Command::UpgradeTower { structure: id }, &mut events)
        .expect("second upgrade accepted");
    assert_eq!(events, vec![Event::TowerUpgraded { structure: id, tier: 2 }]);
    assert_eq!(query::gold(&world), 640 - 70 - 110 - 170);
    assert_eq!(query::upgrade_cost(&world, id), Some(250));
}

#[test]
fn maxed_tower_refuses_further_upgrades() {
    let mut content = Content::default();
    content.config.start_gold = 5_000;
    let mut world = World::with_content(content, 5).expect("world builds");
    let rapid = tower(&world, "rapid");
    let id = place(&mut world, rapid, 6, 6);
    let mut events = Vec::new();

    for _ in 0..4 {
        world::apply(&mut world, Command::UpgradeTower { structure: id }, &mut events)
            .expect("upgrade accepted");
    }
    assert_eq!(query::upgrade_cost(&world, id), None);
    assert_eq!(
        world::apply(&mut world, Command::UpgradeTower { structure: id }, &mut events),
        Err(ActionError::MaxTier)
    );
    let structure = query::structure(&world, id).expect("tower exists");
    assert_eq!(structure.spent, 75 + 120 + 180 + 260 + 370);
    assert_eq!(structure.tower().map(|tower| tower.tier), Some(4));
}

#[test]
fn banks_are_not_towers() {
    let mut world = standard();
    let bank = place(&mut world, BuildKind::Bank, 7, 10);
    let mut events = Vec::new();

    assert_eq!(
        world::apply(&mut world, Command::UpgradeTower { structure: bank }, &mut events),
        Err(ActionError::NotATower)
    );
    assert_eq!(
        world::apply(
            &mut world,
            Command::SetTargetMode {
                structure: bank,
                mode: TargetMode::Strong,
            },
            &mut events,
        ),
        Err(ActionError::NotATower)
    );
    assert!(events.is_empty());
    assert_eq!(query::bank_income(&world), 50);
    assert_eq!(query::upgrade_cost(&world, bank), None);
}

#[test]
fn target_mode_changes_are_recorded() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let id = place(&mut world, basic, 5, 5);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::SetTargetMode {
            structure: id,
            mode: TargetMode::Weak,
        },
        &mut events,
    )
    .expect("mode accepted");

    assert_eq!(
        events,
        vec![Event::TargetModeChanged {
            structure: id,
            mode: TargetMode::Weak,
        }]
    );
    let mode = query::structure(&world, id)
        .and_then(|structure| structure.tower())
        .map(|tower| tower.target_mode);
    assert_eq!(mode, Some(TargetMode::Weak));
}

#[test]
fn total_dps_sums_scaled_tower_damage() {
    let mut world = standard();
    let basic = tower(&world, "basic");
    let wall = tower(&world, "wall");
    let _ = place(&mut world, basic, 0, 2);
    let _ = place(&mut world, basic, 7, 2);
    let _ = place(&mut world, wall, 0, 8);

    assert!((query::total_dps(&world) - 24.0).abs() < 1e-9);
}

#[test]
fn terminal_world_rejects_every_action() {
    let mut content = Content::default();
    content.config.start_lives = 1;
    let mut world = World::with_content(content, 9).expect("world builds");
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartNextWave, &mut events).expect("wave starts");
    while !query::phase(&world).is_terminal() {
        world::apply(&mut world, Command::Tick { dt: world::TICK_LENGTH }, &mut events)
            .expect("tick accepted");
    }
    assert_eq!(query::phase(&world), Phase::Defeat);

    let basic = tower(&world, "basic");
    let commands = [
        Command::PlaceStructure {
            kind: basic,
            cell: CellCoord::new(0, 0),
        },
        Command::SellStructure {
            structure: StructureId::new(1),
        },
        Command::UpgradeTower {
            structure: StructureId::new(1),
        },
        Command::SetTargetMode {
            structure: StructureId::new(1),
            mode: TargetMode::Last,
        },
        Command::StartNextWave,
    ];
    for command in commands {
        let mut events = Vec::new();
        assert_eq!(
            world::apply(&mut world, command, &mut events),
            Err(ActionError::GameOver)
        );
        assert!(events.is_empty());
    }
}

fn blocks_path(map: &GridMap, occupied: &HashSet<CellCoord>, candidate: CellCoord) -> bool {
    let field = compute_distances(map, |cell| cell == candidate || occupied.contains(&cell));
    !field.view().is_reachable(map.spawn())
}

proptest! {
    #[test]
    fn placement_check_agrees_with_path_search(
        cells in prop::collection::vec((0u32..9, 0u32..16), 1..40)
    ) {
        let mut content = Content::default();
        content.config.start_gold = 10_000;
        let mut world = World::with_content(content, 1).expect("world builds");
        let wall = tower(&world, "wall");
        let map = query::map(&world).clone();
        let mut occupied = HashSet::new();

        for (column, row) in cells {
            let cell = CellCoord::new(column, row);
            let expected = map.contains(cell)
                && !occupied.contains(&cell)
                && map.is_buildable(cell)
                && !blocks_path(&map, &occupied, cell);
            prop_assert_eq!(query::can_place_structure(&world, cell), expected);

            let mut events = Vec::new();
            let result = world::apply(
                &mut world,
                Command::PlaceStructure { kind: wall, cell },
                &mut events,
            );
            prop_assert_eq!(result.is_ok(), expected);
            if expected {
                let _ = occupied.insert(cell);
            }
            prop_assert!(query::path_length(&world).is_some());
        }
    }
}
