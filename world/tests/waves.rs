use lane_defense_core::{
    ActionError, BuildKind, CellCoord, Command, Content, Event, Phase, WaveDefinition, WaveGroup,
};
use lane_defense_world::{self as world, query, World, TICK_LENGTH};

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: TICK_LENGTH }, &mut events).expect("tick accepted");
    events
}

fn start(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::StartNextWave, &mut events).expect("wave starts");
    events
}

fn run_until<F>(world: &mut World, limit: usize, mut done: F) -> Vec<Vec<Event>>
where
    F: FnMut(&World) -> bool,
{
    let mut history = Vec::new();
    while !done(world) {
        assert!(history.len() < limit, "condition not reached in {limit} ticks");
        history.push(tick(world));
    }
    history
}

#[test]
fn prep_timer_expiry_starts_the_wave_in_the_same_tick() {
    let mut world = World::standard(21).expect("standard world");
    let history = run_until(&mut world, 400, |world| query::phase(world) == Phase::Wave);

    assert!((199..=201).contains(&history.len()), "wave began after {} ticks", history.len());
    let last = history.last().expect("at least one tick");
    assert!(last.contains(&Event::WaveStarted { wave: 1, queued: 12 }));
    assert!(last
        .iter()
        .any(|event| matches!(event, Event::CreepSpawned { .. })));
    assert_eq!(query::phase_timer(&world), 0.0);
}

#[test]
fn manual_start_does_not_advance_time() {
    let mut world = World::standard(21).expect("standard world");
    let events = start(&mut world);

    assert_eq!(
        events,
        vec![
            Event::WaveStarted { wave: 1, queued: 12 },
            Event::PhaseChanged { phase: Phase::Wave },
        ]
    );
    assert!(query::creeps(&world).is_empty());
    assert_eq!(query::pending_spawns(&world), 12);
}

#[test]
fn first_wave_spawns_twelve_grunts_at_a_steady_cadence() {
    let mut world = World::standard(4).expect("standard world");
    let grunt = query::catalog(&world).creep_kind("grunt").expect("grunt exists");
    let _ = start(&mut world);

    let mut spawn_ticks = Vec::new();
    let mut index = 0usize;
    while spawn_ticks.len() < 12 {
        assert_eq!(query::phase(&world), Phase::Wave);
        for event in tick(&mut world) {
            if let Event::CreepSpawned { kind, .. } = event {
                assert_eq!(kind, grunt);
                spawn_ticks.push(index);
            }
        }
        index += 1;
        assert!(index < 200, "spawns stalled");
    }

    for (ordinal, tick) in spawn_ticks.iter().enumerate() {
        let expected = ordinal * 8;
        assert!(
            tick.abs_diff(expected) <= 1,
            "spawn {ordinal} on tick {tick}, expected near {expected}"
        );
    }
    assert_eq!(query::pending_spawns(&world), 0);
}

#[test]
fn unopposed_wave_leaks_and_pays_interest() {
    let mut world = World::standard(4).expect("standard world");
    let _ = start(&mut world);
    let history = run_until(&mut world, 2_000, |world| query::phase(world) == Phase::Prep);
    let events: Vec<Event> = history.into_iter().flatten().collect();

    let leaked = events
        .iter()
        .filter(|event| matches!(event, Event::CreepLeaked { damage: 1, .. }))
        .count();
    assert_eq!(leaked, 12);
    assert_eq!(query::lives(&world), 8);
    assert_eq!(query::wave(&world), 2);
    assert_eq!(query::gold(&world), 768);
    assert_eq!(query::phase_timer(&world), 20.0);
    assert!(events.contains(&Event::WaveCleared {
        wave: 1,
        bank_income: 0,
        interest: 128,
    }));
    assert_eq!(events.last(), Some(&Event::PhaseChanged { phase: Phase::Prep }));
}

#[test]
fn banks_pay_before_interest() {
    let mut world = World::standard(4).expect("standard world");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceStructure {
            kind: BuildKind::Bank,
            cell: CellCoord::new(0, 0),
        },
        &mut events,
    )
    .expect("bank placed");
    let _ = start(&mut world);
    let _ = run_until(&mut world, 2_000, |world| query::phase(world) == Phase::Prep);

    let balance = 540 + 50;
    assert_eq!(query::gold(&world), balance * 6 / 5);
}

#[test]
fn towers_kill_creeps_and_collect_bounties() {
    let mut world = World::standard(8).expect("standard world");
    let basic = BuildKind::Tower(
        query::catalog(&world)
            .tower_kind("basic")
            .expect("basic tower exists"),
    );
    for (column, row) in [(2, 3), (4, 3), (2, 5), (4, 5), (2, 7), (4, 7), (2, 9), (4, 9)] {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceStructure {
                kind: basic,
                cell: CellCoord::new(column, row),
            },
            &mut events,
        )
        .expect("tower placed");
    }
    assert_eq!(query::gold(&world), 80);
    assert!((query::total_dps(&world) - 96.0).abs() < 1e-9);

    let _ = start(&mut world);
    let history = run_until(&mut world, 2_000, |world| query::phase(world) == Phase::Prep);
    let events: Vec<Event> = history.into_iter().flatten().collect();

    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::CreepKilled { bounty: 12, .. }))
        .count();
    let leaks = events
        .iter()
        .filter(|event| matches!(event, Event::CreepLeaked { .. }))
        .count();
    assert!(kills > 0, "no creep was killed");
    assert_eq!(kills + leaks, 12);
    assert_eq!(query::lives(&world), 20 - leaks as i32);

    let before_interest = 80 + 12 * kills as u32;
    assert_eq!(query::gold(&world), before_interest * 6 / 5);

    let recorded: f64 = query::structures(&world)
        .filter_map(|structure| structure.tower())
        .map(|tower| {
            assert_eq!(tower.round_damage, 0.0);
            tower.last_round_damage
        })
        .sum();
    assert!(recorded > 0.0);
}

fn place_wall(world: &mut World, column: u32, row: u32) -> Result<Vec<Event>, ActionError> {
    let wall = query::catalog(world).tower_kind("wall").expect("wall exists");
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceStructure {
            kind: BuildKind::Tower(wall),
            cell: CellCoord::new(column, row),
        },
        &mut events,
    )?;
    Ok(events)
}

#[test]
fn mid_wave_wall_reroutes_creeps_already_walking() {
    let mut world = World::standard(4).expect("standard world");
    let _ = start(&mut world);
    for _ in 0..30 {
        let _ = tick(&mut world);
    }
    assert!(!query::creeps(&world).is_empty());
    assert!(query::creeps(&world)
        .iter()
        .all(|creep| creep.position.y() < 5.0));

    let events = place_wall(&mut world, 3, 8).expect("wall placed mid-wave");
    assert!(events.contains(&Event::PathRebuilt { length: Some(16) }));
    assert_eq!(query::path_length(&world), Some(16));

    let wall = CellCoord::new(3, 8);
    let mut leaked = 0;
    let mut ticks = 0;
    while query::phase(&world) == Phase::Wave {
        ticks += 1;
        assert!(ticks < 3_000, "wave never ended");
        let events = tick(&mut world);
        leaked += events
            .iter()
            .filter(|event| matches!(event, Event::CreepLeaked { .. }))
            .count();
        let map = query::map(&world);
        assert!(
            query::creeps(&world)
                .iter()
                .all(|creep| map.cell_containing(creep.position) != wall),
            "a creep walked through the wall"
        );
    }

    assert_eq!(leaked, 12);
    assert_eq!(query::phase(&world), Phase::Prep);
    assert_eq!(query::lives(&world), 8);
    assert_eq!(query::gold(&world), 620 * 6 / 5);
}

#[test]
fn mid_wave_placement_that_seals_the_lane_is_rejected() {
    let mut world = World::standard(4).expect("standard world");
    for column in 0..7 {
        let _ = place_wall(&mut world, column, 7).expect("gap stays open");
    }
    assert_eq!(query::path_length(&world), Some(22));
    let _ = start(&mut world);
    for _ in 0..20 {
        let _ = tick(&mut world);
    }
    let before = query::snapshot(&world);

    assert_eq!(place_wall(&mut world, 7, 7), Err(ActionError::WouldBlockPath));
    assert_eq!(query::snapshot(&world), before);
    assert_eq!(query::path_length(&world), Some(22));

    let history = run_until(&mut world, 3_000, |world| query::phase(world) == Phase::Prep);
    let leaked = history
        .iter()
        .flatten()
        .filter(|event| matches!(event, Event::CreepLeaked { .. }))
        .count();
    assert_eq!(leaked, 12);
}

fn single_wave_content(lives: i32) -> Content {
    let mut content = Content::default();
    content.config.start_lives = lives;
    content.waves = vec![WaveDefinition {
        groups: vec![WaveGroup {
            creep: "grunt".to_owned(),
            count: 2,
        }],
        spawn_interval: 1.0,
        is_boss: false,
    }];
    content
}

#[test]
fn clearing_the_last_wave_is_a_victory() {
    let mut world = World::with_content(single_wave_content(20), 2).expect("world builds");
    let _ = start(&mut world);
    let history = run_until(&mut world, 2_000, |world| query::phase(world).is_terminal());

    assert_eq!(query::phase(&world), Phase::Victory);
    let last = history.last().expect("ticks ran");
    assert!(last.contains(&Event::PhaseChanged {
        phase: Phase::Victory
    }));
    let outcome = query::outcome(&world).expect("terminal");
    assert!(outcome.victory);
    assert_eq!(outcome.waves_cleared, 1);
    assert_eq!(outcome.lives, 18);
    assert_eq!(outcome.score, 1_000 + 18 * 50 + 640);

    let frozen = query::snapshot(&world);
    assert!(tick(&mut world).is_empty());
    assert_eq!(query::snapshot(&world), frozen);
}

#[test]
fn losing_every_life_is_a_defeat() {
    let mut world = World::with_content(single_wave_content(1), 2).expect("world builds");
    let _ = start(&mut world);
    let history = run_until(&mut world, 2_000, |world| query::phase(world).is_terminal());

    assert_eq!(query::phase(&world), Phase::Defeat);
    let last = history.last().expect("ticks ran");
    assert!(last.contains(&Event::PhaseChanged {
        phase: Phase::Defeat
    }));
    let outcome = query::outcome(&world).expect("terminal");
    assert!(!outcome.victory);
    assert_eq!(outcome.waves_cleared, 0);
    assert_eq!(outcome.score, 640);
    let submission = query::score_submission(&world).expect("terminal");
    assert_eq!(submission.seed, 2);
    assert_eq!(submission.waves, 0);
}
