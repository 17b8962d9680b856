//! Headless driver that feeds scheduled commands and fixed ticks to a world.

use std::{
    collections::{hash_map::DefaultHasher, BTreeMap},
    hash::{Hash, Hasher},
    time::Duration,
};

use anyhow::{Context, Result};
use lane_defense_core::{Command, Event};
use lane_defense_system_economy::ScoreSubmission;
use lane_defense_world::{
    self as world,
    query::{self, Outcome, WorldSnapshot},
    World,
};
use log::{info, warn};
use serde::Serialize;

/// Result of driving a world until it ended or ran out of ticks.
#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) rejected: usize,
    pub(crate) fingerprint: u64,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) submission: Option<ScoreSubmission>,
    pub(crate) snapshot: WorldSnapshot,
}

/// Runs the world tick by tick, applying scheduled commands before each tick.
pub(crate) fn drive(
    mut world: World,
    dt: Duration,
    schedule: &BTreeMap<u64, Vec<Command>>,
    max_ticks: u64,
) -> Result<Summary> {
    let mut hasher = DefaultHasher::new();
    let mut rejected = 0;
    let mut events = Vec::new();
    let mut tick = 0;

    while tick < max_ticks && !query::phase(&world).is_terminal() {
        if let Some(commands) = schedule.get(&tick) {
            for command in commands {
                events.clear();
                if let Err(error) = world::apply(&mut world, command.clone(), &mut events) {
                    warn!("tick {tick}: {command:?} rejected: {error}");
                    rejected += 1;
                }
                record(&events, &mut hasher);
            }
        }

        events.clear();
        if let Err(error) = world::apply(&mut world, Command::Tick { dt }, &mut events) {
            warn!("tick {tick} rejected: {error}");
        }
        announce(&events, &world);
        record(&events, &mut hasher);
        tick += 1;
    }

    let snapshot = query::snapshot(&world);
    serde_json::to_string(&snapshot)
        .context("failed to serialise the final snapshot")?
        .hash(&mut hasher);

    Ok(Summary {
        ticks: tick,
        rejected,
        fingerprint: hasher.finish(),
        outcome: query::outcome(&world),
        submission: query::score_submission(&world),
        snapshot,
    })
}

fn announce(events: &[Event], world: &World) {
    for event in events {
        if let Event::WaveCleared { wave, .. } = event {
            info!(
                "after wave {wave}: {} lives, {} gold",
                query::lives(world),
                query::gold(world)
            );
        }
    }
}

fn record(events: &[Event], hasher: &mut DefaultHasher) {
    for event in events {
        format!("{event:?}").hash(hasher);
    }
}
