#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lane Defense headlessly.

mod content;
mod replay;
mod script;
mod session;

use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use lane_defense_core::{DeterministicRng, GridMap};
use lane_defense_world::World;
use log::info;

use crate::{script::Script, session::Summary};

#[derive(Debug, Parser)]
#[command(name = "lane-defense", version, about = "Headless Lane Defense simulation")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Simulates one game, optionally following a scripted build order.
    Run(RunArgs),
    /// Plays random actions twice and verifies both runs match.
    ReplayCheck(ReplayArgs),
}

#[derive(Debug, Args)]
struct WorldArgs {
    /// Numeric seed of the game.
    #[arg(long, default_value_t = 1)]
    seed: u32,
    /// Text hashed into the seed, overriding `--seed`.
    #[arg(long)]
    seed_text: Option<String>,
    /// TOML file overriding the shipped content tables.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.1)]
    tick: f64,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    world: WorldArgs,
    /// TOML file with scheduled player actions.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Tick budget before the run is cut short.
    #[arg(long, default_value_t = 30_000)]
    max_ticks: u64,
    /// Prints the final report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    #[command(flatten)]
    world: WorldArgs,
    /// Seed of the random action generator.
    #[arg(long, default_value_t = 0)]
    action_seed: u64,
    /// Number of random actions to schedule.
    #[arg(long, default_value_t = 64)]
    actions: usize,
    /// Tick budget of each run.
    #[arg(long, default_value_t = 6_000)]
    max_ticks: u64,
}

/// Entry point for the Lane Defense command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().mode {
        Mode::Run(args) => run(args),
        Mode::ReplayCheck(args) => replay_check(args),
    }
}

impl WorldArgs {
    fn seed(&self) -> u32 {
        self.seed_text
            .as_deref()
            .map_or(self.seed, DeterministicRng::seed_from_str)
    }

    fn tick_length(&self) -> Result<Duration> {
        ensure!(
            self.tick.is_finite() && self.tick > 0.0,
            "tick length must be a positive number of seconds, got {}",
            self.tick
        );
        Ok(Duration::from_secs_f64(self.tick))
    }

    fn build(&self) -> Result<World> {
        let catalog = content::load_catalog(self.content.as_deref())?;
        let map = GridMap::standard().context("default map is invalid")?;
        Ok(World::new(catalog, map, self.seed()))
    }
}

fn run(args: RunArgs) -> Result<()> {
    let dt = args.world.tick_length()?;
    let world = args.world.build()?;
    let schedule = match &args.script {
        Some(path) => Script::load(path)?.schedule(lane_defense_world::query::catalog(&world))?,
        None => BTreeMap::new(),
    };
    info!(
        "running seed {} with {} scheduled ticks",
        args.world.seed(),
        schedule.len()
    );

    let summary = session::drive(world, dt, &schedule, args.max_ticks)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    let snapshot = &summary.snapshot;
    println!("ticks:    {}", summary.ticks);
    println!("phase:    {:?}", snapshot.phase);
    println!("wave:     {}/{}", snapshot.wave, snapshot.wave_count);
    println!("lives:    {}", snapshot.lives);
    println!("gold:     {}", snapshot.gold);
    println!("rejected: {}", summary.rejected);
    match (&summary.outcome, &summary.submission) {
        (Some(outcome), Some(submission)) => {
            println!("victory:  {}", outcome.victory);
            println!("score:    {} ({} waves)", submission.score, submission.waves);
        }
        _ => println!("score:    game still running"),
    }
    println!("digest:   {:016x}", summary.fingerprint);
}

fn replay_check(args: ReplayArgs) -> Result<()> {
    let dt = args.world.tick_length()?;
    let first_world = args.world.build()?;
    let schedule = replay::random_schedule(
        args.action_seed,
        lane_defense_world::query::catalog(&first_world),
        lane_defense_world::query::map(&first_world),
        args.actions,
        args.max_ticks,
    );
    let second_world = args.world.build()?;

    let first = session::drive(first_world, dt, &schedule, args.max_ticks)?;
    let second = session::drive(second_world, dt, &schedule, args.max_ticks)?;

    ensure!(
        first.fingerprint == second.fingerprint && first.snapshot == second.snapshot,
        "replay diverged: {:016x} != {:016x}",
        first.fingerprint,
        second.fingerprint
    );
    info!(
        "replay matched after {} ticks ({} rejected actions)",
        first.ticks, first.rejected
    );
    println!("{:016x}", first.fingerprint);
    Ok(())
}
