#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defense.
//!
//! The [`World`] owns the map, the distance field, every structure and creep,
//! the treasury and the single random stream of a game. Adapters mutate it
//! exclusively through [`apply`] and observe it through the [`query`] module.
//! Each tick runs the systems in a fixed order: the wave director may spawn a
//! creep, creeps move, towers fire, dead creeps are reaped and finally the
//! phase machine decides whether the wave ended.

mod navigation;
mod structures;

use std::time::Duration;

use lane_defense_core::{
    ActionError, AirPath, Battlefield, BuildKind, Catalog, CellCoord, Command, Content,
    ContentError, Creep, CreepId, CreepKind, DeterministicRng, Event, GridMap, MapError, Phase,
    Structure, StructureId, StructureKind, TowerState, UNREACHABLE,
};
use lane_defense_system_economy as economy;
use lane_defense_system_movement::Movement;
use lane_defense_system_tower_combat::TowerCombat;
use lane_defense_system_wave_director::{spawn_creep, WaveDirector};
use log::{debug, info};
use thiserror::Error;

pub use navigation::{compute_distances, NavigationField};
use structures::StructureRegistry;

/// Simulated time covered by one tick of the reference driver.
pub const TICK_LENGTH: Duration = Duration::from_millis(100);

/// Errors raised while creating a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The content tables failed validation.
    #[error("invalid content: {0}")]
    Content(#[from] ContentError),
    /// The map could not be built.
    #[error("invalid map: {0}")]
    Map(#[from] MapError),
}

/// Represents the authoritative state of one Lane Defense game.
#[derive(Debug)]
pub struct World {
    catalog: Catalog,
    map: GridMap,
    air_path: AirPath,
    navigation: NavigationField,
    path_length: Option<u32>,
    structures: StructureRegistry,
    creeps: Vec<Creep>,
    gold: u32,
    lives: i32,
    wave: u32,
    phase: Phase,
    phase_timer: f64,
    tick_index: u64,
    seed: u32,
    rng: DeterministicRng,
    next_id: u32,
    director: WaveDirector,
    movement: Movement,
    combat: TowerCombat,
}

impl World {
    /// Creates a world in the prep phase of wave one.
    #[must_use]
    pub fn new(catalog: Catalog, map: GridMap, seed: u32) -> Self {
        let config = catalog.config();
        let (gold, lives, phase_timer) =
            (config.start_gold, config.start_lives, config.prep_duration);
        let structures = StructureRegistry::new(map.width(), map.height());
        let mut world = Self {
            gold,
            lives,
            phase_timer,
            air_path: map.air_path(),
            navigation: NavigationField::default(),
            path_length: None,
            structures,
            creeps: Vec::new(),
            wave: 1,
            phase: Phase::Prep,
            tick_index: 0,
            seed,
            rng: DeterministicRng::new(seed),
            next_id: 1,
            director: WaveDirector::new(),
            movement: Movement::new(),
            combat: TowerCombat::new(),
            catalog,
            map,
        };
        world.refresh_navigation();
        world
    }

    /// Creates a world with the shipped content on the default lane map.
    pub fn standard(seed: u32) -> Result<Self, WorldError> {
        Self::with_content(Content::default(), seed)
    }

    /// Creates a world with custom content on the default lane map.
    pub fn with_content(content: Content, seed: u32) -> Result<Self, WorldError> {
        let catalog = Catalog::new(content)?;
        let map = GridMap::standard()?;
        Ok(Self::new(catalog, map, seed))
    }

    fn refresh_navigation(&mut self) {
        let structures = &self.structures;
        let map = &self.map;
        self.navigation
            .rebuild_with(map.width(), map.height(), map.exit(), |cell| {
                structures.is_occupied(cell) || !map.is_passable(cell)
            });
        self.path_length = self
            .navigation
            .distance(map.spawn())
            .filter(|distance| *distance != UNREACHABLE);
    }

    fn rebuild_path(&mut self, out_events: &mut Vec<Event>) {
        self.refresh_navigation();
        out_events.push(Event::PathRebuilt {
            length: self.path_length,
        });
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn placement_check(&self, cell: CellCoord) -> Result<(), ActionError> {
        if !self.map.contains(cell) {
            return Err(ActionError::OutOfBounds);
        }
        if self.structures.is_occupied(cell) {
            return Err(ActionError::Occupied);
        }
        if !self.map.is_buildable(cell) {
            return Err(ActionError::Unbuildable);
        }
        let speculative = compute_distances(&self.map, |candidate| {
            candidate == cell || self.structures.is_occupied(candidate)
        });
        if !speculative.view().is_reachable(self.map.spawn()) {
            return Err(ActionError::WouldBlockPath);
        }
        Ok(())
    }

    fn begin_wave(&mut self, out_events: &mut Vec<Event>) {
        let queued = match self.catalog.wave(self.wave) {
            Some(wave) => self.director.begin_wave(wave, &mut self.rng),
            None => 0,
        };
        self.phase = Phase::Wave;
        self.phase_timer = 0.0;
        info!("wave {} started with {queued} creeps", self.wave);
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            queued,
        });
        out_events.push(Event::PhaseChanged { phase: Phase::Wave });
    }

    fn spawn(&mut self, kind: CreepKind, out_events: &mut Vec<Event>) {
        let id = CreepId::new(self.allocate_id());
        // Wave kinds are resolved against the catalog, so the lookup holds.
        let Some(definition) = self.catalog.creep(kind) else {
            return;
        };
        let creep = spawn_creep(
            id,
            kind,
            definition,
            self.catalog.config(),
            self.wave,
            self.map.spawn().center(),
        );
        debug!("spawned {} as creep {}", definition.name, id.get());
        self.creeps.push(creep);
        out_events.push(Event::CreepSpawned { creep: id, kind });
    }

    fn advance_wave(&mut self, dt: f64, out_events: &mut Vec<Event>) {
        if let Some(kind) = self.director.handle(dt) {
            self.spawn(kind, out_events);
        }

        let battlefield = Battlefield {
            catalog: &self.catalog,
            map: &self.map,
            navigation: self.navigation.view(),
            air_path: &self.air_path,
        };
        let lives_lost = self
            .movement
            .handle(dt, &battlefield, &mut self.creeps, out_events);
        self.lives -= lives_lost;
        self.combat.handle(
            dt,
            &battlefield,
            self.structures.iter_mut(),
            &mut self.creeps,
            &mut self.rng,
            out_events,
        );

        let catalog = &self.catalog;
        let mut bounties = 0u32;
        self.creeps.retain(|creep| {
            if creep.is_alive() {
                return true;
            }
            let bounty = catalog.creep(creep.kind).map_or(0, economy::bounty);
            debug!("creep {} killed for {bounty} gold", creep.id.get());
            bounties = bounties.saturating_add(bounty);
            out_events.push(Event::CreepKilled {
                creep: creep.id,
                bounty,
            });
            false
        });
        self.gold = self.gold.saturating_add(bounties);

        if self.lives <= 0 {
            self.phase = Phase::Defeat;
            info!("defeat on wave {}", self.wave);
            out_events.push(Event::PhaseChanged {
                phase: Phase::Defeat,
            });
            return;
        }

        if self.director.is_exhausted() && self.creeps.is_empty() {
            self.finish_wave(out_events);
        }
    }

    fn finish_wave(&mut self, out_events: &mut Vec<Event>) {
        for structure in self.structures.iter_mut() {
            if let Some(tower) = structure.tower_mut() {
                tower.last_round_damage = tower.round_damage.round();
                tower.round_damage = 0.0;
            }
        }

        let cleared = self.wave;
        if cleared >= self.catalog.wave_count() {
            self.phase = Phase::Victory;
            info!("victory after wave {cleared}");
            out_events.push(Event::WaveCleared {
                wave: cleared,
                bank_income: 0,
                interest: 0,
            });
            out_events.push(Event::PhaseChanged {
                phase: Phase::Victory,
            });
            return;
        }

        let payout = economy::wave_payout(
            self.gold,
            self.structures.bank_count(),
            self.catalog.bank(),
            self.catalog.config(),
        );
        self.gold = self.gold.saturating_add(payout.total());
        self.wave += 1;
        self.phase = Phase::Prep;
        self.phase_timer = self.catalog.config().prep_duration;
        info!(
            "wave {cleared} cleared: {} bank income, {} interest",
            payout.bank_income, payout.interest
        );
        out_events.push(Event::WaveCleared {
            wave: cleared,
            bank_income: payout.bank_income,
            interest: payout.interest,
        });
        out_events.push(Event::PhaseChanged { phase: Phase::Prep });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and emit no events. Ticks in a
/// terminal phase are accepted but change nothing.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ActionError> {
    match command {
        Command::Tick { dt } => {
            if world.phase.is_terminal() {
                return Ok(());
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            let seconds = dt.as_secs_f64();

            if world.phase == Phase::Prep {
                world.phase_timer = (world.phase_timer - seconds).max(0.0);
                if world.phase_timer <= 0.0 {
                    world.begin_wave(out_events);
                }
            }

            if world.phase == Phase::Wave {
                world.advance_wave(seconds, out_events);
            }
        }
        Command::PlaceStructure { kind, cell } => {
            ensure_active(world)?;
            let cost = match kind {
                BuildKind::Tower(tower) => world
                    .catalog
                    .tower(tower)
                    .and_then(|definition| definition.tiers.first())
                    .map(|tier| tier.cost)
                    .ok_or(ActionError::UnknownKind)?,
                BuildKind::Bank => world.catalog.bank().cost,
            };
            world.placement_check(cell)?;
            ensure_affordable(world, cost)?;

            world.gold -= cost;
            let id = StructureId::new(world.allocate_id());
            let structure_kind = match kind {
                BuildKind::Tower(tower) => StructureKind::Tower(TowerState::new(tower)),
                BuildKind::Bank => StructureKind::Bank,
            };
            world.structures.insert(Structure {
                id,
                cell,
                spent: cost,
                kind: structure_kind,
            });
            debug!(
                "placed structure {} at ({}, {}) for {cost} gold",
                id.get(),
                cell.column(),
                cell.row()
            );
            out_events.push(Event::StructurePlaced {
                structure: id,
                kind,
                cell,
            });
            world.rebuild_path(out_events);
        }
        Command::SellStructure { structure } => {
            ensure_active(world)?;
            let removed = world
                .structures
                .remove(structure)
                .ok_or(ActionError::UnknownStructure)?;
            let refund = economy::sell_value(removed.spent, world.catalog.config());
            world.gold = world.gold.saturating_add(refund);
            debug!("sold structure {} for {refund} gold", structure.get());
            out_events.push(Event::StructureSold {
                structure,
                cell: removed.cell,
                refund,
            });
            world.rebuild_path(out_events);
        }
        Command::UpgradeTower { structure } => {
            ensure_active(world)?;
            let tower = world
                .structures
                .get(structure)
                .ok_or(ActionError::UnknownStructure)?
                .tower()
                .ok_or(ActionError::NotATower)?;
            let (kind, tier) = (tower.kind, tower.tier);
            let definition = world.catalog.tower(kind).ok_or(ActionError::UnknownKind)?;
            if tier >= definition.max_tier() {
                return Err(ActionError::MaxTier);
            }
            let cost = definition
                .tiers
                .get(usize::from(tier) + 1)
                .map(|next| next.cost)
                .ok_or(ActionError::MaxTier)?;
            ensure_affordable(world, cost)?;

            world.gold -= cost;
            if let Some(upgraded) = world.structures.get_mut(structure) {
                upgraded.spent = upgraded.spent.saturating_add(cost);
                if let Some(tower) = upgraded.tower_mut() {
                    tower.tier += 1;
                    debug!("upgraded tower {} to tier {}", structure.get(), tower.tier);
                    out_events.push(Event::TowerUpgraded {
                        structure,
                        tier: tower.tier,
                    });
                }
            }
        }
        Command::SetTargetMode { structure, mode } => {
            ensure_active(world)?;
            let tower = world
                .structures
                .get_mut(structure)
                .ok_or(ActionError::UnknownStructure)?
                .tower_mut()
                .ok_or(ActionError::NotATower)?;
            tower.target_mode = mode;
            out_events.push(Event::TargetModeChanged { structure, mode });
        }
        Command::StartNextWave => {
            ensure_active(world)?;
            if world.phase != Phase::Prep {
                return Err(ActionError::WaveInProgress);
            }
            world.begin_wave(out_events);
        }
    }
    Ok(())
}

fn ensure_active(world: &World) -> Result<(), ActionError> {
    if world.phase.is_terminal() {
        Err(ActionError::GameOver)
    } else {
        Ok(())
    }
}

fn ensure_affordable(world: &World, cost: u32) -> Result<(), ActionError> {
    if world.gold < cost {
        Err(ActionError::InsufficientGold {
            required: cost,
            available: world.gold,
        })
    } else {
        Ok(())
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defense_core::{
        AirPath, Battlefield, Catalog, CellCoord, Creep, GridMap, NavigationFieldView, Phase,
        Structure, StructureId,
    };
    use lane_defense_system_economy::{self as economy, ScoreSubmission};
    use serde::{Deserialize, Serialize};

    use super::World;

    /// Validated content the world was created with.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Immutable map of the game.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        &world.map
    }

    /// Flight path followed by flying creeps.
    #[must_use]
    pub fn air_path(world: &World) -> &AirPath {
        &world.air_path
    }

    /// Read-only view of the current distance field.
    #[must_use]
    pub fn navigation_view(world: &World) -> NavigationFieldView<'_> {
        world.navigation.view()
    }

    /// Bundles the read-only views systems operate on.
    #[must_use]
    pub fn battlefield(world: &World) -> Battlefield<'_> {
        Battlefield {
            catalog: &world.catalog,
            map: &world.map,
            navigation: world.navigation.view(),
            air_path: &world.air_path,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// One-based number of the current wave.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Gold held by the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Lives left; may be negative once the game is lost.
    #[must_use]
    pub fn lives(world: &World) -> i32 {
        world.lives
    }

    /// Seconds left in the prep phase, zero otherwise.
    #[must_use]
    pub fn phase_timer(world: &World) -> f64 {
        world.phase_timer
    }

    /// Seed the world was created with.
    #[must_use]
    pub fn seed(world: &World) -> u32 {
        world.seed
    }

    /// Number of ticks processed outside terminal phases.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Creeps currently on the map.
    #[must_use]
    pub fn creeps(world: &World) -> &[Creep] {
        &world.creeps
    }

    /// Every structure in placement order.
    pub fn structures(world: &World) -> impl Iterator<Item = &Structure> {
        world.structures.iter()
    }

    /// Looks up a structure by identifier.
    #[must_use]
    pub fn structure(world: &World, id: StructureId) -> Option<&Structure> {
        world.structures.get(id)
    }

    /// Structure occupying the cell, if any.
    #[must_use]
    pub fn structure_at(world: &World, cell: CellCoord) -> Option<&Structure> {
        world
            .structures
            .at(cell)
            .and_then(|id| world.structures.get(id))
    }

    /// Hop count from the spawn to the exit, `None` when the path is blocked.
    #[must_use]
    pub fn path_length(world: &World) -> Option<u32> {
        world.path_length
    }

    /// Reports whether a structure could be placed on the cell right now,
    /// ignoring gold.
    #[must_use]
    pub fn can_place_structure(world: &World, cell: CellCoord) -> bool {
        world.placement_check(cell).is_ok()
    }

    /// Gold the structure would refund if sold.
    #[must_use]
    pub fn sell_value(world: &World, id: StructureId) -> Option<u32> {
        world
            .structures
            .get(id)
            .map(|structure| economy::sell_value(structure.spent, world.catalog.config()))
    }

    /// Cost of the tower's next tier, `None` for banks and maxed towers.
    #[must_use]
    pub fn upgrade_cost(world: &World, id: StructureId) -> Option<u32> {
        let tower = world.structures.get(id)?.tower()?;
        let definition = world.catalog.tower(tower.kind)?;
        definition
            .tiers
            .get(usize::from(tower.tier) + 1)
            .map(|tier| tier.cost)
    }

    /// Nominal damage per second of every tower combined.
    #[must_use]
    pub fn total_dps(world: &World) -> f64 {
        let multipliers = &world.catalog.config().damage_multipliers;
        world
            .structures
            .iter()
            .filter_map(Structure::tower)
            .filter_map(|tower| {
                let definition = world.catalog.tower(tower.kind)?;
                let tier = definition.tier(tower.tier)?;
                Some(definition.damage_at(tower.tier, multipliers) * tier.fire_rate)
            })
            .sum()
    }

    /// Gold banks will pay when the current wave is cleared.
    #[must_use]
    pub fn bank_income(world: &World) -> u32 {
        let banks = u32::try_from(world.structures.bank_count()).unwrap_or(u32::MAX);
        world.catalog.bank().income.saturating_mul(banks)
    }

    /// Creeps of the current wave still waiting to spawn.
    #[must_use]
    pub fn pending_spawns(world: &World) -> usize {
        world.director.remaining()
    }

    /// Captures the complete observable state of the world.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            tick: world.tick_index,
            phase: world.phase,
            phase_timer: world.phase_timer,
            wave: world.wave,
            wave_count: world.catalog.wave_count(),
            gold: world.gold,
            lives: world.lives,
            path_length: world.path_length,
            pending_spawns: world.director.remaining(),
            next_id: world.next_id,
            rng_state: world.rng.state(),
            creeps: world.creeps.clone(),
            structures: world.structures.iter().cloned().collect(),
        }
    }

    /// Final result once the game reached a terminal phase.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        if !world.phase.is_terminal() {
            return None;
        }
        let waves_cleared =
            economy::waves_cleared(world.phase, world.wave, world.catalog.wave_count());
        Some(Outcome {
            victory: world.phase == Phase::Victory,
            waves_cleared,
            lives: world.lives,
            gold: world.gold,
            score: economy::score(waves_cleared, world.lives, world.gold),
        })
    }

    /// Leaderboard payload once the game reached a terminal phase.
    #[must_use]
    pub fn score_submission(world: &World) -> Option<ScoreSubmission> {
        outcome(world).map(|outcome| ScoreSubmission {
            score: outcome.score,
            waves: outcome.waves_cleared,
            seed: world.seed,
        })
    }

    /// Complete observable state of a world at one instant.
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct WorldSnapshot {
        /// Ticks processed so far.
        pub tick: u64,
        /// Current phase.
        pub phase: Phase,
        /// Seconds left in the prep phase.
        pub phase_timer: f64,
        /// One-based wave number.
        pub wave: u32,
        /// Number of waves in the game.
        pub wave_count: u32,
        /// Gold held.
        pub gold: u32,
        /// Lives left.
        pub lives: i32,
        /// Hop count from spawn to exit.
        pub path_length: Option<u32>,
        /// Creeps still queued in the current wave.
        pub pending_spawns: usize,
        /// Next identifier to be allocated.
        pub next_id: u32,
        /// State of the random stream.
        pub rng_state: u32,
        /// Creeps on the map.
        pub creeps: Vec<Creep>,
        /// Structures in placement order.
        pub structures: Vec<Structure>,
    }

    /// Result of a finished game.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Outcome {
        /// Whether every wave was cleared.
        pub victory: bool,
        /// Waves counted for scoring.
        pub waves_cleared: u32,
        /// Lives left.
        pub lives: i32,
        /// Gold held.
        pub gold: u32,
        /// Final score.
        pub score: u64,
    }
}
