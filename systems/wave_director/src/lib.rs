#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director that turns scripted waves into spawns.
//!
//! At the start of every wave the director expands the wave's groups into a
//! queue, shuffles it once with the shared random stream and then releases one
//! creep kind per spawn interval until the queue runs dry.

use lane_defense_core::{
    CellPoint, Creep, CreepDefinition, CreepId, CreepKind, DeterministicRng, GameConfig,
    ResolvedWave,
};

/// Pure system that owns the spawn queue of the current wave.
#[derive(Debug, Default)]
pub struct WaveDirector {
    queue: Vec<CreepKind>,
    cursor: usize,
    cooldown: f64,
    spawn_interval: f64,
}

impl WaveDirector {
    /// Creates an idle director with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and shuffles the queue for a new wave.
    ///
    /// The first creep spawns on the first tick of the wave. Returns the number
    /// of creeps queued.
    pub fn begin_wave(&mut self, wave: &ResolvedWave, rng: &mut DeterministicRng) -> usize {
        self.queue.clear();
        for &(kind, count) in &wave.groups {
            self.queue.extend(std::iter::repeat(kind).take(count as usize));
        }
        rng.shuffle(&mut self.queue);
        self.cursor = 0;
        self.cooldown = 0.0;
        self.spawn_interval = wave.spawn_interval;
        log::debug!("queued {} creeps", self.queue.len());
        self.queue.len()
    }

    /// Advances the spawn cooldown and releases the next creep kind when due.
    ///
    /// At most one creep is released per call.
    pub fn handle(&mut self, dt: f64) -> Option<CreepKind> {
        if self.is_exhausted() {
            return None;
        }
        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return None;
        }
        let kind = self.queue[self.cursor];
        self.cursor += 1;
        self.cooldown = self.spawn_interval;
        Some(kind)
    }

    /// Reports whether every queued creep has been released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    /// Number of creeps still waiting to spawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.cursor)
    }
}

/// Instantiates a creep for the one-based wave at the provided spawn point.
///
/// Hit points and speed grow linearly with the wave number.
#[must_use]
pub fn spawn_creep(
    id: CreepId,
    kind: CreepKind,
    definition: &CreepDefinition,
    config: &GameConfig,
    wave: u32,
    spawn: CellPoint,
) -> Creep {
    let waves_elapsed = f64::from(wave.saturating_sub(1));
    let hp_scale = 1.0 + waves_elapsed * config.wave_hp_scale;
    let speed_scale = 1.0 + waves_elapsed * config.wave_speed_scale;
    let hp = definition.hp * config.base_hp_mult * hp_scale;
    Creep {
        id,
        kind,
        hp,
        max_hp: hp,
        speed: definition.speed * config.base_speed_mult * speed_scale,
        position: spawn,
        is_flying: definition.is_flying,
        slow_multiplier: 1.0,
        slow_timer: 0.0,
        air_distance: 0.0,
    }
}
