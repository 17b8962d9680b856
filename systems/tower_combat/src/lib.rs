#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that fires ready towers and resolves damage and slows.

use lane_defense_core::{
    Battlefield, Creep, CreepDefinition, DamageType, DeterministicRng, Event, SlowEffect,
    Structure, StructureId, TowerDefinition, TowerState,
};
use lane_defense_system_tower_targeting::{pick_target, TowerTargeting};

/// Rate at which the recoil animation value decays, per second.
const RECOIL_DECAY: f64 = 6.0;

/// Tower combat system that owns the targeting scratch buffers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    targeting: TowerTargeting,
    candidates: Vec<usize>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances tower timers by `dt` and fires every tower whose cooldown
    /// elapsed, in the order the structures are provided.
    ///
    /// Blockers and banks are skipped. A ready tower without a target keeps
    /// its cooldown at zero and tries again next tick.
    pub fn handle<'s>(
        &mut self,
        dt: f64,
        battlefield: &Battlefield<'_>,
        structures: impl IntoIterator<Item = &'s mut Structure>,
        creeps: &mut [Creep],
        rng: &mut DeterministicRng,
        out: &mut Vec<Event>,
    ) {
        for structure in structures {
            let id = structure.id;
            let cell = structure.cell;
            let Some(tower) = structure.tower_mut() else {
                continue;
            };
            let Some(definition) = battlefield.catalog.tower(tower.kind) else {
                continue;
            };
            if definition.is_blocker() {
                continue;
            }

            tower.recoil = (tower.recoil - dt * RECOIL_DECAY).max(0.0);
            tower.cooldown = (tower.cooldown - dt).max(0.0);
            if tower.cooldown > 0.0 {
                continue;
            }

            let range = definition.range_at(tower.tier, battlefield.catalog.config().range_growth);
            self.targeting
                .acquire(definition, range, cell, creeps, &mut self.candidates);
            let Some(target) =
                pick_target(tower.target_mode, &self.candidates, creeps, battlefield, rng)
            else {
                continue;
            };

            let damage = fire(
                id,
                tower,
                definition,
                battlefield,
                target,
                &self.candidates,
                creeps,
            );
            out.push(Event::TowerFired {
                tower: id,
                target: creeps[target].id,
                damage,
            });
        }
    }
}

fn fire(
    id: StructureId,
    tower: &mut TowerState,
    definition: &TowerDefinition,
    battlefield: &Battlefield<'_>,
    target: usize,
    candidates: &[usize],
    creeps: &mut [Creep],
) -> f64 {
    let config = battlefield.catalog.config();
    let Some(tier) = definition.tier(tower.tier) else {
        return 0.0;
    };
    let damage = definition.damage_at(tower.tier, &config.damage_multipliers);
    let origin = creeps[target].position;
    let mut total = 0.0;

    match tier.splash_radius {
        Some(radius) => {
            let radius_sq = radius * radius;
            for &index in candidates {
                if creeps[index].position.distance_squared(origin) <= radius_sq {
                    total += hit(&mut creeps[index], battlefield, damage, definition.damage_type);
                }
            }
        }
        None => total += hit(&mut creeps[target], battlefield, damage, definition.damage_type),
    }

    if let Some(slow) = tier.slow {
        match tier.slow_splash_radius {
            Some(radius) => {
                let radius_sq = radius * radius;
                for &index in candidates {
                    if creeps[index].position.distance_squared(origin) <= radius_sq {
                        slow_creep(&mut creeps[index], battlefield, slow);
                    }
                }
            }
            None => slow_creep(&mut creeps[target], battlefield, slow),
        }
    }

    log::trace!(
        "tower {} dealt {total:.1} to creep {}",
        id.get(),
        creeps[target].id.get()
    );
    tower.round_damage += total;
    tower.recoil = 1.0;
    tower.cooldown = 1.0 / tier.fire_rate;
    total
}

fn hit(creep: &mut Creep, battlefield: &Battlefield<'_>, raw: f64, damage_type: DamageType) -> f64 {
    battlefield
        .catalog
        .creep(creep.kind)
        .map_or(0.0, |definition| apply_damage(creep, definition, raw, damage_type))
}

fn slow_creep(creep: &mut Creep, battlefield: &Battlefield<'_>, slow: SlowEffect) {
    if let Some(definition) = battlefield.catalog.creep(creep.kind) {
        apply_slow(creep, definition, slow);
    }
}

/// Applies one hit and returns the damage actually dealt.
///
/// Resistance and armor mitigate the raw damage, the result is floored at one
/// and subtracted from the creep's hit points, which may go negative. The
/// returned value never exceeds the hit points the creep had before the hit.
pub fn apply_damage(
    creep: &mut Creep,
    definition: &CreepDefinition,
    raw: f64,
    damage_type: DamageType,
) -> f64 {
    let mitigated = raw * definition.resist.factor(damage_type) * (1.0 - definition.armor);
    let applied = mitigated.max(1.0);
    let dealt = creep.hp.min(applied);
    creep.hp -= applied;
    dealt
}

/// Applies a slow, keeping the strongest multiplier and longest duration of
/// overlapping slows. Slow-immune creeps are unaffected.
pub fn apply_slow(creep: &mut Creep, definition: &CreepDefinition, slow: SlowEffect) {
    if definition.slow_immune {
        return;
    }
    if creep.slow_timer <= 0.0 {
        creep.slow_multiplier = slow.multiplier;
        creep.slow_timer = slow.duration;
        return;
    }
    creep.slow_multiplier = creep.slow_multiplier.min(slow.multiplier);
    creep.slow_timer = creep.slow_timer.max(slow.duration);
}
