//! Data-driven content tables and their validated lookup form.
//!
//! [`Content`] is the serialisable description of towers, the bank, creeps and
//! waves. It is turned into a [`Catalog`] exactly once per game; the catalog
//! guarantees every invariant the tick loop relies on, so systems never
//! re-check content while simulating.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DamageType, TargetPriority};

/// Handle identifying a tower definition inside a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerKind(u16);

impl TowerKind {
    /// Creates a tower kind from its catalog index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Catalog index of the tower kind.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Handle identifying a creep definition inside a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepKind(u16);

impl CreepKind {
    /// Creates a creep kind from its catalog index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Catalog index of the creep kind.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Global balance knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gold available when the game starts.
    pub start_gold: u32,
    /// Lives available when the game starts.
    pub start_lives: i32,
    /// Multiplier applied to every creep's base hit points.
    pub base_hp_mult: f64,
    /// Multiplier applied to every creep's base speed.
    pub base_speed_mult: f64,
    /// Fractional hit point growth per wave after the first.
    pub wave_hp_scale: f64,
    /// Fractional speed growth per wave after the first.
    pub wave_speed_scale: f64,
    /// Share of the spent gold refunded when selling.
    pub sell_refund: f64,
    /// Interest paid on held gold when a wave is cleared.
    pub interest_rate: f64,
    /// Length of the build window between waves, in seconds.
    pub prep_duration: f64,
    /// Damage multiplier per tower tier; the last entry applies beyond its end.
    pub damage_multipliers: Vec<f64>,
    /// Range growth factor applied once per tier.
    pub range_growth: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_gold: 640,
            start_lives: 20,
            base_hp_mult: 1.0,
            base_speed_mult: 1.0,
            wave_hp_scale: 0.22,
            wave_speed_scale: 0.05,
            sell_refund: 0.65,
            interest_rate: 0.2,
            prep_duration: 20.0,
            damage_multipliers: vec![1.0, 1.4, 2.1, 2.5, 3.0],
            range_growth: 1.1,
        }
    }
}

/// Slow applied by a tower hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Speed multiplier while slowed.
    pub multiplier: f64,
    /// Duration of the slow in seconds.
    pub duration: f64,
}

/// Statistics of one tower tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTier {
    /// Gold required to build (tier zero) or upgrade into this tier.
    pub cost: u32,
    /// Base damage; only tier zero's value feeds the scaled damage.
    pub damage: f64,
    /// Base range; only tier zero's value feeds the scaled range.
    pub range: f64,
    /// Shots per second.
    pub fire_rate: f64,
    /// Radius of area damage around the primary target.
    #[serde(default)]
    pub splash_radius: Option<f64>,
    /// Slow applied on hit.
    #[serde(default)]
    pub slow: Option<SlowEffect>,
    /// Radius of area slow around the primary target.
    #[serde(default)]
    pub slow_splash_radius: Option<f64>,
}

/// Static description of a buildable tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerDefinition {
    /// Unique name used by scripts and content files.
    pub name: String,
    /// Damage channel of every shot.
    pub damage_type: DamageType,
    /// Whether ground creeps are valid targets.
    pub can_hit_ground: bool,
    /// Whether flying creeps are valid targets.
    pub can_hit_air: bool,
    /// Preferred flight class.
    pub priority: TargetPriority,
    /// Upgrade ladder; index zero is the freshly built tower.
    pub tiers: Vec<TowerTier>,
}

impl TowerDefinition {
    /// Reports whether the tower only blocks the path and never fires.
    #[must_use]
    pub fn is_blocker(&self) -> bool {
        !self.can_hit_ground && !self.can_hit_air
    }

    /// Highest tier index the tower can reach.
    #[must_use]
    pub fn max_tier(&self) -> u8 {
        u8::try_from(self.tiers.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    /// Statistics of the requested tier, clamped to the last defined tier.
    #[must_use]
    pub fn tier(&self, tier: u8) -> Option<&TowerTier> {
        self.tiers
            .get(usize::from(tier))
            .or_else(|| self.tiers.last())
    }

    /// Damage dealt per shot at the provided tier.
    #[must_use]
    pub fn damage_at(&self, tier: u8, multipliers: &[f64]) -> f64 {
        let Some(base) = self.tiers.first() else {
            return 0.0;
        };
        let index = usize::from(tier).min(multipliers.len().saturating_sub(1));
        let multiplier = multipliers.get(index).copied().unwrap_or(1.0);
        (base.damage * multiplier).round()
    }

    /// Reach of the tower at the provided tier, rounded to two decimals.
    #[must_use]
    pub fn range_at(&self, tier: u8, growth: f64) -> f64 {
        let Some(base) = self.tiers.first() else {
            return 0.0;
        };
        let range = base.range * growth.powi(i32::from(tier));
        (range * 100.0).round() / 100.0
    }
}

/// Economy building.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankDefinition {
    /// Gold required to build a bank.
    pub cost: u32,
    /// Gold paid per bank whenever a wave is cleared.
    pub income: u32,
}

impl Default for BankDefinition {
    fn default() -> Self {
        Self {
            cost: 100,
            income: 50,
        }
    }
}

/// Per damage type multipliers; a missing entry means no resistance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resistances {
    /// Multiplier applied to physical damage.
    pub physical: Option<f64>,
    /// Multiplier applied to arcane damage.
    pub arcane: Option<f64>,
    /// Multiplier applied to siege damage.
    pub siege: Option<f64>,
}

impl Resistances {
    /// Damage multiplier for the provided damage type.
    #[must_use]
    pub fn factor(&self, damage_type: DamageType) -> f64 {
        let value = match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Arcane => self.arcane,
            DamageType::Siege => self.siege,
        };
        value.unwrap_or(1.0)
    }

    fn entries(&self) -> [Option<f64>; 3] {
        [self.physical, self.arcane, self.siege]
    }
}

/// Static description of a creep type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreepDefinition {
    /// Unique name used by wave tables.
    pub name: String,
    /// Hit points before wave scaling.
    pub hp: f64,
    /// Cells per second before wave scaling.
    pub speed: f64,
    /// Fraction of incoming damage absorbed.
    pub armor: f64,
    /// Damage type multipliers.
    #[serde(default)]
    pub resist: Resistances,
    /// Gold awarded when the creep dies.
    pub bounty: f64,
    /// Lives removed when the creep reaches the exit.
    pub leak_damage: i32,
    /// Whether the creep follows the flight path.
    #[serde(default)]
    pub is_flying: bool,
    /// Whether the creep headlines a boss wave.
    #[serde(default)]
    pub is_boss: bool,
    /// Whether slows are ignored.
    #[serde(default)]
    pub slow_immune: bool,
}

/// A count of one creep type inside a wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Name of the creep definition.
    pub creep: String,
    /// Number of creeps queued.
    pub count: u32,
}

/// Scripted composition of a single wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Groups merged into the shuffled spawn queue.
    pub groups: Vec<WaveGroup>,
    /// Seconds between consecutive spawns.
    pub spawn_interval: f64,
    /// Whether the wave is flagged as a boss wave.
    #[serde(default)]
    pub is_boss: bool,
}

/// Complete content tables for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Global balance knobs.
    pub config: GameConfig,
    /// Buildable towers in menu order.
    pub towers: Vec<TowerDefinition>,
    /// Economy building.
    pub bank: BankDefinition,
    /// Creep types.
    pub creeps: Vec<CreepDefinition>,
    /// Waves in play order.
    pub waves: Vec<WaveDefinition>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            towers: default_towers(),
            bank: BankDefinition::default(),
            creeps: default_creeps(),
            waves: default_waves(),
        }
    }
}

fn tier(cost: u32, damage: f64, range: f64, fire_rate: f64) -> TowerTier {
    TowerTier {
        cost,
        damage,
        range,
        fire_rate,
        splash_radius: None,
        slow: None,
        slow_splash_radius: None,
    }
}

fn splash_tier(cost: u32, damage: f64, range: f64, fire_rate: f64, radius: f64) -> TowerTier {
    TowerTier {
        splash_radius: Some(radius),
        ..tier(cost, damage, range, fire_rate)
    }
}

fn slow_tier(
    cost: u32,
    damage: f64,
    range: f64,
    fire_rate: f64,
    slow: (f64, f64),
    slow_splash_radius: Option<f64>,
) -> TowerTier {
    TowerTier {
        slow: Some(SlowEffect {
            multiplier: slow.0,
            duration: slow.1,
        }),
        slow_splash_radius,
        ..tier(cost, damage, range, fire_rate)
    }
}

fn tower(
    name: &str,
    damage_type: DamageType,
    hits: (bool, bool),
    priority: TargetPriority,
    tiers: Vec<TowerTier>,
) -> TowerDefinition {
    TowerDefinition {
        name: name.to_owned(),
        damage_type,
        can_hit_ground: hits.0,
        can_hit_air: hits.1,
        priority,
        tiers,
    }
}

fn default_towers() -> Vec<TowerDefinition> {
    vec![
        // Blocker only: no targets, single tier.
        tower(
            "wall",
            DamageType::Physical,
            (false, false),
            TargetPriority::Any,
            vec![tier(20, 0.0, 0.0, 0.0)],
        ),
        tower(
            "basic",
            DamageType::Physical,
            (true, false),
            TargetPriority::Ground,
            vec![
                tier(70, 12.0, 3.2, 1.0),
                tier(110, 18.0, 3.4, 1.1),
                tier(170, 26.0, 3.6, 1.2),
                tier(250, 38.0, 3.8, 1.3),
                tier(360, 55.0, 4.0, 1.4),
            ],
        ),
        tower(
            "splash",
            DamageType::Siege,
            (true, false),
            TargetPriority::Ground,
            vec![
                splash_tier(120, 18.0, 3.0, 0.75, 1.2),
                splash_tier(180, 26.0, 3.1, 0.8, 1.3),
                splash_tier(260, 38.0, 3.2, 0.85, 1.4),
                splash_tier(360, 55.0, 3.3, 0.9, 1.5),
                splash_tier(500, 78.0, 3.5, 0.95, 1.6),
            ],
        ),
        tower(
            "slow",
            DamageType::Arcane,
            (true, false),
            TargetPriority::Ground,
            vec![
                slow_tier(90, 6.0, 3.0, 1.2, (0.75, 1.6), None),
                slow_tier(140, 9.0, 3.1, 1.25, (0.7, 1.7), None),
                slow_tier(210, 13.0, 3.2, 1.3, (0.65, 1.8), None),
                slow_tier(300, 18.0, 3.3, 1.35, (0.6, 2.0), None),
                slow_tier(420, 26.0, 3.5, 1.45, (0.55, 2.2), None),
            ],
        ),
        tower(
            "long",
            DamageType::Physical,
            (true, true),
            TargetPriority::Air,
            vec![
                tier(140, 24.0, 5.2, 0.6),
                tier(210, 34.0, 5.5, 0.65),
                tier(300, 48.0, 5.8, 0.7),
                tier(420, 68.0, 6.1, 0.75),
                tier(590, 95.0, 6.4, 0.8),
            ],
        ),
        tower(
            "rapid",
            DamageType::Physical,
            (true, true),
            TargetPriority::Ground,
            vec![
                tier(75, 5.0, 2.8, 3.0),
                tier(120, 7.0, 2.9, 3.3),
                tier(180, 10.0, 3.0, 3.6),
                tier(260, 14.0, 3.1, 3.9),
                tier(370, 20.0, 3.2, 4.2),
            ],
        ),
    ]
}

fn creep(
    name: &str,
    hp: f64,
    speed: f64,
    armor: f64,
    resist: Resistances,
    bounty: f64,
    leak_damage: i32,
) -> CreepDefinition {
    CreepDefinition {
        name: name.to_owned(),
        hp,
        speed,
        armor,
        resist,
        bounty,
        leak_damage,
        is_flying: false,
        is_boss: false,
        slow_immune: false,
    }
}

fn default_creeps() -> Vec<CreepDefinition> {
    let none = Resistances::default();
    vec![
        creep(
            "grunt",
            90.0,
            1.0,
            0.05,
            Resistances {
                arcane: Some(0.95),
                ..none
            },
            12.0,
            1,
        ),
        creep(
            "sprinter",
            60.0,
            1.35,
            0.0,
            Resistances {
                siege: Some(0.9),
                ..none
            },
            10.0,
            1,
        ),
        creep(
            "tank",
            190.0,
            0.75,
            0.2,
            Resistances {
                physical: Some(0.9),
                ..none
            },
            20.0,
            2,
        ),
        creep(
            "mystic",
            110.0,
            0.95,
            0.05,
            Resistances {
                arcane: Some(0.7),
                ..none
            },
            16.0,
            1,
        ),
        CreepDefinition {
            is_boss: true,
            slow_immune: true,
            ..creep(
                "boss",
                680.0,
                0.55,
                0.25,
                Resistances {
                    physical: Some(0.85),
                    arcane: Some(0.85),
                    siege: Some(0.9),
                },
                140.0,
                6,
            )
        },
    ]
}

fn wave(groups: &[(&str, u32)], spawn_interval: f64, is_boss: bool) -> WaveDefinition {
    WaveDefinition {
        groups: groups
            .iter()
            .map(|(creep, count)| WaveGroup {
                creep: (*creep).to_owned(),
                count: *count,
            })
            .collect(),
        spawn_interval,
        is_boss,
    }
}

fn default_waves() -> Vec<WaveDefinition> {
    vec![
        wave(&[("grunt", 12)], 0.8, false),
        wave(&[("grunt", 10), ("sprinter", 6)], 0.75, false),
        wave(&[("grunt", 10), ("mystic", 6)], 0.7, false),
        wave(&[("tank", 6), ("grunt", 8)], 0.75, false),
        wave(&[("boss", 1), ("grunt", 6)], 1.0, true),
        wave(&[("sprinter", 12), ("mystic", 4)], 0.6, false),
        wave(&[("tank", 6), ("mystic", 8)], 0.65, false),
        wave(&[("grunt", 12), ("tank", 4)], 0.6, false),
        wave(&[("sprinter", 10), ("tank", 6)], 0.55, false),
        wave(&[("boss", 1), ("tank", 6), ("mystic", 6)], 0.7, true),
    ]
}

/// Errors raised while validating content tables.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ContentError {
    /// Two towers or two creeps share a name.
    #[error("duplicate {category} name `{name}`")]
    DuplicateName {
        /// Either `tower` or `creep`.
        category: &'static str,
        /// Name that appeared twice.
        name: String,
    },
    /// More definitions than a kind handle can address.
    #[error("too many {category} definitions")]
    TooManyDefinitions {
        /// Either `tower` or `creep`.
        category: &'static str,
    },
    /// A tower has no tiers.
    #[error("tower `{tower}` defines no tiers")]
    NoTiers {
        /// Offending tower.
        tower: String,
    },
    /// A tower tier holds an out-of-range statistic.
    #[error("tower `{tower}` tier {tier}: {reason}")]
    InvalidTier {
        /// Offending tower.
        tower: String,
        /// Offending tier index.
        tier: usize,
        /// What was wrong.
        reason: &'static str,
    },
    /// A creep holds an out-of-range statistic.
    #[error("creep `{creep}`: {reason}")]
    InvalidCreep {
        /// Offending creep.
        creep: String,
        /// What was wrong.
        reason: &'static str,
    },
    /// A wave references an unknown creep name.
    #[error("wave {wave} references unknown creep `{creep}`")]
    UnknownCreep {
        /// One-based wave number.
        wave: usize,
        /// Unknown creep name.
        creep: String,
    },
    /// A wave has a non-positive spawn interval.
    #[error("wave {wave} has a non-positive spawn interval")]
    InvalidSpawnInterval {
        /// One-based wave number.
        wave: usize,
    },
    /// No waves are defined.
    #[error("content defines no waves")]
    NoWaves,
    /// A global balance knob is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: &'static str,
    },
}

/// A wave with creep names resolved to kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedWave {
    /// Groups merged into the spawn queue.
    pub groups: Vec<(CreepKind, u32)>,
    /// Seconds between consecutive spawns.
    pub spawn_interval: f64,
    /// Whether the wave is flagged as a boss wave.
    pub is_boss: bool,
}

impl ResolvedWave {
    /// Number of creeps the wave spawns.
    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, count)| *count as usize).sum()
    }
}

/// Validated, indexed content.
#[derive(Clone, Debug)]
pub struct Catalog {
    content: Content,
    waves: Vec<ResolvedWave>,
    tower_names: HashMap<String, TowerKind>,
    creep_names: HashMap<String, CreepKind>,
}

impl Catalog {
    /// Validates the content and resolves every wave.
    pub fn new(content: Content) -> Result<Self, ContentError> {
        validate_config(&content.config)?;
        let tower_names = index_names("tower", content.towers.iter().map(|t| t.name.as_str()))?
            .into_iter()
            .map(|(name, index)| (name, TowerKind::new(index)))
            .collect();
        let creep_names: HashMap<String, CreepKind> =
            index_names("creep", content.creeps.iter().map(|c| c.name.as_str()))?
                .into_iter()
                .map(|(name, index)| (name, CreepKind::new(index)))
                .collect();
        for tower in &content.towers {
            validate_tower(tower)?;
        }
        for creep in &content.creeps {
            validate_creep(creep)?;
        }
        if content.waves.is_empty() {
            return Err(ContentError::NoWaves);
        }

        let mut waves = Vec::with_capacity(content.waves.len());
        for (index, wave) in content.waves.iter().enumerate() {
            let number = index + 1;
            if !(wave.spawn_interval > 0.0) {
                return Err(ContentError::InvalidSpawnInterval { wave: number });
            }
            let mut groups = Vec::with_capacity(wave.groups.len());
            for group in &wave.groups {
                let Some(kind) = creep_names.get(&group.creep) else {
                    return Err(ContentError::UnknownCreep {
                        wave: number,
                        creep: group.creep.clone(),
                    });
                };
                groups.push((*kind, group.count));
            }
            waves.push(ResolvedWave {
                groups,
                spawn_interval: wave.spawn_interval,
                is_boss: wave.is_boss,
            });
        }

        Ok(Self {
            content,
            waves,
            tower_names,
            creep_names,
        })
    }

    /// Global balance knobs.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.content.config
    }

    /// Economy building definition.
    #[must_use]
    pub fn bank(&self) -> &BankDefinition {
        &self.content.bank
    }

    /// Looks up a tower definition.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> Option<&TowerDefinition> {
        self.content.towers.get(usize::from(kind.get()))
    }

    /// Looks up a creep definition.
    #[must_use]
    pub fn creep(&self, kind: CreepKind) -> Option<&CreepDefinition> {
        self.content.creeps.get(usize::from(kind.get()))
    }

    /// Resolves a tower name.
    #[must_use]
    pub fn tower_kind(&self, name: &str) -> Option<TowerKind> {
        self.tower_names.get(name).copied()
    }

    /// Resolves a creep name.
    #[must_use]
    pub fn creep_kind(&self, name: &str) -> Option<CreepKind> {
        self.creep_names.get(name).copied()
    }

    /// Every tower kind in menu order.
    pub fn tower_kinds(&self) -> impl Iterator<Item = TowerKind> + '_ {
        (0..self.content.towers.len())
            .filter_map(|index| u16::try_from(index).ok().map(TowerKind::new))
    }

    /// Resolved composition of the one-based wave number.
    #[must_use]
    pub fn wave(&self, number: u32) -> Option<&ResolvedWave> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.waves.get(index)
    }

    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub fn wave_count(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }
}

fn index_names<'a>(
    category: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, u16>, ContentError> {
    let mut indexed = HashMap::new();
    for (index, name) in names.enumerate() {
        let index =
            u16::try_from(index).map_err(|_| ContentError::TooManyDefinitions { category })?;
        if indexed.insert(name.to_owned(), index).is_some() {
            return Err(ContentError::DuplicateName {
                category,
                name: name.to_owned(),
            });
        }
    }
    Ok(indexed)
}

fn validate_config(config: &GameConfig) -> Result<(), ContentError> {
    let invalid = |reason| Err(ContentError::InvalidConfig { reason });
    if config.damage_multipliers.is_empty() {
        return invalid("damage multiplier table is empty");
    }
    if config.damage_multipliers.iter().any(|m| !(*m >= 0.0)) {
        return invalid("damage multipliers must be non-negative");
    }
    if !(0.0..=1.0).contains(&config.sell_refund) {
        return invalid("sell refund must lie in [0, 1]");
    }
    if !(config.interest_rate >= 0.0) {
        return invalid("interest rate must be non-negative");
    }
    if !(config.prep_duration >= 0.0) {
        return invalid("prep duration must be non-negative");
    }
    if !(config.base_hp_mult > 0.0) || !(config.base_speed_mult > 0.0) {
        return invalid("base multipliers must be positive");
    }
    if !(config.wave_hp_scale >= 0.0) || !(config.wave_speed_scale >= 0.0) {
        return invalid("wave scales must be non-negative");
    }
    if !(config.range_growth > 0.0) {
        return invalid("range growth must be positive");
    }
    Ok(())
}

fn validate_tower(tower: &TowerDefinition) -> Result<(), ContentError> {
    if tower.tiers.is_empty() {
        return Err(ContentError::NoTiers {
            tower: tower.name.clone(),
        });
    }
    let blocker = tower.is_blocker();
    for (index, tier) in tower.tiers.iter().enumerate() {
        let invalid = |reason| {
            Err(ContentError::InvalidTier {
                tower: tower.name.clone(),
                tier: index,
                reason,
            })
        };
        if !(tier.damage >= 0.0) {
            return invalid("damage must be non-negative");
        }
        if !blocker && !(tier.fire_rate > 0.0) {
            return invalid("fire rate must be positive");
        }
        if !blocker && !(tier.range > 0.0) {
            return invalid("range must be positive");
        }
        if tier.splash_radius.is_some_and(|r| !(r >= 0.0))
            || tier.slow_splash_radius.is_some_and(|r| !(r >= 0.0))
        {
            return invalid("radii must be non-negative");
        }
        if let Some(slow) = tier.slow {
            if !(0.0..=1.0).contains(&slow.multiplier) || !(slow.duration >= 0.0) {
                return invalid("slow must have a multiplier in [0, 1] and a non-negative duration");
            }
        }
    }
    Ok(())
}

fn validate_creep(creep: &CreepDefinition) -> Result<(), ContentError> {
    let invalid = |reason| {
        Err(ContentError::InvalidCreep {
            creep: creep.name.clone(),
            reason,
        })
    };
    if !(creep.hp > 0.0) {
        return invalid("hit points must be positive");
    }
    if !(creep.speed >= 0.0) {
        return invalid("speed must be non-negative");
    }
    if !(0.0..1.0).contains(&creep.armor) {
        return invalid("armor must lie in [0, 1)");
    }
    if creep
        .resist
        .entries()
        .iter()
        .flatten()
        .any(|value| !(0.0..=1.0).contains(value))
    {
        return invalid("resistances must lie in [0, 1]");
    }
    if !(creep.bounty >= 0.0) {
        return invalid("bounty must be non-negative");
    }
    Ok(())
}
