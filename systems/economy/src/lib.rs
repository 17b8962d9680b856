#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gold and score rules shared by the world and its adapters.

use lane_defense_core::{BankDefinition, CreepDefinition, GameConfig, Phase};
use serde::{Deserialize, Serialize};

/// Points awarded per cleared wave.
pub const POINTS_PER_WAVE: u64 = 1_000;
/// Points awarded per remaining life.
pub const POINTS_PER_LIFE: u64 = 50;

/// Gold refunded when selling a structure with the provided investment.
///
/// Selling always refunds at least one gold.
#[must_use]
pub fn sell_value(spent: u32, config: &GameConfig) -> u32 {
    let refund = (f64::from(spent) * config.sell_refund).floor();
    (refund as u32).max(1)
}

/// Gold paid when a dead creep is reaped.
#[must_use]
pub fn bounty(definition: &CreepDefinition) -> u32 {
    definition.bounty.round() as u32
}

/// Gold paid out when a wave is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePayout {
    /// Income paid by banks.
    pub bank_income: u32,
    /// Interest paid on the gold held after bank income.
    pub interest: u32,
}

impl WavePayout {
    /// Total gold paid out.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.bank_income.saturating_add(self.interest)
    }
}

/// Computes the end-of-wave payout for the provided treasury.
///
/// Banks pay first; interest is then applied to the resulting balance and
/// rounded down.
#[must_use]
pub fn wave_payout(
    gold: u32,
    banks: usize,
    bank: &BankDefinition,
    config: &GameConfig,
) -> WavePayout {
    let bank_count = u32::try_from(banks).unwrap_or(u32::MAX);
    let bank_income = bank.income.saturating_mul(bank_count);
    let balance = gold.saturating_add(bank_income);
    let with_interest = (f64::from(balance) * (1.0 + config.interest_rate)).floor();
    let interest = (with_interest as u32).saturating_sub(balance);
    WavePayout {
        bank_income,
        interest,
    }
}

/// Waves counted as cleared for scoring.
#[must_use]
pub fn waves_cleared(phase: Phase, wave: u32, wave_count: u32) -> u32 {
    if phase == Phase::Victory {
        wave_count
    } else {
        wave.saturating_sub(1)
    }
}

/// Final score of a game.
#[must_use]
pub fn score(waves_cleared: u32, lives: i32, gold: u32) -> u64 {
    let lives = u64::try_from(lives.max(0)).unwrap_or(0);
    u64::from(waves_cleared) * POINTS_PER_WAVE + lives * POINTS_PER_LIFE + u64::from(gold)
}

/// Payload submitted to a leaderboard once a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    /// Final score.
    pub score: u64,
    /// Waves cleared.
    pub waves: u32,
    /// Seed the game was played with.
    pub seed: u32,
}
