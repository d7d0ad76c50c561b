//! Payout tables
//!
//! Fixed policy. Downstream career bookkeeping expects these exact numbers.

use serde::{Deserialize, Serialize};

use super::race::RaceDefinition;

/// What the player takes home from a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub prize_money: u32,
    pub fan_gain: u32,
}

/// Prize money for finishing at `rank`
pub fn prize_for_rank(prize: u32, rank: u32) -> u32 {
    match rank {
        1 => prize,
        2 => prize / 2,
        3 => prize / 4,
        4 | 5 => prize / 8,
        _ => 0,
    }
}

/// Fans gained for finishing at `rank` in a race of grade tier `tier`
pub fn fans_for_rank(tier: u32, rank: u32) -> u32 {
    match rank {
        1 => 1000 + tier * 500,
        2 => 500 + tier * 250,
        3 => 250 + tier * 100,
        4 | 5 => 100 + tier * 50,
        _ => 25,
    }
}

/// Resolve the player's reward from their final rank
pub fn resolve(race: &RaceDefinition, final_rank: u32) -> Reward {
    Reward {
        prize_money: prize_for_rank(race.prize, final_rank),
        fan_gain: fans_for_rank(race.grade.tier(), final_rank),
    }
}
