//! Horse snapshot taken at the gate
//!
//! The long-lived horse record belongs to the career layer. A race only ever
//! sees this copy, and nothing in the race writes back to it.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Attributes of one entrant, frozen for the duration of a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseSnapshot {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub speed: u32,
    pub stamina: u32,
    pub technique: u32,
    pub mental: u32,
    /// 0-100, training fatigue carried into the race
    pub fatigue: u32,
    /// 0-100
    pub morale: u32,
}

impl HorseSnapshot {
    /// Snapshot with all four trainable stats at `stat`, fresh and happy
    pub fn with_stats(id: impl Into<String>, name: impl Into<String>, age: u32, stat: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            speed: stat,
            stamina: stat,
            technique: stat,
            mental: stat,
            fatigue: 0,
            morale: 100,
        }
    }

    /// Fatigue clamped into [0, 100]
    pub fn fatigue(&self) -> u32 {
        self.fatigue.min(100)
    }

    /// Morale clamped into [0, 100]
    pub fn morale(&self) -> u32 {
        self.morale.min(100)
    }

    /// Stamina as seen by the race (clamped into [0, 100])
    pub fn race_stamina(&self) -> u32 {
        self.stamina.min(100)
    }

    /// Age-based performance multiplier
    pub fn age_factor(&self) -> f64 {
        age_performance_factor(self.age)
    }

    /// Mean of the four trainable stats, adjusted for age.
    /// Never drops below a tenth of the unadjusted mean.
    pub fn overall_rating(&self) -> u32 {
        let base = (self.stamina + self.speed + self.technique + self.mental) / 4;
        let adjusted = (base as f64 * self.age_factor()) as u32;
        adjusted.max(base / 10)
    }

    /// Chance that a whip makes the horse disobedient.
    ///
    /// `whip_uses` counts the whip being rolled for, so the first whip of a
    /// race passes 1.
    pub fn disobedience_chance(&self, whip_uses: u32) -> f64 {
        let fatigue = self.fatigue() as f64 / 200.0;
        let morale_deficit = 50u32.saturating_sub(self.morale()) as f64 / 100.0;
        let mental_deficit = 50u32.saturating_sub(self.mental) as f64 / 100.0;
        let escalation = whip_uses.saturating_sub(1) as f64 * 0.10;

        (0.10 + fatigue + morale_deficit + mental_deficit + escalation)
            .clamp(DISOBEDIENCE_MIN_CHANCE, DISOBEDIENCE_MAX_CHANCE)
    }

    /// How many turns a bout of disobedience lasts
    pub fn disobedience_turns(&self) -> u32 {
        // Integer division truncates toward zero, so weak minds get longer bouts
        let mental_bonus = (self.mental as i32 - 50) / 20;
        (DISOBEDIENCE_BASE_TURNS - mental_bonus).max(DISOBEDIENCE_MIN_TURNS) as u32
    }
}

/// Age-performance lookup: peaks at five, fades toward retirement
pub fn age_performance_factor(age: u32) -> f64 {
    match age {
        2 => 0.85,
        3 => 0.95,
        4 => 1.00,
        5 => 1.02,
        6 => 1.00,
        7 => 0.98,
        8 => 0.94,
        9 => 0.88,
        10 => 0.80,
        a if a > 10 => 0.70,
        _ => 1.00,
    }
}
