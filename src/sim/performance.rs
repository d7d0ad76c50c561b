//! Performance model: attributes to per-turn speed
//!
//! Two stages. The base stage applies to every entrant; the strategy stage
//! applies to the player's entrant only. Both stages truncate to whole meters.

use super::horse::HorseSnapshot;
use super::race::{Formation, Pace, StrategySelection};

/// Fraction of the race completed at `turn`
#[inline]
pub fn progress(turn: u32, total_turns: u32) -> f64 {
    if total_turns == 0 {
        return 1.0;
    }
    turn as f64 / total_turns as f64
}

/// Base speed of `horse` on `turn`. Never below 1.
pub fn speed(horse: &HorseSnapshot, turn: u32, total_turns: u32) -> i32 {
    let base = horse.speed as i32 / 5 + horse.technique as i32 / 20 + horse.mental as i32 / 25
        - horse.fatigue() as i32 / 10;

    // Late-race fade
    let stamina_factor = if progress(turn, total_turns) > 0.5 {
        horse.race_stamina() as f64 / 100.0
    } else {
        1.0
    };

    let speed = (base as f64 * stamina_factor * horse.age_factor()) as i32;
    speed.max(1)
}

impl Formation {
    /// Speed multiplier at `progress`
    pub fn modifier(&self, progress: f64) -> f64 {
        match self {
            Formation::Lead if progress < 0.3 => 1.2,
            Formation::Lead => 1.0,
            Formation::Draft if progress <= 0.7 => 0.9,
            Formation::Draft => 1.3,
            Formation::Mount if progress <= 0.8 => 0.8,
            Formation::Mount => 1.4,
        }
    }
}

impl Pace {
    /// Speed multiplier at `progress`
    pub fn modifier(&self, progress: f64) -> f64 {
        match self {
            Pace::Fast if progress < 0.5 => 1.2,
            Pace::Fast => 0.8,
            Pace::Even => 1.0,
            Pace::Conserve if progress <= 0.6 => 0.9,
            Pace::Conserve => 1.1,
        }
    }
}

/// Strategy stage: formation then pace, truncating after each. Never below 1.
pub fn apply_strategy(base: i32, strategy: StrategySelection, turn: u32, total_turns: u32) -> i32 {
    let p = progress(turn, total_turns);
    let after_formation = (base as f64 * strategy.formation.modifier(p)) as i32;
    let after_pace = (after_formation as f64 * strategy.pace.modifier(p)) as i32;
    after_pace.max(1)
}

/// Full speed for an entrant (strategy stage only when `strategy` is given)
pub fn entrant_speed(
    horse: &HorseSnapshot,
    strategy: Option<StrategySelection>,
    turn: u32,
    total_turns: u32,
) -> i32 {
    let base = speed(horse, turn, total_turns);
    match strategy {
        Some(strategy) => apply_strategy(base, strategy, turn, total_turns),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horse() -> HorseSnapshot {
        // speed 100 -> 20, technique 100 -> 5, mental 100 -> 4
        HorseSnapshot::with_stats("h", "Horse", 4, 100)
    }

    #[test]
    fn test_speed_early_race() {
        assert_eq!(speed(&horse(), 1, 16), 29);
    }

    #[test]
    fn test_fatigue_penalty() {
        let mut h = horse();
        h.fatigue = 50;
        assert_eq!(speed(&h, 1, 16), 24);
    }

    #[test]
    fn test_late_race_fade_uses_stamina() {
        let mut h = horse();
        h.stamina = 50;
        // Early: unaffected by stamina
        assert_eq!(speed(&h, 8, 16), 29);
        // Past halfway: 29 * 0.5 = 14.5
        assert_eq!(speed(&h, 9, 16), 14);
    }

    #[test]
    fn test_age_factor_applied() {
        let mut h = horse();
        h.age = 2;
        // 29 * 0.85 = 24.65
        assert_eq!(speed(&h, 1, 16), 24);
    }

    #[test]
    fn test_speed_floors_at_one() {
        let mut h = HorseSnapshot::with_stats("h", "Nag", 12, 0);
        h.fatigue = 100;
        assert_eq!(speed(&h, 1, 10), 1);
        assert_eq!(speed(&h, 10, 10), 1);
    }

    #[test]
    fn test_formation_buckets() {
        assert_eq!(Formation::Lead.modifier(0.29), 1.2);
        assert_eq!(Formation::Lead.modifier(0.3), 1.0);
        assert_eq!(Formation::Draft.modifier(0.7), 0.9);
        assert_eq!(Formation::Draft.modifier(0.71), 1.3);
        assert_eq!(Formation::Mount.modifier(0.8), 0.8);
        assert_eq!(Formation::Mount.modifier(0.81), 1.4);
    }

    #[test]
    fn test_pace_buckets() {
        assert_eq!(Pace::Fast.modifier(0.49), 1.2);
        assert_eq!(Pace::Fast.modifier(0.5), 0.8);
        assert_eq!(Pace::Even.modifier(0.0), 1.0);
        assert_eq!(Pace::Even.modifier(1.0), 1.0);
        assert_eq!(Pace::Conserve.modifier(0.6), 0.9);
        assert_eq!(Pace::Conserve.modifier(0.61), 1.1);
    }

    #[test]
    fn test_strategy_axes_compose() {
        let lead_fast = StrategySelection::new(Formation::Lead, Pace::Fast);
        // 100 * 1.2 = 120, 120 * 1.2 = 144
        assert_eq!(apply_strategy(100, lead_fast, 1, 10), 144);

        let mount_conserve = StrategySelection::new(Formation::Mount, Pace::Conserve);
        // Final turn: 100 * 1.4 = 140, 140 * 1.1 = 154
        assert_eq!(apply_strategy(100, mount_conserve, 10, 10), 154);

        let draft_even = StrategySelection::new(Formation::Draft, Pace::Even);
        assert_eq!(apply_strategy(100, draft_even, 1, 10), 90);
    }

    #[test]
    fn test_entrant_speed_strategy_only_when_given() {
        let h = horse();
        let strategy = StrategySelection::new(Formation::Draft, Pace::Even);
        assert_eq!(entrant_speed(&h, None, 1, 16), 29);
        // 29 * 0.9 = 26.1
        assert_eq!(entrant_speed(&h, Some(strategy), 1, 16), 26);
    }

    #[test]
    fn test_strategy_keeps_speed_floor() {
        let nag = HorseSnapshot::with_stats("h", "Nag", 4, 0);
        for formation in [Formation::Lead, Formation::Draft, Formation::Mount] {
            for pace in [Pace::Fast, Pace::Even, Pace::Conserve] {
                let strategy = StrategySelection::new(formation, pace);
                for turn in 1..=16 {
                    assert_eq!(entrant_speed(&nag, Some(strategy), turn, 16), 1);
                }
            }
        }
    }
}
