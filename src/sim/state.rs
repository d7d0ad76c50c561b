//! Live session state and track geometry
//!
//! Everything the jockey controls during playback lives here. It is created
//! at the gate and dropped when the race is over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Lane change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    /// Toward the rail (lane 0)
    Inner,
    /// Toward the outside (lane 4)
    Outer,
}

/// Part of the track a turn falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackSection {
    /// First and last quarter of the race
    Bend,
    Straight,
}

impl TrackSection {
    /// Section for `turn` out of `total_turns` (quartile bounds inclusive)
    pub fn at(turn: u32, total_turns: u32) -> Self {
        // progress <= 0.25 || progress >= 0.75, kept in integers
        if 4 * turn <= total_turns || 4 * turn >= 3 * total_turns {
            TrackSection::Bend
        } else {
            TrackSection::Straight
        }
    }

    /// Lane that earns the biggest bonus in this section
    pub fn best_lane(&self) -> u8 {
        match self {
            TrackSection::Bend => 0,
            TrackSection::Straight => 2,
        }
    }
}

/// Additive distance adjustment for running in `lane`
pub fn lane_modifier(lane: u8, section: TrackSection) -> i32 {
    match (section, lane) {
        (TrackSection::Bend, 0) => 5,
        (TrackSection::Bend, 1) => 3,
        (TrackSection::Bend, 2) => 0,
        (TrackSection::Bend, 3) => -2,
        (TrackSection::Bend, _) => -4,
        (TrackSection::Straight, 2) => 3,
        (TrackSection::Straight, 1 | 3) => 0,
        (TrackSection::Straight, _) => -2,
    }
}

/// Player-only mutable state for one race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSessionState {
    /// 0 (rail) ..= 4 (outside)
    pub lane: u8,
    /// Jockey stamina, separate from the horse's training stamina
    pub stamina: u32,
    pub whip_uses: u32,
    /// Turn of the most recent accepted whip
    pub last_whip_turn: Option<u32>,
    pub disobedient: bool,
    /// Turns of disobedience left
    pub disobedience_turns: u32,
    /// Length of the current bout, for spotting its first turn
    #[serde(default)]
    pub disobedience_length: u32,
}

impl Default for LiveSessionState {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            stamina: LIVE_STAMINA_MAX,
            whip_uses: 0,
            last_whip_turn: None,
            disobedient: false,
            disobedience_turns: 0,
            disobedience_length: 0,
        }
    }
}

impl LiveSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns elapsed since the last whip. A race with no whip yet counts
    /// from turn 0.
    pub fn turns_since_whip(&self, turn: u32) -> u32 {
        turn.saturating_sub(self.last_whip_turn.unwrap_or(0))
    }

    /// Whether a whip at `turn` would be accepted
    pub fn can_whip(&self, turn: u32) -> bool {
        !self.disobedient
            && self.turns_since_whip(turn) >= WHIP_COOLDOWN_TURNS
            && self.stamina >= WHIP_STAMINA_COST
    }

    /// Whether `turn` still carries the surge from the last whip
    pub fn whip_boost_active(&self, turn: u32) -> bool {
        self.last_whip_turn
            .is_some_and(|last| turn > last && turn - last <= WHIP_BOOST_WINDOW)
    }

    /// Record an accepted whip at `turn`: pay stamina, count it
    pub fn record_whip(&mut self, turn: u32) {
        self.stamina -= WHIP_STAMINA_COST;
        self.whip_uses += 1;
        self.last_whip_turn = Some(turn);
    }

    /// Start a bout of disobedience lasting `turns`
    pub fn start_disobedience(&mut self, turns: u32) {
        self.disobedient = true;
        self.disobedience_turns = turns;
        self.disobedience_length = turns;
    }

    /// True on the first penalised turn of a bout
    pub fn disobedience_fresh(&self) -> bool {
        self.disobedient && self.disobedience_turns == self.disobedience_length
    }

    /// Move one lane; refused while disobedient or at the edge
    pub fn shift_lane(&mut self, shift: LaneShift) -> bool {
        if self.disobedient {
            return false;
        }
        match shift {
            LaneShift::Inner if self.lane > 0 => self.lane -= 1,
            LaneShift::Outer if self.lane < LANE_COUNT - 1 => self.lane += 1,
            _ => return false,
        }
        true
    }

    /// Count down disobedience by one turn
    pub fn tick_obedience(&mut self) {
        if self.disobedient {
            self.disobedience_turns = self.disobedience_turns.saturating_sub(1);
            if self.disobedience_turns == 0 {
                self.disobedient = false;
            }
        }
    }

    /// Per-tick stamina recovery
    pub fn regenerate(&mut self) {
        self.stamina = (self.stamina + STAMINA_REGEN_PER_TICK).min(LIVE_STAMINA_MAX);
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_sections() {
        // 16 turns: bends are turns 1-4 and 12-16
        let bends: Vec<u32> = (1..=16)
            .filter(|&t| TrackSection::at(t, 16) == TrackSection::Bend)
            .collect();
        assert_eq!(bends, vec![1, 2, 3, 4, 12, 13, 14, 15, 16]);

        // 10 turns: 2.5 and 7.5 are the quartile marks
        assert_eq!(TrackSection::at(2, 10), TrackSection::Bend);
        assert_eq!(TrackSection::at(3, 10), TrackSection::Straight);
        assert_eq!(TrackSection::at(7, 10), TrackSection::Straight);
        assert_eq!(TrackSection::at(8, 10), TrackSection::Bend);
    }

    #[test]
    fn test_lane_modifiers() {
        let bend: Vec<i32> = (0..5).map(|l| lane_modifier(l, TrackSection::Bend)).collect();
        assert_eq!(bend, vec![5, 3, 0, -2, -4]);
        let straight: Vec<i32> = (0..5).map(|l| lane_modifier(l, TrackSection::Straight)).collect();
        assert_eq!(straight, vec![-2, 0, 3, 0, -2]);
    }

    #[test]
    fn test_shift_lane_bounds() {
        let mut state = LiveSessionState::new();
        assert_eq!(state.lane, 2);
        assert!(state.shift_lane(LaneShift::Inner));
        assert!(state.shift_lane(LaneShift::Inner));
        assert!(!state.shift_lane(LaneShift::Inner));
        assert_eq!(state.lane, 0);
        for _ in 0..4 {
            assert!(state.shift_lane(LaneShift::Outer));
        }
        assert!(!state.shift_lane(LaneShift::Outer));
        assert_eq!(state.lane, 4);
    }

    #[test]
    fn test_disobedient_blocks_lane_change() {
        let mut state = LiveSessionState::new();
        state.start_disobedience(2);
        assert!(!state.shift_lane(LaneShift::Inner));
        assert_eq!(state.lane, 2);
    }

    #[test]
    fn test_obedience_countdown() {
        let mut state = LiveSessionState::new();
        state.start_disobedience(3);
        assert!(state.disobedience_fresh());
        state.tick_obedience();
        assert!(state.disobedient);
        assert!(!state.disobedience_fresh());
        state.tick_obedience();
        assert!(state.disobedient);
        state.tick_obedience();
        assert!(!state.disobedient);
        assert_eq!(state.disobedience_turns, 0);
        // Already clear: nothing to count
        state.tick_obedience();
        assert_eq!(state.disobedience_turns, 0);
    }

    #[test]
    fn test_whip_gating() {
        let mut state = LiveSessionState::new();
        // Cooldown counts from turn 0 before the first whip
        assert!(!state.can_whip(2));
        assert!(state.can_whip(3));

        state.record_whip(3);
        assert_eq!(state.stamina, 75);
        assert!(!state.can_whip(5));
        assert!(state.can_whip(6));

        state.stamina = 24;
        assert!(!state.can_whip(10));
    }

    #[test]
    fn test_whip_boost_window() {
        let mut state = LiveSessionState::new();
        assert!(!state.whip_boost_active(1));
        state.record_whip(5);
        assert!(!state.whip_boost_active(5));
        assert!(state.whip_boost_active(6));
        assert!(state.whip_boost_active(7));
        assert!(!state.whip_boost_active(8));
    }

    #[test]
    fn test_regenerate_caps() {
        let mut state = LiveSessionState::new();
        state.stamina = 99;
        state.regenerate();
        assert_eq!(state.stamina, 100);
        state.regenerate();
        assert_eq!(state.stamina, 100);
    }
}
