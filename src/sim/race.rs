//! Race definitions and strategy choices

use serde::{Deserialize, Serialize};

use super::horse::HorseSnapshot;
use crate::error::RaceError;
use crate::turn_count;

/// Race tier, scales prizes, fan gain and entry fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Grade {
    #[default]
    Maiden,
    G3,
    G2,
    G1,
    /// Top tier
    GI,
}

impl Grade {
    /// Integer tier used by the payout tables (Maiden = 0)
    pub fn tier(&self) -> u32 {
        match self {
            Grade::Maiden => 0,
            Grade::G3 => 1,
            Grade::G2 => 2,
            Grade::G1 => 3,
            Grade::GI => 4,
        }
    }

    /// Cost to enter a race of this grade
    pub fn entry_fee(&self) -> u32 {
        match self {
            Grade::Maiden => 100,
            Grade::G3 => 300,
            Grade::G2 => 500,
            Grade::G1 => 1000,
            Grade::GI => 2000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Maiden => "Maiden",
            Grade::G3 => "G3",
            Grade::G2 => "G2",
            Grade::G1 => "G1",
            Grade::GI => "GI",
        }
    }
}

/// Where the horse runs in the pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Formation {
    /// Start fast, hold the front
    Lead,
    /// Sit mid-pack, surge in the final stretch
    #[default]
    Draft,
    /// Hang back, finish hard
    Mount,
}

impl Formation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formation::Lead => "Lead",
            Formation::Draft => "Draft",
            Formation::Mount => "Mount",
        }
    }

    /// Next formation in menu order (Lead -> Draft -> Mount -> Lead)
    pub fn next(self) -> Self {
        match self {
            Formation::Lead => Formation::Draft,
            Formation::Draft => Formation::Mount,
            Formation::Mount => Formation::Lead,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Formation::Lead => Formation::Mount,
            Formation::Draft => Formation::Lead,
            Formation::Mount => Formation::Draft,
        }
    }
}

/// How the horse spends its energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Pace {
    Fast,
    #[default]
    Even,
    Conserve,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Fast => "Fast",
            Pace::Even => "Even",
            Pace::Conserve => "Conserve",
        }
    }

    /// Next pace in menu order (Fast -> Even -> Conserve -> Fast)
    pub fn next(self) -> Self {
        match self {
            Pace::Fast => Pace::Even,
            Pace::Even => Pace::Conserve,
            Pace::Conserve => Pace::Fast,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pace::Fast => Pace::Conserve,
            Pace::Even => Pace::Fast,
            Pace::Conserve => Pace::Even,
        }
    }
}

/// Strategy for the player's entrant only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StrategySelection {
    pub formation: Formation,
    pub pace: Pace,
}

impl StrategySelection {
    pub fn new(formation: Formation, pace: Pace) -> Self {
        Self { formation, pace }
    }
}

/// A race card entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDefinition {
    pub id: String,
    pub name: String,
    /// Meters
    pub distance: u32,
    pub grade: Grade,
    /// Winner's purse
    pub prize: u32,
    /// Minimum overall rating to enter
    #[serde(default)]
    pub min_rating: u32,
    pub capacity: usize,
    /// Entrant horse IDs, in gate order
    #[serde(default)]
    pub entrants: Vec<String>,
}

impl RaceDefinition {
    /// Default field capacity for a new race
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        distance: u32,
        grade: Grade,
        prize: u32,
        min_rating: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance,
            grade,
            prize,
            min_rating,
            capacity: Self::DEFAULT_CAPACITY,
            entrants: Vec::new(),
        }
    }

    /// Number of turns the race is simulated over
    pub fn turns(&self) -> u32 {
        turn_count(self.distance)
    }

    pub fn is_full(&self) -> bool {
        self.entrants.len() >= self.capacity
    }

    /// Add an entrant; refuses duplicates and a full field
    pub fn add_entrant(&mut self, horse_id: &str) -> bool {
        if self.is_full() || self.entrants.iter().any(|id| id == horse_id) {
            return false;
        }
        self.entrants.push(horse_id.to_string());
        true
    }

    /// Whether `horse` is rated high enough and there is room
    pub fn can_enter(&self, horse: &HorseSnapshot) -> bool {
        !self.is_full() && horse.overall_rating() >= self.min_rating
    }

    /// Slot index of an entrant, in gate order
    pub fn slot_of(&self, horse_id: &str) -> Option<usize> {
        self.entrants.iter().position(|id| id == horse_id)
    }

    /// Check the preconditions for running the race
    pub fn validate(&self, player_id: &str) -> Result<(), RaceError> {
        if self.distance == 0 {
            return Err(RaceError::ZeroDistance);
        }
        if self.entrants.is_empty() {
            return Err(RaceError::NoEntrants);
        }
        if self.entrants.len() > self.capacity {
            return Err(RaceError::OverCapacity {
                entrants: self.entrants.len(),
                capacity: self.capacity,
            });
        }
        for (i, id) in self.entrants.iter().enumerate() {
            if self.entrants[..i].contains(id) {
                return Err(RaceError::DuplicateEntrant(id.clone()));
            }
        }
        if self.slot_of(player_id).is_none() {
            return Err(RaceError::PlayerNotEntered(player_id.to_string()));
        }
        Ok(())
    }
}
