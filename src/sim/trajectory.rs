//! Trajectory precomputation
//!
//! Runs a whole race, turn by turn, before any playback starts. The result is
//! handed out by value and never touched again by the simulator; live
//! interventions are layered on top by the playback controller.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::horse::HorseSnapshot;
use super::performance::entrant_speed;
use super::race::{RaceDefinition, StrategySelection};
use super::reward;
use super::standings::{leader, order_by_rank, rank_by_distance};
use crate::consts::*;
use crate::error::RaceError;

/// Cosmetic lines that may interrupt a turn
pub const FLAVOR_EVENTS: [&str; 5] = [
    "A gust of wind sweeps across the field!",
    "The crowd roars from the grandstand!",
    "Some horses are bunching up on the rail!",
    "The pace is picking up!",
    "A horse stumbles but recovers!",
];

/// State of the field after one turn. All vectors are indexed by gate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// 1-based turn number
    pub turn: u32,
    /// Cumulative meters covered
    pub distances: Vec<u32>,
    /// 1 = furthest advanced
    pub ranks: Vec<u32>,
    /// Simulation stamina left after this turn
    pub stamina: Vec<u32>,
    pub commentary: Option<String>,
    pub events: Vec<String>,
}

impl TurnSnapshot {
    /// Slot in front after this turn
    pub fn leader(&self) -> Option<usize> {
        leader(&self.ranks)
    }
}

/// A full precomputed race
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    race: RaceDefinition,
    entrants: Vec<HorseSnapshot>,
    player: usize,
    strategy: StrategySelection,
    turns: Vec<TurnSnapshot>,
    commentary: Vec<String>,
}

impl Trajectory {
    pub fn race(&self) -> &RaceDefinition {
        &self.race
    }

    /// Entrant snapshots in gate order
    pub fn entrants(&self) -> &[HorseSnapshot] {
        &self.entrants
    }

    /// Gate slot of the player's entrant
    pub fn player_slot(&self) -> usize {
        self.player
    }

    pub fn player(&self) -> &HorseSnapshot {
        &self.entrants[self.player]
    }

    pub fn strategy(&self) -> StrategySelection {
        self.strategy
    }

    pub fn turns(&self) -> &[TurnSnapshot] {
        &self.turns
    }

    /// Turn by 1-based number
    pub fn turn(&self, turn: u32) -> Option<&TurnSnapshot> {
        turn.checked_sub(1).and_then(|i| self.turns.get(i as usize))
    }

    pub fn total_turns(&self) -> u32 {
        self.turns.len() as u32
    }

    /// Pre-race call followed by every milestone line
    pub fn commentary(&self) -> &[String] {
        &self.commentary
    }

    pub fn final_turn(&self) -> &TurnSnapshot {
        // A trajectory always has at least MIN_TURNS turns
        &self.turns[self.turns.len() - 1]
    }
}

/// One line of the final results table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishLine {
    pub horse_id: String,
    pub horse_name: String,
    pub rank: u32,
    pub distance: u32,
    /// `m:ss`, or `DNF` for a horse that never moved
    pub time: String,
}

/// Final result of a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceOutcome {
    pub race_id: String,
    /// Finish lines in rank order
    pub results: Vec<FinishLine>,
    pub player_id: String,
    pub player_rank: u32,
    pub prize_money: u32,
    pub fan_gain: u32,
}

impl RaceOutcome {
    /// Build the outcome from the last turn of a race
    pub fn from_final_turn(
        race: &RaceDefinition,
        entrants: &[HorseSnapshot],
        player: usize,
        last: &TurnSnapshot,
    ) -> Self {
        let results = order_by_rank(&last.ranks)
            .into_iter()
            .map(|slot| FinishLine {
                horse_id: entrants[slot].id.clone(),
                horse_name: entrants[slot].name.clone(),
                rank: last.ranks[slot],
                distance: last.distances[slot],
                time: finish_time(last.distances[slot], race.distance),
            })
            .collect();

        let player_rank = last.ranks[player];
        let reward = reward::resolve(race, player_rank);

        Self {
            race_id: race.id.clone(),
            results,
            player_id: entrants[player].id.clone(),
            player_rank,
            prize_money: reward.prize_money,
            fan_gain: reward.fan_gain,
        }
    }

    /// Final rank of an entrant
    pub fn rank_of(&self, horse_id: &str) -> Option<u32> {
        self.results
            .iter()
            .find(|line| line.horse_id == horse_id)
            .map(|line| line.rank)
    }

    pub fn player_won(&self) -> bool {
        self.player_rank == 1
    }
}

/// Finish time display: the base time stretched by how short the horse fell
pub fn finish_time(distance: u32, race_distance: u32) -> String {
    if distance == 0 || race_distance == 0 {
        return "DNF".to_string();
    }
    let efficiency = (distance as f64 / race_distance as f64).min(1.0);
    let secs = (BASE_FINISH_SECS / efficiency) as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Milestone call for `turn`, naming the current leader
fn milestone_commentary(turn: u32, total: u32, leader: &str) -> Option<String> {
    let line = if turn == 1 {
        format!("And they're off! {leader} breaks sharpest.")
    } else if turn == total / 4 {
        format!("At the first quarter, {leader} takes the lead!")
    } else if turn == total / 2 {
        format!("Halfway there and {leader} is still in front!")
    } else if turn == total * 3 / 4 {
        format!("Final quarter: {leader} leads into the home stretch!")
    } else if turn == total {
        format!("{leader} crosses the finish line first!")
    } else {
        return None;
    };
    Some(line)
}

/// Precompute a whole race.
///
/// `horses` may hold more snapshots than the race needs; entrants are looked
/// up by ID and laid out in the race's gate order.
pub fn simulate<R: Rng>(
    race: &RaceDefinition,
    horses: &[HorseSnapshot],
    player_id: &str,
    strategy: StrategySelection,
    rng: &mut R,
) -> Result<(Trajectory, RaceOutcome), RaceError> {
    race.validate(player_id)?;

    let entrants = race
        .entrants
        .iter()
        .map(|id| {
            horses
                .iter()
                .find(|h| &h.id == id)
                .cloned()
                .ok_or_else(|| RaceError::MissingSnapshot(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let player = race
        .slot_of(player_id)
        .ok_or_else(|| RaceError::PlayerNotEntered(player_id.to_string()))?;

    let total = race.turns();
    let mut distances = vec![0u32; entrants.len()];
    let mut stamina: Vec<u32> = entrants.iter().map(HorseSnapshot::race_stamina).collect();
    let mut turns = Vec::with_capacity(total as usize);
    let mut commentary = vec![
        "The race is about to begin!".to_string(),
        format!("{} horses are lined up at the starting gate", entrants.len()),
    ];

    log::info!(
        "Simulating {} ({}m, {} turns, {} entrants)",
        race.name,
        race.distance,
        total,
        entrants.len()
    );

    for turn in 1..=total {
        for (slot, horse) in entrants.iter().enumerate() {
            let stage = (slot == player).then_some(strategy);
            let speed = entrant_speed(horse, stage, turn, total);
            let jitter = rng.random_range(JITTER_MIN..=JITTER_MAX);
            let movement = (speed as f64 * jitter) as u32;

            let cost = movement / 2;
            if stamina[slot] >= cost {
                distances[slot] += movement;
                stamina[slot] -= cost;
            } else {
                // Out of gas: half a stride
                distances[slot] += movement / 2;
                stamina[slot] = 0;
            }
        }

        let ranks = rank_by_distance(&distances);
        let leader_name = leader(&ranks)
            .map(|slot| entrants[slot].name.as_str())
            .unwrap_or_default();
        let call = milestone_commentary(turn, total, leader_name);
        if let Some(line) = &call {
            commentary.push(line.clone());
        }

        let mut events = Vec::new();
        if rng.random_bool(EVENT_CHANCE) {
            let pick = rng.random_range(0..FLAVOR_EVENTS.len());
            events.push(FLAVOR_EVENTS[pick].to_string());
        }

        turns.push(TurnSnapshot {
            turn,
            distances: distances.clone(),
            ranks,
            stamina: stamina.clone(),
            commentary: call,
            events,
        });
    }

    let trajectory = Trajectory {
        race: race.clone(),
        entrants,
        player,
        strategy,
        turns,
        commentary,
    };
    let outcome = RaceOutcome::from_final_turn(
        &trajectory.race,
        &trajectory.entrants,
        player,
        trajectory.final_turn(),
    );

    log::info!(
        "Simulated {}: player finishes {} of {}",
        race.name,
        outcome.player_rank,
        trajectory.entrants.len()
    );

    Ok((trajectory, outcome))
}
