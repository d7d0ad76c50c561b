//! Live playback
//!
//! Plays a precomputed trajectory back one turn per tick. The base
//! trajectory is never written to: each played turn gets an overlay holding
//! the player's adjusted distance, the re-sorted ranks and any extra events.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::standings::rank_by_distance;
use super::state::{LaneShift, LiveSessionState, RngState, TrackSection, lane_modifier};
use super::trajectory::{RaceOutcome, Trajectory, TurnSnapshot};
use crate::consts::*;

/// Playback phase (selection phases live in the session layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Turns are still being played
    Racing,
    /// Every turn has been played and the outcome is final
    Result,
}

/// Player input accepted during a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceInput {
    MoveLane(LaneShift),
    UseWhip,
}

/// Player-row adjustments for one played turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOverlay {
    pub player_distance: u32,
    /// Full re-sort of the field with the adjusted player distance
    pub ranks: Vec<u32>,
    pub events: Vec<String>,
}

/// What one tick produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Live view of the turn just played
    pub snapshot: TurnSnapshot,
    /// Whether the caller should schedule another tick
    pub schedule_next: bool,
}

/// Tick-driven playback of one race
#[derive(Debug, Clone)]
pub struct LiveRace {
    trajectory: Trajectory,
    /// One overlay per played turn; `overlays[i]` belongs to turn `i + 1`
    overlays: Vec<TurnOverlay>,
    session: LiveSessionState,
    phase: PlaybackPhase,
    current_turn: u32,
    rng_state: RngState,
    rng: Pcg32,
    outcome: Option<RaceOutcome>,
}

impl LiveRace {
    /// Start playback of `trajectory`; `seed` drives the disobedience rolls
    pub fn new(trajectory: Trajectory, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        let overlays = Vec::with_capacity(trajectory.turns().len());
        Self {
            trajectory,
            overlays,
            session: LiveSessionState::new(),
            phase: PlaybackPhase::Racing,
            current_turn: 0,
            rng: rng_state.to_rng(),
            rng_state,
            outcome: None,
        }
    }

    /// The untouched precomputed race
    pub fn base(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn session(&self) -> &LiveSessionState {
        &self.session
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn rng_state(&self) -> RngState {
        self.rng_state
    }

    /// Last played turn (0 before the first tick)
    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn total_turns(&self) -> u32 {
        self.trajectory.total_turns()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PlaybackPhase::Result
    }

    /// Final outcome, once every turn has been played
    pub fn outcome(&self) -> Option<&RaceOutcome> {
        self.outcome.as_ref()
    }

    pub fn overlay(&self, turn: u32) -> Option<&TurnOverlay> {
        turn.checked_sub(1).and_then(|i| self.overlays.get(i as usize))
    }

    /// Live view of `turn`: the base row with the overlay applied, if played
    pub fn snapshot(&self, turn: u32) -> Option<TurnSnapshot> {
        let mut snapshot = self.trajectory.turn(turn)?.clone();
        if let Some(overlay) = self.overlay(turn) {
            snapshot.distances[self.trajectory.player_slot()] = overlay.player_distance;
            snapshot.ranks.clone_from(&overlay.ranks);
            snapshot.events.extend(overlay.events.iter().cloned());
        }
        Some(snapshot)
    }

    /// Live view of the last played turn
    pub fn current_snapshot(&self) -> Option<TurnSnapshot> {
        self.snapshot(self.current_turn)
    }

    /// Play the next turn. Returns `None` once the race is over, so a late
    /// or duplicated tick leaves the result untouched.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase == PlaybackPhase::Result {
            log::debug!("Tick after finish ignored");
            return None;
        }

        let total = self.total_turns();
        self.current_turn = (self.current_turn + 1).min(total);
        let turn = self.current_turn;

        let overlay = self.build_overlay(turn)?;
        self.overlays.push(overlay);

        self.session.tick_obedience();
        self.session.regenerate();

        let schedule_next = turn < total;
        if !schedule_next {
            self.finish();
        }

        log::debug!(
            "Turn {}/{}: lane {}, stamina {}, disobedient {}",
            turn,
            total,
            self.session.lane,
            self.session.stamina,
            self.session.disobedient
        );

        Some(TickReport {
            snapshot: self.snapshot(turn)?,
            schedule_next,
        })
    }

    /// Apply one input. Returns whether it changed anything; rejected inputs
    /// are silent.
    pub fn handle_input(&mut self, input: RaceInput) -> bool {
        match input {
            RaceInput::MoveLane(shift) => self.move_lane(shift),
            RaceInput::UseWhip => self.use_whip(),
        }
    }

    /// Change lane by one step
    pub fn move_lane(&mut self, shift: LaneShift) -> bool {
        if self.phase != PlaybackPhase::Racing {
            return false;
        }
        self.session.shift_lane(shift)
    }

    /// Whip the horse. Refused while disobedient, inside the cooldown, or
    /// short of stamina; otherwise pays stamina and rolls for disobedience.
    pub fn use_whip(&mut self) -> bool {
        if self.phase != PlaybackPhase::Racing || !self.session.can_whip(self.current_turn) {
            return false;
        }
        self.session.record_whip(self.current_turn);

        let player = self.trajectory.player();
        let chance = player.disobedience_chance(self.session.whip_uses);
        if self.rng.random_bool(chance) {
            let turns = player.disobedience_turns();
            self.session.start_disobedience(turns);
            log::info!(
                "{} turns disobedient for {} turns (chance {:.2})",
                player.name,
                turns,
                chance
            );
        }
        true
    }

    /// Player-row adjustments for `turn`, applied whip, lane, then
    /// disobedience, each on the running distance
    fn build_overlay(&self, turn: u32) -> Option<TurnOverlay> {
        let base = self.trajectory.turn(turn)?;
        let slot = self.trajectory.player_slot();
        let mut distance = base.distances[slot] as i64;
        let mut events = Vec::new();

        if self.session.whip_boost_active(turn) {
            distance += (distance as f64 * WHIP_BOOST) as i64;
            if self.session.turns_since_whip(turn) == 1 {
                events.push("Your horse surges forward from the whip!".to_string());
            }
        }

        let section = TrackSection::at(turn, self.total_turns());
        let bonus = lane_modifier(self.session.lane, section);
        distance = (distance + bonus as i64).max(0);
        if section == TrackSection::Bend {
            if bonus > 0 {
                events.push(format!("Inner lane advantage! +{bonus} through the bend"));
            } else if bonus < 0 {
                events.push(format!("Outside lane costs {bonus} through the bend"));
            }
        }

        if self.session.disobedient {
            distance -= (distance as f64 * DISOBEDIENCE_PENALTY) as i64;
            if self.session.disobedience_fresh() {
                events.push("Your horse is fighting your commands!".to_string());
            }
        }

        let player_distance = distance.max(0) as u32;
        let mut distances = base.distances.clone();
        distances[slot] = player_distance;

        Some(TurnOverlay {
            player_distance,
            ranks: rank_by_distance(&distances),
            events,
        })
    }

    fn finish(&mut self) {
        self.phase = PlaybackPhase::Result;
        if let Some(last) = self.snapshot(self.current_turn) {
            let outcome = RaceOutcome::from_final_turn(
                self.trajectory.race(),
                self.trajectory.entrants(),
                self.trajectory.player_slot(),
                &last,
            );
            log::info!(
                "Race {} finished: player rank {}, prize {}, fans {}",
                outcome.race_id,
                outcome.player_rank,
                outcome.prize_money,
                outcome.fan_gain
            );
            self.outcome = Some(outcome);
        }
    }
}
