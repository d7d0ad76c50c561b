//! Derby Dash - horse racing career core
//!
//! Core modules:
//! - `sim`: Race simulation (performance model, trajectory, live playback, rewards)
//! - `session`: Race selection, strategy and entry flow around a live race
//! - `settings`: Data-driven run configuration
//! - `error`: Precondition failures

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{RaceError, SettingsError};
pub use session::{RaceSession, SessionInput, SessionPhase, SessionResponse};
pub use settings::Settings;

/// Race tuning constants
pub mod consts {
    /// Meters covered per simulated turn
    pub const METERS_PER_TURN: u32 = 100;
    /// Shortest race in turns, regardless of distance
    pub const MIN_TURNS: u32 = 10;

    /// Per-turn speed jitter bounds (multiplicative)
    pub const JITTER_MIN: f64 = 0.8;
    pub const JITTER_MAX: f64 = 1.2;
    /// Chance that a turn carries a flavor event
    pub const EVENT_CHANCE: f64 = 0.10;

    /// Lanes run 0 (inner rail) .. 4 (outside)
    pub const LANE_COUNT: u8 = 5;
    pub const START_LANE: u8 = 2;

    /// Live (jockey) stamina pool
    pub const LIVE_STAMINA_MAX: u32 = 100;
    pub const STAMINA_REGEN_PER_TICK: u32 = 2;

    /// Whip rules
    pub const WHIP_STAMINA_COST: u32 = 25;
    pub const WHIP_COOLDOWN_TURNS: u32 = 3;
    /// Turns after a whip that still get the surge
    pub const WHIP_BOOST_WINDOW: u32 = 2;
    pub const WHIP_BOOST: f64 = 0.10;

    /// Disobedience rules
    pub const DISOBEDIENCE_PENALTY: f64 = 0.15;
    pub const DISOBEDIENCE_BASE_TURNS: i32 = 5;
    pub const DISOBEDIENCE_MIN_TURNS: i32 = 2;
    pub const DISOBEDIENCE_MIN_CHANCE: f64 = 0.05;
    pub const DISOBEDIENCE_MAX_CHANCE: f64 = 0.80;

    /// Playback cadence (one turn per tick)
    pub const TICK_INTERVAL_MS: u64 = 1500;

    /// Largest field the session fills with rivals
    pub const MAX_FIELD: usize = 8;

    /// Finish time of a horse that covers exactly the race distance
    pub const BASE_FINISH_SECS: f64 = 120.0;
}

/// Number of turns a race of `distance` meters is divided into
#[inline]
pub fn turn_count(distance: u32) -> u32 {
    (distance / consts::METERS_PER_TURN).max(consts::MIN_TURNS)
}
