//! Race simulation module
//!
//! All race logic lives here:
//! - Precomputation is pure given its RNG (seeded via `rand_pcg`)
//! - Playback never rewrites the precomputed trajectory
//! - Stable ordering by gate slot wherever ranks are derived
//! - No rendering, persistence or menu dependencies

pub mod autopilot;
pub mod field;
pub mod horse;
pub mod performance;
pub mod race;
pub mod reward;
pub mod standings;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use field::{fill_field, generate_rival};
pub use horse::{HorseSnapshot, age_performance_factor};
pub use performance::{apply_strategy, entrant_speed, speed};
pub use race::{Formation, Grade, Pace, RaceDefinition, StrategySelection};
pub use reward::{Reward, fans_for_rank, prize_for_rank, resolve};
pub use standings::rank_by_distance;
pub use state::{LaneShift, LiveSessionState, RngState, TrackSection, lane_modifier};
pub use tick::{LiveRace, PlaybackPhase, RaceInput, TickReport, TurnOverlay};
pub use trajectory::{FinishLine, RaceOutcome, Trajectory, TurnSnapshot, simulate};
