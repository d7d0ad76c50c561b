//! Error types
//!
//! Only precondition failures are errors. Rejected whips and lane changes are
//! policy outcomes and never reach this module.

use thiserror::Error;

/// A race that cannot be started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaceError {
    #[error("race distance must be greater than zero")]
    ZeroDistance,

    #[error("race has no entrants")]
    NoEntrants,

    #[error("race is over capacity: {entrants} entrants, capacity {capacity}")]
    OverCapacity { entrants: usize, capacity: usize },

    #[error("player horse {0} is not entered in the race")]
    PlayerNotEntered(String),

    #[error("no snapshot supplied for entrant {0}")]
    MissingSnapshot(String),

    #[error("entrant {0} is listed more than once")]
    DuplicateEntrant(String),

    #[error("no race selected")]
    NoRaceSelected,

    #[error("entry fee {fee} exceeds purse {purse}")]
    InsufficientFunds { fee: u32, purse: u32 },
}

/// Settings file could not be read
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
