//! Race session: selection, strategy, entry, then a live race
//!
//! Mirrors the race screen flow `Selecting -> Strategy -> Confirming ->
//! Racing -> Result`. Once a race is running it cannot be left until the
//! result is in.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::RaceError;
use crate::sim::{
    HorseSnapshot, LaneShift, LiveRace, RaceDefinition, RaceInput, RaceOutcome,
    StrategySelection, TickReport, fill_field, simulate,
};

/// Current screen of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Selecting,
    Strategy,
    Confirming,
    Racing,
    Result,
}

/// Keyboard-level input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionInput {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Whip,
    Back,
    Quit,
}

impl From<RaceInput> for SessionInput {
    fn from(input: RaceInput) -> Self {
        match input {
            RaceInput::MoveLane(LaneShift::Inner) => SessionInput::Left,
            RaceInput::MoveLane(LaneShift::Outer) => SessionInput::Right,
            RaceInput::UseWhip => SessionInput::Whip,
        }
    }
}

/// What the session did with an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Nothing changed
    Ignored,
    /// Selection, strategy or jockey state changed
    Updated,
    /// A race was simulated and playback can begin
    Started,
    /// The race could not start
    Refused(RaceError),
    /// Result acknowledged; the outcome is handed back
    Completed(RaceOutcome),
    /// Leave the race screen
    Exit,
}

/// One player's trip through the race screen
#[derive(Debug)]
pub struct RaceSession {
    player: HorseSnapshot,
    purse: u32,
    races: Vec<RaceDefinition>,
    selected: usize,
    strategy: StrategySelection,
    phase: SessionPhase,
    field_size: usize,
    live: Option<LiveRace>,
    rng: Pcg32,
}

impl RaceSession {
    /// Open the race screen. Only races the player can enter are listed.
    pub fn new(
        player: HorseSnapshot,
        purse: u32,
        races: Vec<RaceDefinition>,
        field_size: usize,
        seed: u64,
    ) -> Self {
        let races: Vec<RaceDefinition> = races.into_iter().filter(|r| r.can_enter(&player)).collect();
        log::info!("{} races open to {}", races.len(), player.name);
        Self {
            player,
            purse,
            races,
            selected: 0,
            strategy: StrategySelection::default(),
            phase: SessionPhase::Selecting,
            field_size,
            live: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn purse(&self) -> u32 {
        self.purse
    }

    pub fn races(&self) -> &[RaceDefinition] {
        &self.races
    }

    pub fn selected_race(&self) -> Option<&RaceDefinition> {
        self.races.get(self.selected)
    }

    pub fn strategy(&self) -> StrategySelection {
        self.strategy
    }

    pub fn live(&self) -> Option<&LiveRace> {
        self.live.as_ref()
    }

    /// Drive playback one turn. Only meaningful while racing.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase != SessionPhase::Racing {
            return None;
        }
        let live = self.live.as_mut()?;
        let report = live.tick();
        if live.is_finished() {
            self.phase = SessionPhase::Result;
        }
        report
    }

    pub fn handle(&mut self, input: SessionInput) -> SessionResponse {
        use SessionInput::*;
        use SessionPhase::*;

        match (self.phase, input) {
            // No leaving mid-race
            (Racing, Quit | Back) => SessionResponse::Ignored,
            // Winnings are paid however the result screen is left
            (Result, Back) => self.complete_race(),
            (Result, Quit) => {
                self.complete_race();
                SessionResponse::Exit
            }
            (_, Quit) | (Selecting, Back) => SessionResponse::Exit,
            (Strategy | Confirming, Back) => {
                self.phase = Selecting;
                SessionResponse::Updated
            }

            (Selecting, Up) if self.selected > 0 => {
                self.selected -= 1;
                SessionResponse::Updated
            }
            (Selecting, Down) if self.selected + 1 < self.races.len() => {
                self.selected += 1;
                SessionResponse::Updated
            }
            (Selecting, Confirm) if !self.races.is_empty() => {
                self.phase = Strategy;
                SessionResponse::Updated
            }

            (Strategy, Up) => {
                self.strategy.formation = self.strategy.formation.prev();
                SessionResponse::Updated
            }
            (Strategy, Down) => {
                self.strategy.formation = self.strategy.formation.next();
                SessionResponse::Updated
            }
            (Strategy, Left) => {
                self.strategy.pace = self.strategy.pace.prev();
                SessionResponse::Updated
            }
            (Strategy, Right) => {
                self.strategy.pace = self.strategy.pace.next();
                SessionResponse::Updated
            }
            (Strategy, Confirm) => {
                self.phase = Confirming;
                SessionResponse::Updated
            }

            (Confirming, Confirm) => match self.start_race() {
                Ok(()) => SessionResponse::Started,
                Err(e) => {
                    log::warn!("Race start refused: {}", e);
                    // Short on money stays on the entry screen
                    if !matches!(e, RaceError::InsufficientFunds { .. }) {
                        self.phase = Selecting;
                    }
                    SessionResponse::Refused(e)
                }
            },

            (Racing, Left) => self.race_input(RaceInput::MoveLane(LaneShift::Inner)),
            (Racing, Right) => self.race_input(RaceInput::MoveLane(LaneShift::Outer)),
            (Racing, Confirm | Whip) => self.race_input(RaceInput::UseWhip),

            (Result, Confirm) => self.complete_race(),

            _ => SessionResponse::Ignored,
        }
    }

    fn race_input(&mut self, input: RaceInput) -> SessionResponse {
        match self.live.as_mut().map(|live| live.handle_input(input)) {
            Some(true) => SessionResponse::Updated,
            _ => SessionResponse::Ignored,
        }
    }

    /// Pay the entry fee, fill the field, simulate, and start playback
    fn start_race(&mut self) -> Result<(), RaceError> {
        let mut race = self.selected_race().cloned().ok_or(RaceError::NoRaceSelected)?;
        let fee = race.grade.entry_fee();
        if self.purse < fee {
            return Err(RaceError::InsufficientFunds { fee, purse: self.purse });
        }

        race.add_entrant(&self.player.id);
        let mut horses = vec![self.player.clone()];
        fill_field(&mut race, &mut horses, self.field_size, &mut self.rng);

        let (trajectory, _) = simulate(&race, &horses, &self.player.id, self.strategy, &mut self.rng)?;
        self.purse -= fee;

        let seed = self.rng.random::<u64>();
        log::info!(
            "Entered {} ({} {}) for {}, playback seed {}",
            race.name,
            self.strategy.formation.as_str(),
            self.strategy.pace.as_str(),
            fee,
            seed
        );
        self.live = Some(LiveRace::new(trajectory, seed));
        self.phase = SessionPhase::Racing;
        Ok(())
    }

    /// Collect winnings and return to race selection
    fn complete_race(&mut self) -> SessionResponse {
        let Some(outcome) = self.live.take().and_then(|live| live.outcome().cloned()) else {
            self.phase = SessionPhase::Selecting;
            return SessionResponse::Ignored;
        };
        self.purse += outcome.prize_money;
        self.phase = SessionPhase::Selecting;
        SessionResponse::Completed(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Formation, Grade, Pace};

    fn player() -> HorseSnapshot {
        HorseSnapshot::with_stats("player", "Dash", 4, 100)
    }

    fn card() -> Vec<RaceDefinition> {
        vec![
            RaceDefinition::new("m1", "Maiden Mile", 1600, Grade::Maiden, 2000, 0),
            RaceDefinition::new("g1", "Crown Cup", 2400, Grade::G1, 80_000, 150),
            RaceDefinition::new("g3", "Autumn Sprint", 1200, Grade::G3, 8000, 60),
        ]
    }

    fn session(purse: u32) -> RaceSession {
        RaceSession::new(player(), purse, card(), 8, 99)
    }

    fn start(session: &mut RaceSession) {
        assert_eq!(session.handle(SessionInput::Confirm), SessionResponse::Updated);
        assert_eq!(session.handle(SessionInput::Confirm), SessionResponse::Updated);
        assert_eq!(session.handle(SessionInput::Confirm), SessionResponse::Started);
    }

    #[test]
    fn test_only_eligible_races_listed() {
        let session = session(10_000);
        let ids: Vec<&str> = session.races().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "g3"]);
    }

    #[test]
    fn test_strategy_cycling() {
        let mut session = session(10_000);
        session.handle(SessionInput::Confirm);
        assert_eq!(session.phase(), SessionPhase::Strategy);
        assert_eq!(session.strategy(), StrategySelection::new(Formation::Draft, Pace::Even));

        session.handle(SessionInput::Down);
        session.handle(SessionInput::Left);
        assert_eq!(session.strategy(), StrategySelection::new(Formation::Mount, Pace::Fast));
    }

    #[test]
    fn test_full_race_flow() {
        let mut session = session(10_000);
        start(&mut session);
        assert_eq!(session.phase(), SessionPhase::Racing);
        assert_eq!(session.purse(), 10_000 - Grade::Maiden.entry_fee());

        let live = session.live().unwrap();
        assert_eq!(live.base().entrants().len(), 8);
        assert_eq!(live.base().entrants()[0].id, "player");

        // Quitting mid-race is refused
        assert_eq!(session.handle(SessionInput::Quit), SessionResponse::Ignored);
        assert_eq!(session.handle(SessionInput::Back), SessionResponse::Ignored);

        let mut ticks = 0;
        while session.tick().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 16);
        assert_eq!(session.phase(), SessionPhase::Result);

        let purse_before = session.purse();
        match session.handle(SessionInput::Confirm) {
            SessionResponse::Completed(outcome) => {
                assert_eq!(session.purse(), purse_before + outcome.prize_money);
                assert_eq!(outcome.results.len(), 8);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(session.phase(), SessionPhase::Selecting);
        assert!(session.live().is_none());
    }

    fn run_to_result(session: &mut RaceSession) {
        start(session);
        while session.tick().is_some() {}
        assert_eq!(session.phase(), SessionPhase::Result);
    }

    #[test]
    fn test_back_from_result_pays_winnings() {
        let mut session = session(10_000);
        run_to_result(&mut session);
        let prize = session.live().and_then(|l| l.outcome()).map(|o| o.prize_money).unwrap();
        let purse = session.purse();

        assert!(matches!(session.handle(SessionInput::Back), SessionResponse::Completed(_)));
        assert_eq!(session.purse(), purse + prize);
        assert_eq!(session.phase(), SessionPhase::Selecting);
        assert!(session.live().is_none());
    }

    #[test]
    fn test_quit_from_result_pays_winnings() {
        let mut session = session(10_000);
        run_to_result(&mut session);
        let prize = session.live().and_then(|l| l.outcome()).map(|o| o.prize_money).unwrap();
        let purse = session.purse();

        assert_eq!(session.handle(SessionInput::Quit), SessionResponse::Exit);
        assert_eq!(session.purse(), purse + prize);
        assert!(session.live().is_none());
    }

    #[test]
    fn test_insufficient_funds_stays_on_entry() {
        let mut session = session(50);
        session.handle(SessionInput::Confirm);
        session.handle(SessionInput::Confirm);
        assert_eq!(
            session.handle(SessionInput::Confirm),
            SessionResponse::Refused(RaceError::InsufficientFunds { fee: 100, purse: 50 })
        );
        assert_eq!(session.phase(), SessionPhase::Confirming);
        assert_eq!(session.purse(), 50);
    }

    #[test]
    fn test_malformed_race_returns_to_selection() {
        let broken = vec![RaceDefinition::new("x", "Nowhere", 0, Grade::Maiden, 100, 0)];
        let mut session = RaceSession::new(player(), 1000, broken, 8, 1);
        session.handle(SessionInput::Confirm);
        session.handle(SessionInput::Confirm);
        assert_eq!(
            session.handle(SessionInput::Confirm),
            SessionResponse::Refused(RaceError::ZeroDistance)
        );
        assert_eq!(session.phase(), SessionPhase::Selecting);
        assert_eq!(session.purse(), 1000);
    }

    #[test]
    fn test_race_inputs_reach_jockey() {
        let mut session = session(10_000);
        start(&mut session);
        assert_eq!(session.handle(SessionInput::Left), SessionResponse::Updated);
        assert_eq!(session.live().unwrap().session().lane, 1);
        // Cooldown from the start gate
        assert_eq!(session.handle(SessionInput::Whip), SessionResponse::Ignored);
        assert_eq!(SessionInput::from(RaceInput::UseWhip), SessionInput::Whip);
    }

    #[test]
    fn test_navigation_outside_race() {
        let mut session = session(10_000);
        assert_eq!(session.handle(SessionInput::Up), SessionResponse::Ignored);
        assert_eq!(session.handle(SessionInput::Down), SessionResponse::Updated);
        assert_eq!(session.selected_race().map(|r| r.id.as_str()), Some("g3"));
        assert_eq!(session.handle(SessionInput::Down), SessionResponse::Ignored);
        assert!(session.tick().is_none());
        assert_eq!(session.handle(SessionInput::Back), SessionResponse::Exit);
    }
}
