//! Derby Dash entry point
//!
//! Runs one race from the card in the terminal, printing each turn as it is
//! played and the outcome as JSON at the end.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use derby_dash::sim::{Grade, HorseSnapshot, RaceDefinition, autopilot};
    use derby_dash::{RaceSession, SessionInput, SessionPhase, SessionResponse, Settings};

    env_logger::init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref());
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Derby Dash starting (seed {})", seed);

    let mut player = HorseSnapshot::with_stats("player", "Derby Dash", 4, 90);
    player.mental = 70;
    player.fatigue = 10;

    let card = vec![
        RaceDefinition::new("maiden-1600", "Spring Maiden", 1600, Grade::Maiden, 2_000, 0),
        RaceDefinition::new("g3-2000", "Harbour Stakes", 2000, Grade::G3, 10_000, 60),
        RaceDefinition::new("g1-2400", "Crown Derby", 2400, Grade::G1, 100_000, 140),
    ];

    let mut session = RaceSession::new(player, settings.purse, card, settings.field_size, seed);

    // Race select, strategy, entry
    for _ in 0..3 {
        if let SessionResponse::Refused(e) = session.handle(SessionInput::Confirm) {
            log::error!("Could not start a race: {}", e);
            return;
        }
    }
    if session.phase() != SessionPhase::Racing {
        log::error!("No race open to the player");
        return;
    }

    if let Some(live) = session.live() {
        let race = live.base().race();
        let strategy = live.base().strategy();
        println!(
            "{} ({} m, {}) riding {} / {}",
            race.name,
            race.distance,
            race.grade.as_str(),
            strategy.formation.as_str(),
            strategy.pace.as_str()
        );
        log::debug!("Playback seed {}", live.rng_state().seed);
        for line in live.base().commentary() {
            println!("  {line}");
        }
    }

    while session.phase() == SessionPhase::Racing {
        std::thread::sleep(settings.tick_interval());

        if settings.autopilot {
            let inputs = session.live().map(autopilot::inputs).unwrap_or_default();
            for input in inputs {
                session.handle(input.into());
            }
        }

        let Some(report) = session.tick() else {
            break;
        };
        let snapshot = &report.snapshot;
        let (lane, stamina, rank) = match session.live() {
            Some(live) => (
                live.session().lane,
                live.session().stamina,
                snapshot.ranks[live.base().player_slot()],
            ),
            None => break,
        };
        println!(
            "Turn {:>2}: P{} lane {} stamina {:>3}",
            snapshot.turn, rank, lane, stamina
        );
        for line in snapshot.commentary.iter().chain(&snapshot.events) {
            println!("  {line}");
        }
    }

    match session.handle(SessionInput::Confirm) {
        SessionResponse::Completed(outcome) => {
            if outcome.player_won() {
                println!("Winner! Prize {}, {} new fans", outcome.prize_money, outcome.fan_gain);
            } else {
                println!("Finished P{}", outcome.player_rank);
            }
            match serde_json::to_string_pretty(&outcome) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode outcome: {}", e),
            }
        }
        other => log::warn!("Race ended without an outcome: {:?}", other),
    }
    log::info!("Purse now {}", session.purse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; there is no terminal front end
}
