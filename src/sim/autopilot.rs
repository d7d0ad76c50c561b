//! Idle/demo mode - the jockey rides itself
//!
//! Produces the inputs a sensible player would send before the next tick.

use super::state::{LaneShift, TrackSection};
use super::tick::{LiveRace, RaceInput};
use crate::consts::*;

/// Live stamina the autopilot keeps in reserve before whipping
const WHIP_RESERVE: u32 = 50;

/// Inputs to send before the next tick of `live`
pub fn inputs(live: &LiveRace) -> Vec<RaceInput> {
    let mut out = Vec::new();
    if live.is_finished() {
        return out;
    }

    let session = live.session();
    let total = live.total_turns();
    let next = (live.current_turn() + 1).min(total);
    let target = TrackSection::at(next, total).best_lane();

    if !session.disobedient {
        if session.lane > target {
            out.push(RaceInput::MoveLane(LaneShift::Inner));
        } else if session.lane < target {
            out.push(RaceInput::MoveLane(LaneShift::Outer));
        }
    }

    // Save the whip for the second half
    let late = next * 2 > total;
    if late
        && session.can_whip(live.current_turn())
        && session.stamina >= WHIP_RESERVE + WHIP_STAMINA_COST
    {
        out.push(RaceInput::UseWhip);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::race::{Formation, Pace, StrategySelection};
    use crate::sim::trajectory::simulate;
    use crate::sim::trajectory::tests::field_of_eight;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn live_race() -> LiveRace {
        let (race, horses) = field_of_eight();
        let strategy = StrategySelection::new(Formation::Mount, Pace::Conserve);
        let (trajectory, _) =
            simulate(&race, &horses, "player", strategy, &mut Pcg32::seed_from_u64(17)).unwrap();
        LiveRace::new(trajectory, 17)
    }

    #[test]
    fn test_heads_for_the_rail_in_the_first_bend() {
        let live = live_race();
        assert_eq!(inputs(&live), vec![RaceInput::MoveLane(LaneShift::Inner)]);
    }

    #[test]
    fn test_whips_only_in_second_half() {
        let mut live = live_race();
        for _ in 0..6 {
            live.tick();
        }
        assert!(!inputs(&live).contains(&RaceInput::UseWhip));

        live.tick();
        live.tick();
        assert!(inputs(&live).contains(&RaceInput::UseWhip));
    }

    #[test]
    fn test_autopilot_finishes_race_within_rules() {
        let mut live = live_race();
        while !live.is_finished() {
            for input in inputs(&live) {
                live.handle_input(input);
            }
            live.tick();
            assert!(live.session().stamina <= LIVE_STAMINA_MAX);
            assert!(live.session().lane < LANE_COUNT);
        }
        assert!(live.outcome().is_some());
        assert!(inputs(&live).is_empty());
    }
}
