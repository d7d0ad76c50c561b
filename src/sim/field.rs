//! Rival generation for filling a race field

use rand::Rng;

use super::horse::HorseSnapshot;
use super::race::RaceDefinition;

const NAME_PREFIXES: [&str; 16] = [
    "Velvet", "Midnight", "Golden", "Silver", "Crimson", "Sapphire", "Obsidian", "Aurora",
    "Phoenix", "Thunder", "Storm", "Mystic", "Copper", "Ivory", "Cobalt", "Twilight",
];

const NAME_SUFFIXES: [&str; 16] = [
    "Mirage", "Legacy", "Grace", "Spirit", "Dreamer", "Zephyr", "Majesty", "Shadow", "Voyager",
    "Whisper", "Horizon", "Tempest", "Eclipse", "Runner", "Express", "Bolt",
];

/// Generate the rival that will take the next gate slot in `race`.
///
/// Rivals get stronger the further back they are drawn, so a full field has
/// a spread of ability around the race's rating bar.
pub fn generate_rival<R: Rng>(race: &RaceDefinition, rng: &mut R) -> HorseSnapshot {
    let prefix = NAME_PREFIXES[rng.random_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.random_range(0..NAME_SUFFIXES.len())];
    let slot = race.entrants.len();

    let base = race.min_rating + race.min_rating / 4;
    let stat = (base as i64 - 10 + slot as i64 * 5).max(0) as u32;

    HorseSnapshot::with_stats(format!("ai_{slot}"), format!("{prefix} {suffix}"), 3, stat)
}

/// Enter generated rivals until the field reaches `field_size` (or the race
/// capacity). New snapshots are appended to `horses`.
pub fn fill_field<R: Rng>(
    race: &mut RaceDefinition,
    horses: &mut Vec<HorseSnapshot>,
    field_size: usize,
    rng: &mut R,
) {
    let target = field_size.min(race.capacity);
    while race.entrants.len() < target {
        let rival = generate_rival(race, rng);
        if !race.add_entrant(&rival.id) {
            break;
        }
        horses.push(rival);
    }
}
