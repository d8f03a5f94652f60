//! Roster generation
//!
//! Produces fresh players when the league initializes and 1:1 replacements
//! for retirees. Nationality is an opaque label drawn from the fictional
//! country pool; the engine never validates it.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Division, Player, PlayerId};

const FIRST_NAMES: &[&str] = &[
    "Alex", "Jamie", "Taylor", "Jordan", "Casey", "Riley", "Morgan", "Avery", "Blake", "Cameron",
    "Drew", "Emery", "Finley", "Harper", "Hayden", "Kennedy", "Logan", "Peyton", "Quinn", "Reese",
    "River", "Sage", "Skylar", "Phoenix", "Rowan", "Elliott", "Dakota", "Marlowe", "Indigo", "Kai",
    "Nova", "Atlas",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Thompson", "Martinez", "Wilson", "Garcia", "Johnson", "Brown", "Davis", "Miller",
    "Rodriguez", "Lee", "Clark", "Lewis", "Walker", "Hall", "Allen", "Young", "King", "Wright",
    "Lopez", "Scott", "Green", "Adams", "Baker", "Nelson", "Carter", "Mitchell", "Perez",
    "Roberts", "Turner", "Phillips", "Campbell", "Parker", "Evans", "Edwards", "Collins",
    "Stewart",
];

const COUNTRIES: &[&str] = &[
    "Norvalla", "Baltovia", "Jamora", "Estora", "Luxoria", "Kavalin", "Tursenia", "Virelia",
    "Udran", "Mequaria",
];

/// Rating band for newly generated division-2 players.
const DIV2_RATING: std::ops::RangeInclusive<f32> = 20.0..=50.0;
/// Rating band for the initial division-1 roster.
const DIV1_RATING: std::ops::RangeInclusive<f32> = 45.0..=75.0;

/// Generate a single new player for the given division.
///
/// Division 1 players are only generated during first-time initialization;
/// every replacement enters the league through division 2.
pub fn generate_player(division: Division, rng: &mut impl Rng) -> Player {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Anderson");
    let nationality = COUNTRIES.choose(rng).copied().unwrap_or("Norvalla");

    let rating = match division {
        Division::One => rng.gen_range(DIV1_RATING),
        Division::Two => rng.gen_range(DIV2_RATING),
    };

    Player {
        id: PlayerId::new(),
        name: format!("{} {}", first, last),
        nationality: nationality.to_string(),
        age: rng.gen_range(18..=23),
        rating,
        development_rate: rng.gen_range(0.2..=1.0),
        peak_age: rng.gen_range(26..=30),
        career_length: rng.gen_range(8..=10),
        seasons_played: 0,
        division,
        is_retired: false,
        is_declined: false,
        games_played: 0,
        games_won: 0,
        games_lost: 0,
        sets_won: 0,
        sets_lost: 0,
        points_scored: 0,
        points_conceded: 0,
        championships_won: 0,
        podiums: 0,
        cups_won: 0,
        cups_played: 0,
        career_high_rating: rating,
        season_history: Vec::new(),
        head_to_head: std::collections::HashMap::new(),
        created_at: Utc::now(),
    }
}

/// First-time initialization: 10 players, 5 per division, division 1 drawn
/// from the higher rating band.
pub fn generate_initial_players(rng: &mut impl Rng) -> Vec<Player> {
    let mut players = Vec::with_capacity(10);
    for _ in 0..5 {
        players.push(generate_player(Division::One, rng));
    }
    for _ in 0..5 {
        players.push(generate_player(Division::Two, rng));
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_player_within_bands() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let p = generate_player(Division::Two, &mut rng);
            assert!((20.0..=50.0).contains(&p.rating), "div 2 rating out of band: {}", p.rating);
            assert!((18..=23).contains(&p.age));
            assert!((0.2..=1.0).contains(&p.development_rate));
            assert!((26..=30).contains(&p.peak_age));
            assert!((8..=10).contains(&p.career_length));
            assert_eq!(p.seasons_played, 0);
            assert!(!p.is_retired);
            assert!((p.career_high_rating - p.rating).abs() < f32::EPSILON);
        }

        for _ in 0..200 {
            let p = generate_player(Division::One, &mut rng);
            assert!((45.0..=75.0).contains(&p.rating), "div 1 rating out of band: {}", p.rating);
        }
    }

    #[test]
    fn test_initial_roster_split() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let players = generate_initial_players(&mut rng);

        assert_eq!(players.len(), 10);
        assert_eq!(players.iter().filter(|p| p.division == Division::One).count(), 5);
        assert_eq!(players.iter().filter(|p| p.division == Division::Two).count(), 5);

        // Ids must be unique across the roster.
        let mut ids: Vec<_> = players.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_nationality_from_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let p = generate_player(Division::Two, &mut rng);
            assert!(COUNTRIES.contains(&p.nationality.as_str()));
        }
    }
}
