//! Fixture generation
//!
//! League play is a fixed double round-robin built from a canonical
//! circle-method table: with five players per division each half is five
//! rounds of two matches (one bye per round), the second half repeats the
//! table with colours reversed. Both divisions proceed in lock-step by
//! round number.

use tracing::error;

use crate::error::{LeagueError, Result};
use crate::models::{Division, Match, MatchKind, MatchSide, Player, Season};

/// Players per division; a hard scheduling precondition.
pub const DIVISION_SIZE: usize = 5;

/// Rounds in one half of the round-robin (circle method, odd field).
const ROUNDS_PER_HALF: u32 = 5;

/// Double round-robin for one division: 20 matches over rounds 1-10, two
/// per round, every pair meeting once per half with home/away reversed.
///
/// A wrong roster size aborts generation for the division (logged, empty
/// result); the orchestrator detects the inconsistency from the count.
pub fn league_schedule(players: &[Player], division: Division, season: u32) -> Vec<Match> {
    if players.len() != DIVISION_SIZE {
        error!(
            division = division.number(),
            found = players.len(),
            "cannot schedule division: roster size must be {}",
            DIVISION_SIZE
        );
        return Vec::new();
    }

    let mut matches = Vec::with_capacity(DIVISION_SIZE * (DIVISION_SIZE - 1));
    for (round, pairs) in circle_table().iter().enumerate() {
        let round = round as u32 + 1;
        for &(home, away) in pairs {
            matches.push(Match::fixture(
                &players[home],
                &players[away],
                division,
                MatchKind::League,
                season,
                round,
            ));
        }
    }

    // Second half: same table, colours reversed, rounds continue.
    for (round, pairs) in circle_table().iter().enumerate() {
        let round = round as u32 + 1 + ROUNDS_PER_HALF;
        for &(home, away) in pairs {
            matches.push(Match::fixture(
                &players[away],
                &players[home],
                division,
                MatchKind::League,
                season,
                round,
            ));
        }
    }

    matches
}

/// Canonical single round-robin for five players: five rounds of two
/// pairings, one bye per round. Circle method with a dummy sixth slot;
/// index 0 stays fixed while the rest rotate, so adjacent rounds never
/// repeat a pairing.
fn circle_table() -> [[(usize, usize); 2]; ROUNDS_PER_HALF as usize] {
    const BYE: usize = 5;
    let mut slots = [0usize, 1, 2, 3, 4, BYE];
    let mut table = [[(0, 0); 2]; ROUNDS_PER_HALF as usize];

    for round in table.iter_mut() {
        let mut pair_idx = 0;
        for i in 0..3 {
            let (a, b) = (slots[i], slots[5 - i]);
            if a == BYE || b == BYE {
                continue;
            }
            round[pair_idx] = (a, b);
            pair_idx += 1;
        }
        debug_assert_eq!(pair_idx, 2);

        // Rotate everything but the fixed first slot.
        slots[1..].rotate_right(1);
    }

    table
}

/// Cup semifinals for the four seeds in rank order: 1v4 and 2v3, both at
/// the given round.
pub fn cup_semifinals(seeds: &[&Player], season: u32, round: u32) -> Result<Vec<Match>> {
    if seeds.len() != 4 {
        return Err(LeagueError::InvalidCupEntrants(seeds.len()));
    }

    Ok(vec![
        Match::fixture(seeds[0], seeds[3], Division::One, MatchKind::CupSemifinal, season, round),
        Match::fixture(seeds[1], seeds[2], Division::One, MatchKind::CupSemifinal, season, round),
    ])
}

/// Third-place match and final, generated once both semifinals complete.
/// The losers meet one round after the semis, the winners one round later
/// still.
pub fn cup_finals(
    winners: [MatchSide; 2],
    losers: [MatchSide; 2],
    semi_round: u32,
    season: u32,
) -> Vec<Match> {
    let third = fixture_from_sides(
        losers[0].clone(),
        losers[1].clone(),
        MatchKind::CupThirdPlace,
        season,
        semi_round + 1,
    );
    let final_match = fixture_from_sides(
        winners[0].clone(),
        winners[1].clone(),
        MatchKind::CupFinal,
        season,
        semi_round + 2,
    );
    vec![third, final_match]
}

fn fixture_from_sides(
    player1: MatchSide,
    player2: MatchSide,
    kind: MatchKind,
    season: u32,
    round: u32,
) -> Match {
    Match {
        id: crate::models::MatchId::new(),
        season,
        round,
        division: Division::One,
        kind,
        player1,
        player2,
        completed: false,
        winner: None,
        set_winners: Vec::new(),
        set_scores: Vec::new(),
    }
}

/// Merge the two division schedules and the cup sequence into the
/// authoritative play order: league rounds ascending with division 2
/// before division 1 within a round, then the whole cup sequence with its
/// rounds renumbered to continue after the last league round.
pub fn interleave(
    div1_matches: Vec<Match>,
    div2_matches: Vec<Match>,
    cup_matches: Vec<Match>,
) -> Vec<Match> {
    let last_league_round = div1_matches
        .iter()
        .chain(&div2_matches)
        .map(|m| m.round)
        .max()
        .unwrap_or(0);

    let mut ordered = Vec::with_capacity(div1_matches.len() + div2_matches.len() + cup_matches.len());
    for round in 1..=last_league_round {
        ordered.extend(div2_matches.iter().filter(|m| m.round == round).cloned());
        ordered.extend(div1_matches.iter().filter(|m| m.round == round).cloned());
    }

    let first_cup_round = cup_matches.iter().map(|m| m.round).min().unwrap_or(1);
    for mut m in cup_matches {
        m.round = m.round - first_cup_round + last_league_round + 1;
        ordered.push(m);
    }

    ordered
}

/// Build a full season: both division schedules, the cup semifinals for
/// the given seeds, interleaved into one play order.
pub fn build_season(
    div1_players: &[Player],
    div2_players: &[Player],
    cup_seeds: &[&Player],
    season: u32,
) -> Result<Season> {
    if div1_players.len() != DIVISION_SIZE {
        return Err(LeagueError::InvalidRosterSize {
            division: 1,
            expected: DIVISION_SIZE,
            found: div1_players.len(),
        });
    }
    if div2_players.len() != DIVISION_SIZE {
        return Err(LeagueError::InvalidRosterSize {
            division: 2,
            expected: DIVISION_SIZE,
            found: div2_players.len(),
        });
    }

    let div1 = league_schedule(div1_players, Division::One, season);
    let div2 = league_schedule(div2_players, Division::Two, season);
    let semis = cup_semifinals(cup_seeds, season, 1)?;
    let participants = cup_seeds.iter().map(|p| p.id).collect();

    let matches = interleave(div1, div2, semis);
    Ok(Season::new(season, matches, participants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerId;
    use crate::roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn division_roster(division: Division, seed: u64) -> Vec<Player> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..5).map(|_| roster::generate_player(division, &mut rng)).collect()
    }

    #[test]
    fn test_double_round_robin_shape() {
        let players = division_roster(Division::One, 10);
        let matches = league_schedule(&players, Division::One, 1);

        assert_eq!(matches.len(), 20);

        // Two matches per round, rounds 1-10.
        for round in 1..=10 {
            assert_eq!(matches.iter().filter(|m| m.round == round).count(), 2);
        }

        // Each player appears in exactly 8 matches (4 opponents x 2 legs).
        for p in &players {
            let count = matches.iter().filter(|m| m.involves(p.id)).count();
            assert_eq!(count, 8, "{} has {} matches", p.name, count);
        }
    }

    #[test]
    fn test_every_pair_meets_twice_with_reversed_colours() {
        let players = division_roster(Division::Two, 20);
        let matches = league_schedule(&players, Division::Two, 1);

        let mut ordered_pairs: HashMap<(PlayerId, PlayerId), usize> = HashMap::new();
        for m in &matches {
            *ordered_pairs.entry((m.player1.player_id, m.player2.player_id)).or_default() += 1;
        }

        // 20 distinct ordered pairs, one match each: the reverse fixture
        // always swaps player1/player2.
        assert_eq!(ordered_pairs.len(), 20);
        assert!(ordered_pairs.values().all(|&c| c == 1));
        for (&(a, b), _) in &ordered_pairs {
            assert_eq!(ordered_pairs.get(&(b, a)), Some(&1));
        }
    }

    #[test]
    fn test_adjacent_rounds_never_repeat_a_pairing() {
        let players = division_roster(Division::One, 30);
        let matches = league_schedule(&players, Division::One, 1);

        let pairing_key = |m: &Match| {
            let (a, b) = (m.player1.player_id, m.player2.player_id);
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        };

        for round in 1..10 {
            let current: Vec<_> =
                matches.iter().filter(|m| m.round == round).map(pairing_key).collect();
            let next: Vec<_> =
                matches.iter().filter(|m| m.round == round + 1).map(pairing_key).collect();
            for pair in &current {
                assert!(!next.contains(pair), "pairing repeats across rounds {round} and {}", round + 1);
            }
        }
    }

    #[test]
    fn test_wrong_roster_size_aborts_generation() {
        let players = division_roster(Division::One, 40);
        assert!(league_schedule(&players[..4], Division::One, 1).is_empty());
        assert!(league_schedule(&[], Division::One, 1).is_empty());
    }

    #[test]
    fn test_cup_semifinals_seeding() {
        let players = division_roster(Division::One, 50);
        let seeds: Vec<&Player> = players.iter().take(4).collect();

        let semis = cup_semifinals(&seeds, 3, 1).unwrap();
        assert_eq!(semis.len(), 2);
        assert_eq!(semis[0].player1.player_id, seeds[0].id);
        assert_eq!(semis[0].player2.player_id, seeds[3].id);
        assert_eq!(semis[1].player1.player_id, seeds[1].id);
        assert_eq!(semis[1].player2.player_id, seeds[2].id);
        assert!(semis.iter().all(|m| m.kind == MatchKind::CupSemifinal));
    }

    #[test]
    fn test_cup_semifinals_requires_four_entrants() {
        let players = division_roster(Division::One, 60);
        let seeds: Vec<&Player> = players.iter().take(3).collect();

        let err = cup_semifinals(&seeds, 1, 1).unwrap_err();
        assert!(matches!(err, LeagueError::InvalidCupEntrants(3)));
    }

    #[test]
    fn test_interleave_order_and_cup_renumbering() {
        let div1_players = division_roster(Division::One, 70);
        let div2_players = division_roster(Division::Two, 71);
        let div1 = league_schedule(&div1_players, Division::One, 1);
        let div2 = league_schedule(&div2_players, Division::Two, 1);
        let seeds: Vec<&Player> = div1_players.iter().take(4).collect();
        let semis = cup_semifinals(&seeds, 1, 1).unwrap();

        let ordered = interleave(div1, div2, semis);
        assert_eq!(ordered.len(), 42);

        // Within each league round, division 2 comes before division 1.
        for round in 1..=10 {
            let in_round: Vec<_> =
                ordered.iter().filter(|m| m.round == round && m.kind == MatchKind::League).collect();
            assert_eq!(in_round.len(), 4);
            assert!(in_round[..2].iter().all(|m| m.division == Division::Two));
            assert!(in_round[2..].iter().all(|m| m.division == Division::One));
        }

        // Cup semis renumbered to follow the last league round.
        let semi_rounds: Vec<_> = ordered
            .iter()
            .filter(|m| m.kind == MatchKind::CupSemifinal)
            .map(|m| m.round)
            .collect();
        assert_eq!(semi_rounds, vec![11, 11]);

        // Round numbers are non-decreasing along the play order.
        for pair in ordered.windows(2) {
            assert!(pair[0].round <= pair[1].round);
        }
    }

    #[test]
    fn test_build_season_rejects_bad_rosters() {
        let div1 = division_roster(Division::One, 80);
        let div2 = division_roster(Division::Two, 81);
        let seeds: Vec<&Player> = div1.iter().take(4).collect();

        let err = schedule_err(&div1[..3], &div2, &seeds);
        assert!(matches!(err, LeagueError::InvalidRosterSize { division: 1, .. }));

        let err = schedule_err(&div1, &div2[..2], &seeds);
        assert!(matches!(err, LeagueError::InvalidRosterSize { division: 2, .. }));
    }

    fn schedule_err(div1: &[Player], div2: &[Player], seeds: &[&Player]) -> LeagueError {
        build_season(div1, div2, seeds, 1).unwrap_err()
    }
}
