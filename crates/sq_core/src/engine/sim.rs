//! Probabilistic match simulation
//!
//! Outcome computation is pure: given two ratings, a match kind and an RNG
//! it produces a [`MatchOutcome`]. Applying the outcome to the two live
//! player records is a separate step, so the probability model can be
//! tested with a seeded RNG without touching registry state.

use rand::Rng;

use crate::models::{
    HeadToHeadRecord, Match, MatchId, MatchKind, MatchSide, Player, SetScore, Side,
};

/// Per-match form swing added to each player's rating, in rating points.
const FORM_SWING: f32 = 4.0;

/// Scale constant of the logistic set-win curve. A 25-point rating edge
/// gives roughly a 90% chance of taking a set.
const LOGISTIC_SCALE: f32 = 25.0;

/// Points needed to win a regular set.
const SET_TARGET: u8 = 11;

/// Number of set wins required to take the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestOf {
    Three,
    Five,
}

impl BestOf {
    pub fn sets_to_win(self) -> u8 {
        match self {
            BestOf::Three => 2,
            BestOf::Five => 3,
        }
    }
}

/// Pure result of a simulated match, before any registry mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub winner: Side,
    pub format: BestOf,
    pub set_winners: Vec<Side>,
    pub set_scores: Vec<SetScore>,
}

impl MatchOutcome {
    /// Sets won by each side, `(player1, player2)`.
    pub fn sets_tally(&self) -> (u8, u8) {
        let p1 = self.set_winners.iter().filter(|s| **s == Side::P1).count() as u8;
        (p1, self.set_winners.len() as u8 - p1)
    }

    /// Rally points accumulated by each side across all sets.
    pub fn points_tally(&self) -> (u32, u32) {
        let mut p1 = 0u32;
        let mut p2 = 0u32;
        for (winner, score) in self.set_winners.iter().zip(&self.set_scores) {
            match winner {
                Side::P1 => {
                    p1 += score.winner_points as u32;
                    p2 += score.loser_points as u32;
                }
                Side::P2 => {
                    p2 += score.winner_points as u32;
                    p1 += score.loser_points as u32;
                }
            }
        }
        (p1, p2)
    }

    /// Simulate a match between two ratings.
    pub fn compute(rating1: f32, rating2: f32, kind: MatchKind, rng: &mut impl Rng) -> Self {
        // Day-to-day variance: independent uniform form swing per player.
        let form1 = rating1 + rng.gen_range(-FORM_SWING..=FORM_SWING);
        let form2 = rating2 + rng.gen_range(-FORM_SWING..=FORM_SWING);

        let p1_set = set_win_probability(form1, form2);
        let format = draw_format(kind, rng);
        let needed = format.sets_to_win();

        let mut set_winners = Vec::new();
        let mut set_scores = Vec::new();
        let mut tally = (0u8, 0u8);

        while tally.0 < needed && tally.1 < needed {
            let winner = if rng.gen_bool(p1_set as f64) { Side::P1 } else { Side::P2 };
            let gap = (form1 - form2).abs();
            set_scores.push(draw_set_score(gap, rng));
            match winner {
                Side::P1 => tally.0 += 1,
                Side::P2 => tally.1 += 1,
            }
            set_winners.push(winner);
        }

        let winner = if tally.0 > tally.1 { Side::P1 } else { Side::P2 };
        Self { winner, format, set_winners, set_scores }
    }
}

/// Logistic set-win probability for the first player.
fn set_win_probability(form1: f32, form2: f32) -> f32 {
    let delta = form1 - form2;
    1.0 / (1.0 + 10f32.powf(-delta / LOGISTIC_SCALE))
}

/// Match length varies: league ties are usually best-of-three, cup ties
/// usually best-of-five.
fn draw_format(kind: MatchKind, rng: &mut impl Rng) -> BestOf {
    let long_odds = if kind.is_cup() { 0.7 } else { 0.3 };
    if rng.gen_bool(long_odds) {
        BestOf::Five
    } else {
        BestOf::Three
    }
}

/// Synthesize a plausible set score from the form gap. Close matchups
/// produce tight sets; one-sided matchups produce lopsided ones. A drawn
/// loser score of 10 extends the set past the target with a two-point
/// margin.
fn draw_set_score(gap: f32, rng: &mut impl Rng) -> SetScore {
    let loser_points = if gap < 8.0 {
        rng.gen_range(7..=10)
    } else if gap < 20.0 {
        rng.gen_range(4..=9)
    } else {
        rng.gen_range(0..=7)
    };

    if loser_points == 10 {
        // Deuce set: one more draw decides how far past 11 it runs.
        let extended_loser = 10 + rng.gen_range(0..=4);
        SetScore { winner_points: extended_loser + 2, loser_points: extended_loser }
    } else {
        SetScore { winner_points: SET_TARGET, loser_points }
    }
}

/// Simulate a match and apply its stat deltas to both live player records.
///
/// Panics if both sides are the same player; that is a scheduling bug, not
/// a runtime condition.
pub fn simulate_match(
    player1: &mut Player,
    player2: &mut Player,
    kind: MatchKind,
    season: u32,
    round: u32,
    rng: &mut impl Rng,
) -> Match {
    assert_ne!(player1.id, player2.id, "a player cannot be scheduled against themselves");

    let outcome = MatchOutcome::compute(player1.rating, player2.rating, kind, rng);
    apply_outcome(player1, player2, &outcome);

    let winner_id = match outcome.winner {
        Side::P1 => player1.id,
        Side::P2 => player2.id,
    };

    Match {
        id: MatchId::new(),
        season,
        round,
        division: player1.division,
        kind,
        player1: MatchSide::from_player(player1),
        player2: MatchSide::from_player(player2),
        completed: true,
        winner: Some(winner_id),
        set_winners: outcome.set_winners,
        set_scores: outcome.set_scores,
    }
}

/// Write the outcome's stat deltas into both players: match/set/point
/// counters plus the head-to-head table keyed by opponent id.
fn apply_outcome(player1: &mut Player, player2: &mut Player, outcome: &MatchOutcome) {
    let (sets1, sets2) = outcome.sets_tally();
    let (points1, points2) = outcome.points_tally();

    player1.games_played += 1;
    player2.games_played += 1;
    match outcome.winner {
        Side::P1 => {
            player1.games_won += 1;
            player2.games_lost += 1;
        }
        Side::P2 => {
            player2.games_won += 1;
            player1.games_lost += 1;
        }
    }

    player1.sets_won += sets1 as u32;
    player1.sets_lost += sets2 as u32;
    player2.sets_won += sets2 as u32;
    player2.sets_lost += sets1 as u32;

    player1.points_scored += points1;
    player1.points_conceded += points2;
    player2.points_scored += points2;
    player2.points_conceded += points1;

    update_head_to_head(player1, player2, outcome.winner == Side::P1, sets1, sets2, points1);
    update_head_to_head(player2, player1, outcome.winner == Side::P2, sets2, sets1, points2);
}

fn update_head_to_head(
    player: &mut Player,
    opponent: &Player,
    won: bool,
    sets_won: u8,
    sets_lost: u8,
    points: u32,
) {
    let entry = player.head_to_head.entry(opponent.id).or_insert_with(|| HeadToHeadRecord {
        opponent_name: opponent.name.clone(),
        opponent_nationality: opponent.nationality.clone(),
        ..Default::default()
    });
    if won {
        entry.wins += 1;
    } else {
        entry.losses += 1;
    }
    entry.sets_won += sets_won as u32;
    entry.sets_lost += sets_lost as u32;
    entry.points_scored += points;
}
