//! Season state
//!
//! A season owns its ordered match list, the cursor into it, and the
//! league-points accumulator. The match order produced by the scheduler is
//! the authoritative play order; `current_match_index` only moves forward.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::match_result::{Match, MatchKind};
use super::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// Monotonically increasing, starting at 1.
    pub number: u32,
    pub matches: Vec<Match>,
    /// Index of the next unplayed match.
    pub current_match_index: usize,
    pub current_round: u32,
    pub max_round: u32,
    /// The four cup entrants, seeded in rank order.
    pub cup_participants: Vec<PlayerId>,
    /// One league point per league win.
    pub league_points: HashMap<PlayerId, u32>,
    pub league_phase_complete: bool,
    pub completed: bool,
}

impl Season {
    pub fn new(number: u32, matches: Vec<Match>, cup_participants: Vec<PlayerId>) -> Self {
        let max_round = matches.iter().map(|m| m.round).max().unwrap_or(0);
        let league_points =
            matches.iter().flat_map(|m| [m.player1.player_id, m.player2.player_id]).map(|id| (id, 0)).collect();
        Self {
            number,
            matches,
            current_match_index: 0,
            current_round: 0,
            max_round,
            cup_participants,
            league_points,
            league_phase_complete: false,
            completed: false,
        }
    }

    pub fn next_match(&self) -> Option<&Match> {
        self.matches.get(self.current_match_index)
    }

    pub fn remaining_matches(&self) -> usize {
        self.matches.len().saturating_sub(self.current_match_index)
    }

    pub fn league_points_for(&self, player: PlayerId) -> u32 {
        self.league_points.get(&player).copied().unwrap_or(0)
    }

    /// True once every league-kind match has been played.
    pub fn league_matches_done(&self) -> bool {
        self.matches.iter().filter(|m| m.kind == MatchKind::League).all(|m| m.completed)
    }

    /// Both semifinals played, so the finals can be generated.
    pub fn semifinals_complete(&self) -> bool {
        let semis: Vec<_> =
            self.matches.iter().filter(|m| m.kind == MatchKind::CupSemifinal).collect();
        semis.len() == 2 && semis.iter().all(|m| m.completed)
    }

    /// True if the finals pair (3rd place + final) has already been added.
    pub fn finals_scheduled(&self) -> bool {
        self.matches.iter().any(|m| m.kind == MatchKind::CupFinal)
    }

    pub fn completed_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Division, Match};
    use crate::roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_player_season() -> (Season, PlayerId, PlayerId) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = roster::generate_player(Division::One, &mut rng);
        let b = roster::generate_player(Division::One, &mut rng);
        let matches = vec![
            Match::fixture(&a, &b, Division::One, MatchKind::League, 1, 1),
            Match::fixture(&b, &a, Division::One, MatchKind::League, 1, 2),
        ];
        (Season::new(1, matches, Vec::new()), a.id, b.id)
    }

    #[test]
    fn test_new_season_initializes_points_to_zero() {
        let (season, a, b) = two_player_season();

        assert_eq!(season.league_points_for(a), 0);
        assert_eq!(season.league_points_for(b), 0);
        assert_eq!(season.current_match_index, 0);
        assert_eq!(season.max_round, 2);
        assert!(!season.completed);
    }

    #[test]
    fn test_league_matches_done_tracks_completion() {
        let (mut season, a, _) = two_player_season();
        assert!(!season.league_matches_done());

        for m in &mut season.matches {
            m.completed = true;
            m.winner = Some(a);
        }
        assert!(season.league_matches_done());
    }

    #[test]
    fn test_semifinals_complete_requires_both() {
        let (mut season, a, _) = two_player_season();
        for m in &mut season.matches {
            m.kind = MatchKind::CupSemifinal;
        }
        assert!(!season.semifinals_complete());

        season.matches[0].completed = true;
        season.matches[0].winner = Some(a);
        assert!(!season.semifinals_complete());

        season.matches[1].completed = true;
        season.matches[1].winner = Some(a);
        assert!(season.semifinals_complete());
    }
}
