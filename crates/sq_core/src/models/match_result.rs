//! Match records
//!
//! A match stores the participants as display snapshots taken at
//! scheduling time plus their ids. The live registry entry is always
//! resolved by id before simulation; the snapshot exists for presentation
//! of historical matches whose participants may have retired since.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::{Division, Player, PlayerId};

/// Unique match identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct MatchId(Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Competition a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    League,
    CupSemifinal,
    CupThirdPlace,
    CupFinal,
}

impl MatchKind {
    pub fn is_cup(self) -> bool {
        !matches!(self, MatchKind::League)
    }
}

/// Which side of a match a set went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Final score of one set. Squash sets run to 11, win by two; extended
/// sets carry the margin past 11 (13-11, 15-13, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub winner_points: u8,
    pub loser_points: u8,
}

/// Display snapshot of one participant, frozen at scheduling time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub player_id: PlayerId,
    pub name: String,
    pub nationality: String,
    pub rating: f32,
}

impl MatchSide {
    pub fn from_player(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            nationality: player.nationality.clone(),
            rating: player.rating,
        }
    }
}

/// One scheduled or completed match. Immutable once `completed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub season: u32,
    pub round: u32,
    pub division: Division,
    pub kind: MatchKind,
    pub player1: MatchSide,
    pub player2: MatchSide,
    pub completed: bool,
    pub winner: Option<PlayerId>,
    /// Set-by-set winners in play order.
    pub set_winners: Vec<Side>,
    /// Point scores aligned with `set_winners`.
    pub set_scores: Vec<SetScore>,
}

impl Match {
    /// Create an unplayed fixture between two players.
    pub fn fixture(
        player1: &Player,
        player2: &Player,
        division: Division,
        kind: MatchKind,
        season: u32,
        round: u32,
    ) -> Self {
        Self {
            id: MatchId::new(),
            season,
            round,
            division,
            kind,
            player1: MatchSide::from_player(player1),
            player2: MatchSide::from_player(player2),
            completed: false,
            winner: None,
            set_winners: Vec::new(),
            set_scores: Vec::new(),
        }
    }

    pub fn side(&self, side: Side) -> &MatchSide {
        match side {
            Side::P1 => &self.player1,
            Side::P2 => &self.player2,
        }
    }

    /// Id of the losing participant, once completed.
    pub fn loser(&self) -> Option<PlayerId> {
        let winner = self.winner?;
        if winner == self.player1.player_id {
            Some(self.player2.player_id)
        } else {
            Some(self.player1.player_id)
        }
    }

    /// Sets won by each side, `(player1, player2)`.
    pub fn sets_tally(&self) -> (u8, u8) {
        let p1 = self.set_winners.iter().filter(|s| **s == Side::P1).count() as u8;
        let p2 = self.set_winners.len() as u8 - p1;
        (p1, p2)
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1.player_id == player || self.player2.player_id == player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fixture_snapshots_both_sides() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = roster::generate_player(Division::One, &mut rng);
        let b = roster::generate_player(Division::One, &mut rng);

        let m = Match::fixture(&a, &b, Division::One, MatchKind::League, 1, 3);

        assert!(!m.completed);
        assert_eq!(m.winner, None);
        assert_eq!(m.player1.player_id, a.id);
        assert_eq!(m.player2.player_id, b.id);
        assert_eq!(m.player1.name, a.name);
        assert_eq!(m.round, 3);
        assert!(m.involves(a.id));
        assert!(m.involves(b.id));
        assert!(!m.involves(PlayerId::new()));
    }

    #[test]
    fn test_sets_tally_and_loser() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = roster::generate_player(Division::Two, &mut rng);
        let b = roster::generate_player(Division::Two, &mut rng);

        let mut m = Match::fixture(&a, &b, Division::Two, MatchKind::League, 1, 1);
        m.set_winners = vec![Side::P1, Side::P2, Side::P1];
        m.completed = true;
        m.winner = Some(a.id);

        assert_eq!(m.sets_tally(), (2, 1));
        assert_eq!(m.loser(), Some(b.id));
    }
}
