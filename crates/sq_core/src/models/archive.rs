//! Immutable end-of-season snapshots
//!
//! The archive is taken at season close and never mutated afterwards. The
//! next season's promotion/relegation and cup seeding read the archive, not
//! the live registry, so later retirements cannot skew them.

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerId};

/// One cup placing, with display fields frozen at season close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupStanding {
    pub player_id: PlayerId,
    pub name: String,
    pub nationality: String,
}

impl CupStanding {
    pub fn from_player(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            nationality: player.nationality.clone(),
        }
    }
}

/// Final cup bracket outcome for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupSummary {
    pub winner: CupStanding,
    pub runner_up: CupStanding,
    pub third: CupStanding,
    pub fourth: CupStanding,
}

/// Snapshot of a completed season. Standings hold full player copies, not
/// live references; they reflect each player's state at season close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonArchive {
    pub season: u32,
    /// Division 1 final standings, best first.
    pub division1_standings: Vec<Player>,
    /// Division 2 final standings, best first.
    pub division2_standings: Vec<Player>,
    pub cup: CupSummary,
}

impl SeasonArchive {
    /// Division-1 top four at season close, the next season's cup seeds.
    pub fn cup_seeds(&self) -> Vec<PlayerId> {
        self.division1_standings.iter().take(4).map(|p| p.id).collect()
    }

    /// The relegated player (last of division 1), by archive ranking.
    pub fn relegated(&self) -> Option<&Player> {
        self.division1_standings.last()
    }

    /// The promoted player (winner of division 2), by archive ranking.
    pub fn promoted(&self) -> Option<&Player> {
        self.division2_standings.first()
    }
}
