use thiserror::Error;

use crate::models::PlayerId;

/// Engine-level errors. All of these are precondition or data-integrity
/// violations: they abort the current command and are never used for
/// ordinary game events such as retirements or relegation.
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("division {division} roster has {found} players, expected {expected}")]
    InvalidRosterSize { division: u8, expected: usize, found: usize },

    #[error("cup bracket requires exactly 4 entrants, found {0}")]
    InvalidCupEntrants(usize),

    #[error("player {0} not found in registry")]
    PlayerNotFound(PlayerId),

    #[error("season {0} is already complete")]
    SeasonComplete(u32),

    #[error("season {0} has no unplayed matches left")]
    NoMatchesRemaining(u32),

    #[error("season {season} still has {remaining} unplayed matches")]
    SeasonNotFinished { season: u32, remaining: usize },

    #[error("season {0} cup bracket did not finish")]
    CupIncomplete(u32),
}

pub type Result<T> = std::result::Result<T, LeagueError>;
