//! Player entity and career bookkeeping
//!
//! `Player` is the authoritative mutable record for one professional.
//! Season-scoped counters are zeroed by [`Player::reset_season_stats`] at
//! every season boundary; career counters are never reset.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rating ceiling; ratings are clamped here during development.
pub const RATING_CEILING: f32 = 100.0;

/// Rating floor applied to decline, so veterans never drop off the scale.
pub const RATING_FLOOR: f32 = 15.0;

/// Stable unique player identity. Ids are never reused, including for
/// replacement players generated after a retirement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two league divisions. Division 1 is the top flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    One,
    Two,
}

impl Division {
    pub fn number(self) -> u8 {
        match self {
            Division::One => 1,
            Division::Two => 2,
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Division {}", self.number())
    }
}

/// How a player's cup campaign ended in a given season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CupResult {
    Champion,
    RunnerUp,
    ThirdPlace,
    Semifinalist,
    DidNotQualify,
}

impl fmt::Display for CupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CupResult::Champion => "Champion",
            CupResult::RunnerUp => "Runner-Up",
            CupResult::ThirdPlace => "3rd Place",
            CupResult::Semifinalist => "Semifinalist",
            CupResult::DidNotQualify => "Did Not Qualify",
        };
        f.write_str(label)
    }
}

/// One line of a player's career history, written at season close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: u32,
    pub division: Division,
    /// Overall final position: 1-5 for division 1, 6-10 for division 2.
    pub position: u8,
    pub cup_result: CupResult,
    pub end_rating: f32,
    pub league_points: u32,
}

/// Career head-to-head tally against one opponent.
///
/// Opponent display fields are denormalized so presentation never needs a
/// registry lookup for an opponent who has since retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeadToHeadRecord {
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points_scored: u32,
    pub opponent_name: String,
    pub opponent_nationality: String,
}

/// The main player entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Opaque nationality label; the engine never validates it.
    pub nationality: String,
    pub age: u8,
    /// Bounded skill estimate, roughly 0-100. Drives match outcomes.
    pub rating: f32,
    /// Multiplier on rating growth speed, 0.2-1.0.
    pub development_rate: f32,
    /// Age at which growth turns to plateau and decline risk begins.
    pub peak_age: u8,
    /// Seasons before forced retirement.
    pub career_length: u8,
    pub seasons_played: u8,
    pub division: Division,
    pub is_retired: bool,
    pub is_declined: bool,

    // Season-scoped counters, reset every season.
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points_scored: u32,
    pub points_conceded: u32,

    // Career-scoped counters, never reset.
    pub championships_won: u32,
    pub podiums: u32,
    pub cups_won: u32,
    pub cups_played: u32,
    pub career_high_rating: f32,

    pub season_history: Vec<SeasonRecord>,
    pub head_to_head: HashMap<PlayerId, HeadToHeadRecord>,

    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Zero the season-scoped counters at a season boundary.
    pub fn reset_season_stats(&mut self) {
        self.games_played = 0;
        self.games_won = 0;
        self.games_lost = 0;
        self.sets_won = 0;
        self.sets_lost = 0;
        self.points_scored = 0;
        self.points_conceded = 0;
    }

    /// Sets won minus sets lost this season, the second standings key.
    pub fn set_difference(&self) -> i64 {
        self.sets_won as i64 - self.sets_lost as i64
    }

    /// Head-to-head win differential against `opponent`, if any matches
    /// have been played between the pair.
    pub fn head_to_head_differential(&self, opponent: PlayerId) -> Option<i64> {
        self.head_to_head.get(&opponent).map(|h| h.wins as i64 - h.losses as i64)
    }

    pub fn record_high_rating(&mut self) {
        if self.rating > self.career_high_rating {
            self.career_high_rating = self.rating;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> Player {
        Player {
            id: PlayerId::new(),
            name: "Test Player".to_string(),
            nationality: "Norvalla".to_string(),
            age: 20,
            rating: 55.0,
            development_rate: 0.6,
            peak_age: 27,
            career_length: 9,
            seasons_played: 3,
            division: Division::One,
            is_retired: false,
            is_declined: false,
            games_played: 8,
            games_won: 5,
            games_lost: 3,
            sets_won: 12,
            sets_lost: 9,
            points_scored: 180,
            points_conceded: 150,
            championships_won: 1,
            podiums: 2,
            cups_won: 0,
            cups_played: 1,
            career_high_rating: 58.0,
            season_history: Vec::new(),
            head_to_head: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reset_season_stats_keeps_career_counters() {
        let mut player = sample_player();
        player.reset_season_stats();

        assert_eq!(player.games_played, 0);
        assert_eq!(player.sets_won, 0);
        assert_eq!(player.points_conceded, 0);

        // Career state must survive the reset.
        assert_eq!(player.championships_won, 1);
        assert_eq!(player.podiums, 2);
        assert_eq!(player.seasons_played, 3);
        assert!((player.career_high_rating - 58.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_difference() {
        let player = sample_player();
        assert_eq!(player.set_difference(), 3);
    }

    #[test]
    fn test_head_to_head_differential() {
        let mut player = sample_player();
        let rival = PlayerId::new();

        assert_eq!(player.head_to_head_differential(rival), None);

        player.head_to_head.insert(
            rival,
            HeadToHeadRecord { wins: 4, losses: 1, ..Default::default() },
        );
        assert_eq!(player.head_to_head_differential(rival), Some(3));
    }

    #[test]
    fn test_record_high_rating_only_moves_up() {
        let mut player = sample_player();
        player.rating = 40.0;
        player.record_high_rating();
        assert!((player.career_high_rating - 58.0).abs() < f32::EPSILON);

        player.rating = 61.5;
        player.record_high_rating();
        assert!((player.career_high_rating - 61.5).abs() < f32::EPSILON);
    }
}
