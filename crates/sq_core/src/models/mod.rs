//! Core data model for the league engine
//!
//! Entities are stored once in the id-indexed registry owned by
//! [`crate::league::LeagueState`]. Matches, standings and archives carry
//! player ids plus display snapshots taken at scheduling time, never live
//! references.

pub mod archive;
pub mod match_result;
pub mod player;
pub mod season;

pub use archive::{CupStanding, CupSummary, SeasonArchive};
pub use match_result::{Match, MatchId, MatchKind, MatchSide, SetScore, Side};
pub use player::{CupResult, Division, HeadToHeadRecord, Player, PlayerId, SeasonRecord};
pub use season::Season;
