//! # sq_core - Deterministic Squash League Simulation Engine
//!
//! A closed ten-player, two-division squash league: double round-robin
//! league play, a four-player cup bracket, career progression with
//! retirement and replacement, promotion and relegation between seasons,
//! and compressed snapshot persistence.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same league history)
//! - Rating-driven probabilistic set outcomes with realistic scorelines
//! - Full season lifecycle: schedule, play, close, transition
//! - Snapshot save/load that resumes mid-season exactly

// Allow unused code for features under development
#![allow(dead_code)]

pub mod api;
pub mod engine;
pub mod error;
pub mod league;
pub mod models;
pub mod roster;
pub mod save;

pub use api::{division_standings_view, league_summary, league_summary_json, standings_json};
pub use error::{LeagueError, Result};
pub use league::{LeagueState, Phase, RetirementNotice};
pub use models::{
    CupResult, CupSummary, Division, Match, MatchKind, Player, PlayerId, Season, SeasonArchive,
};
pub use save::{SaveError, SaveManager};

/// Engine version for snapshot compatibility checks and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
