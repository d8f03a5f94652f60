//! Read-only JSON views for presentation layers
//!
//! Hosts that render standings or summaries get flat, serializable rows
//! here instead of reaching into engine internals.

use serde::Serialize;

use crate::league::{LeagueState, Phase};
use crate::models::{Division, PlayerId};

#[derive(Serialize, Debug, Clone)]
pub struct StandingsRow {
    pub position: u8,
    pub player_id: PlayerId,
    pub name: String,
    pub nationality: String,
    pub rating: f32,
    pub league_points: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub set_difference: i64,
    pub points_scored: u32,
}

#[derive(Serialize, Debug, Clone)]
pub struct StandingsView {
    pub season: u32,
    pub division: u8,
    pub rows: Vec<StandingsRow>,
}

#[derive(Serialize, Debug, Clone)]
pub struct LeagueSummary {
    pub season: u32,
    pub phase: Phase,
    pub current_round: u32,
    pub max_round: u32,
    pub matches_played: usize,
    pub matches_total: usize,
    pub league_phase_complete: bool,
    pub pending_retirements: usize,
}

/// Current standings of one division as display rows, best first.
pub fn division_standings_view(league: &LeagueState, division: Division) -> StandingsView {
    let order = league.division_standings(division);
    let season = league.current_season();

    let rows = order
        .iter()
        .enumerate()
        .filter_map(|(idx, id)| {
            league.player(*id).map(|p| StandingsRow {
                position: idx as u8 + 1,
                player_id: p.id,
                name: p.name.clone(),
                nationality: p.nationality.clone(),
                rating: p.rating,
                league_points: season.league_points_for(p.id),
                games_won: p.games_won,
                games_lost: p.games_lost,
                set_difference: p.set_difference(),
                points_scored: p.points_scored,
            })
        })
        .collect();

    StandingsView { season: season.number, division: division.number(), rows }
}

/// Both divisions' standings as one JSON document.
pub fn standings_json(league: &LeagueState) -> serde_json::Result<String> {
    let views = [
        division_standings_view(league, Division::One),
        division_standings_view(league, Division::Two),
    ];
    serde_json::to_string_pretty(&views)
}

/// High-level season progress for status displays.
pub fn league_summary(league: &LeagueState) -> LeagueSummary {
    let season = league.current_season();
    LeagueSummary {
        season: season.number,
        phase: league.phase(),
        current_round: season.current_round,
        max_round: season.max_round,
        matches_played: season.current_match_index,
        matches_total: season.matches.len(),
        league_phase_complete: season.league_phase_complete,
        pending_retirements: league.pending_retirements().len(),
    }
}

pub fn league_summary_json(league: &LeagueState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&league_summary(league))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standings_view_covers_whole_division() {
        let league = LeagueState::new(303);
        let view = division_standings_view(&league, Division::One);

        assert_eq!(view.division, 1);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.rows[0].position, 1);
        assert_eq!(view.rows[4].position, 5);
    }

    #[test]
    fn test_standings_json_is_valid() {
        let mut league = LeagueState::new(304);
        for _ in 0..10 {
            league.simulate_next_match().unwrap();
        }

        let json = standings_json(&league).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_summary_tracks_progress() {
        let mut league = LeagueState::new(305);
        let before = league_summary(&league);
        assert_eq!(before.matches_played, 0);
        assert_eq!(before.matches_total, 42);

        league.simulate_next_match().unwrap();
        let after = league_summary(&league);
        assert_eq!(after.matches_played, 1);
    }
}
