//! League orchestration
//!
//! [`LeagueState`] owns the player registry, the current season, the
//! append-only archive list and the retired-player list. All commands are
//! synchronous and must be serialized by the host; the engine has no
//! background execution and no reentrant entry points.
//!
//! Season lifecycle: Scheduling -> InProgress -> Closing -> Transitioning
//! -> Scheduling(next). The only externally gated pause is the
//! retirement acknowledgment between seasons.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::{schedule, sim, standings};
use crate::engine::progression;
use crate::error::{LeagueError, Result};
use crate::models::{
    CupResult, CupStanding, CupSummary, Division, Match, MatchKind, MatchSide, Player, PlayerId,
    Season, SeasonArchive, Side,
};
use crate::roster;

/// Active players at the start of every season.
pub const LEAGUE_SIZE: usize = 10;

/// Where the state machine currently sits. `Scheduling` and `Closing` are
/// transient within a single command; between commands the league is
/// either playing or waiting for retirement acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Scheduling,
    InProgress,
    Closing,
    Transitioning,
}

/// Pairing of a retiree with its generated replacement, surfaced to the
/// host at season close and held until acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementNotice {
    pub retiree: Player,
    pub replacement: Player,
}

/// The league engine: exclusive owner of all mutable simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueState {
    players: Vec<Player>,
    current_season: Season,
    seasons: Vec<Season>,
    archives: Vec<SeasonArchive>,
    retired_players: Vec<Player>,
    pending_retirements: Vec<RetirementNotice>,
    phase: Phase,
    base_seed: u64,
    rng_draws: u64,
}

impl LeagueState {
    /// First-time initialization: generate ten players, divide by rating
    /// descent, schedule season 1.
    pub fn new(base_seed: u64) -> Self {
        let mut state = Self {
            players: Vec::new(),
            current_season: Season::new(0, Vec::new(), Vec::new()),
            seasons: Vec::new(),
            archives: Vec::new(),
            retired_players: Vec::new(),
            pending_retirements: Vec::new(),
            phase: Phase::Scheduling,
            base_seed,
            rng_draws: 0,
        };

        let mut rng = state.command_rng();
        state.players = roster::generate_initial_players(&mut rng);

        // Season 1 divisions follow pure rating order, whatever band each
        // player was generated in.
        let mut by_rating: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();
        by_rating.sort_by(|a, b| {
            let ra = state.player(*a).map(|p| p.rating).unwrap_or(0.0);
            let rb = state.player(*b).map(|p| p.rating).unwrap_or(0.0);
            rb.total_cmp(&ra)
        });
        for (idx, id) in by_rating.iter().enumerate() {
            if let Some(p) = state.players.iter_mut().find(|p| p.id == *id) {
                p.division = if idx < 5 { Division::One } else { Division::Two };
            }
        }

        state
            .schedule_season(1)
            .expect("a fresh 10-player roster always yields a valid schedule");
        info!(seed = base_seed, "league initialized with {} players", state.players.len());
        state
    }

    /// Hard reset: discard all history and start a fresh season 1.
    pub fn reset(&mut self, base_seed: u64) {
        info!("resetting league");
        *self = Self::new(base_seed);
    }

    // ========================
    // Read accessors
    // ========================

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_season(&self) -> &Season {
        &self.current_season
    }

    /// Every completed season with its full match list, oldest first.
    pub fn completed_seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn archives(&self) -> &[SeasonArchive] {
        &self.archives
    }

    pub fn retired_players(&self) -> &[Player] {
        &self.retired_players
    }

    pub fn pending_retirements(&self) -> &[RetirementNotice] {
        &self.pending_retirements
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn division_players(&self, division: Division) -> Vec<&Player> {
        self.players.iter().filter(|p| p.division == division).collect()
    }

    /// Current standings of one division, best first.
    pub fn division_standings(&self, division: Division) -> Vec<PlayerId> {
        let members = self.division_players(division);
        standings::rank(&members, &self.current_season.league_points)
    }

    // ========================
    // Commands
    // ========================

    /// Play the next unplayed match in the authoritative order.
    pub fn simulate_next_match(&mut self) -> Result<Match> {
        if self.current_season.completed {
            return Err(LeagueError::SeasonComplete(self.current_season.number));
        }
        let scheduled = match self.current_season.next_match() {
            Some(m) => m.clone(),
            None => return Err(LeagueError::NoMatchesRemaining(self.current_season.number)),
        };

        // Scheduled sides are snapshots; mutation always goes through the
        // live registry, resolved by id.
        let i = self
            .resolve_player(&scheduled.player1)
            .ok_or(LeagueError::PlayerNotFound(scheduled.player1.player_id))?;
        let j = self
            .resolve_player(&scheduled.player2)
            .ok_or(LeagueError::PlayerNotFound(scheduled.player2.player_id))?;

        let mut rng = self.command_rng();
        let (p1, p2) = two_mut(&mut self.players, i, j);
        let mut played =
            sim::simulate_match(p1, p2, scheduled.kind, scheduled.season, scheduled.round, &mut rng);
        played.id = scheduled.id;
        played.division = scheduled.division;

        let winner = played.winner.unwrap_or(played.player1.player_id);
        if scheduled.kind == MatchKind::League {
            *self.current_season.league_points.entry(winner).or_insert(0) += 1;
        }

        let idx = self.current_season.current_match_index;
        self.current_season.matches[idx] = played.clone();
        self.current_season.current_match_index += 1;
        self.current_season.current_round = scheduled.round;
        self.current_season.league_phase_complete = self.current_season.league_matches_done();

        debug!(
            season = played.season,
            round = played.round,
            kind = ?played.kind,
            winner = %winner,
            "match played"
        );

        if scheduled.kind == MatchKind::CupSemifinal
            && self.current_season.semifinals_complete()
            && !self.current_season.finals_scheduled()
        {
            self.append_cup_finals();
        }

        Ok(played)
    }

    /// Close the season: final standings, archive entry, career
    /// progression, retirements and replacements. Errors if any match is
    /// still unplayed.
    pub fn end_season(&mut self) -> Result<()> {
        let season_number = self.current_season.number;
        if self.current_season.completed {
            return Err(LeagueError::SeasonComplete(season_number));
        }
        let remaining = self.current_season.remaining_matches();
        if remaining > 0 {
            return Err(LeagueError::SeasonNotFinished { season: season_number, remaining });
        }

        self.phase = Phase::Closing;

        let div1_order = self.division_standings(Division::One);
        let div2_order = self.division_standings(Division::Two);
        let cup_summary = self.cup_summary(season_number)?;

        // Overall positions: division 1 takes 1-5, division 2 takes 6-10.
        let mut positions: std::collections::HashMap<PlayerId, u8> = std::collections::HashMap::new();
        for (idx, id) in div1_order.iter().enumerate() {
            positions.insert(*id, idx as u8 + 1);
        }
        for (idx, id) in div2_order.iter().enumerate() {
            positions.insert(*id, idx as u8 + 6);
        }

        let mut rng = self.command_rng();
        for player in &mut self.players {
            let position = positions.get(&player.id).copied().unwrap_or(LEAGUE_SIZE as u8);
            let cup_result = cup_result_for(player.id, &cup_summary, &self.current_season);
            let league_points = self.current_season.league_points_for(player.id);
            progression::close_season_for_player(
                player,
                season_number,
                position,
                cup_result,
                league_points,
                &mut rng,
            );
        }

        // Archive snapshots reflect end-of-season state, retirees included.
        let snapshot = |ids: &[PlayerId]| -> Vec<Player> {
            ids.iter().filter_map(|id| self.player(*id).cloned()).collect()
        };
        let archive = SeasonArchive {
            season: season_number,
            division1_standings: snapshot(&div1_order),
            division2_standings: snapshot(&div2_order),
            cup: cup_summary,
        };
        self.archives.push(archive);

        // Every retiree is replaced 1:1 by a fresh division-2 player.
        let (active, retirees): (Vec<Player>, Vec<Player>) =
            self.players.drain(..).partition(|p| !p.is_retired);
        self.players = active;
        for retiree in retirees {
            let replacement = roster::generate_player(Division::Two, &mut rng);
            info!(
                retiree = %retiree.name,
                seasons = retiree.seasons_played,
                replacement = %replacement.name,
                "player retired"
            );
            self.pending_retirements
                .push(RetirementNotice { retiree: retiree.clone(), replacement: replacement.clone() });
            self.retired_players.push(retiree);
            self.players.push(replacement);
        }

        // Corrective safety net only; the 1:1 replacement above keeps the
        // happy path at exactly ten.
        while self.players.len() < LEAGUE_SIZE {
            warn!("league under-populated, padding with a new division-2 player");
            self.players.push(roster::generate_player(Division::Two, &mut rng));
        }
        if self.players.len() > LEAGUE_SIZE {
            warn!(count = self.players.len(), "league over-populated, truncating");
            self.players.truncate(LEAGUE_SIZE);
        }

        self.current_season.completed = true;
        // Scheduling the next season replaces `current_season`; the full
        // match history survives in the completed-season list.
        self.seasons.push(self.current_season.clone());
        info!(season = season_number, retirements = self.pending_retirements.len(), "season closed");

        if self.pending_retirements.is_empty() {
            self.schedule_season(season_number + 1)?;
        } else {
            self.phase = Phase::Transitioning;
        }
        Ok(())
    }

    /// Release the transition pause after the host has shown the
    /// retirement notices. A no-op when nothing is pending.
    pub fn acknowledge_retirements(&mut self) -> Result<()> {
        self.pending_retirements.clear();
        if self.phase == Phase::Transitioning {
            let next = self.current_season.number + 1;
            self.schedule_season(next)?;
        }
        Ok(())
    }

    // ========================
    // Internals
    // ========================

    /// Derive one seeded RNG per command so a league is deterministic for
    /// a given base seed and replayable after a save/load round-trip.
    fn command_rng(&mut self) -> ChaCha8Rng {
        self.rng_draws = self.rng_draws.wrapping_add(1);
        ChaCha8Rng::seed_from_u64(self.base_seed ^ self.rng_draws.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Resolve a scheduled side to the live registry: by id, falling back
    /// to name+nationality only if the id is gone (which can only follow a
    /// host-side bug, since ids are never reused).
    fn resolve_player(&self, side: &MatchSide) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.id == side.player_id)
            .or_else(|| {
                self.players
                    .iter()
                    .position(|p| p.name == side.name && p.nationality == side.nationality)
            })
    }

    /// Build and install the season: promotion/relegation from the last
    /// archive, division rosters, fixtures, cup seeds, zeroed counters.
    fn schedule_season(&mut self, number: u32) -> Result<()> {
        self.phase = Phase::Scheduling;

        let last_archived = self.archives.last().map(|a| a.season);
        if let Some(season) = last_archived {
            self.apply_promotion_relegation(season);
        }
        self.rebalance_divisions();

        for player in &mut self.players {
            player.reset_season_stats();
        }

        let seed_ids = self.cup_seed_ids();
        if seed_ids.len() != 4 {
            return Err(LeagueError::InvalidCupEntrants(seed_ids.len()));
        }

        let div1: Vec<Player> =
            self.players.iter().filter(|p| p.division == Division::One).cloned().collect();
        let div2: Vec<Player> =
            self.players.iter().filter(|p| p.division == Division::Two).cloned().collect();
        let seeds: Vec<&Player> = seed_ids
            .iter()
            .filter_map(|id| div1.iter().find(|p| p.id == *id))
            .collect();

        self.current_season = schedule::build_season(&div1, &div2, &seeds, number)?;
        self.phase = Phase::InProgress;
        info!(
            season = number,
            matches = self.current_season.matches.len(),
            "season scheduled"
        );
        Ok(())
    }

    /// Division-1's last moves down, division-2's winner moves up, both
    /// identified by the previous archive's ranking and resolved against
    /// the live registry.
    fn apply_promotion_relegation(&mut self, archive_season: u32) {
        let (relegated, promoted) = {
            let archive = match self.archives.last() {
                Some(a) => a,
                None => return,
            };
            (
                archive.relegated().map(|p| (p.id, p.name.clone(), p.nationality.clone())),
                archive.promoted().map(|p| (p.id, p.name.clone(), p.nationality.clone())),
            )
        };

        if let Some((id, name, nationality)) = relegated {
            match self.resolve_by_id_or_display(id, &name, &nationality) {
                Some(idx) => {
                    self.players[idx].division = Division::Two;
                    info!(player = %name, season = archive_season, "relegated to division 2");
                }
                None => debug!(player = %name, "relegated player retired, nothing to move"),
            }
        }
        if let Some((id, name, nationality)) = promoted {
            match self.resolve_by_id_or_display(id, &name, &nationality) {
                Some(idx) => {
                    self.players[idx].division = Division::One;
                    info!(player = %name, season = archive_season, "promoted to division 1");
                }
                None => debug!(player = %name, "promoted player retired, nothing to move"),
            }
        }
    }

    fn resolve_by_id_or_display(&self, id: PlayerId, name: &str, nationality: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id).or_else(|| {
            self.players.iter().position(|p| p.name == name && p.nationality == nationality)
        })
    }

    /// Retirements can leave the divisions unbalanced after the 1:1
    /// division-2 replacements; move the best-rated division-2 players up
    /// (or the worst-rated division-1 players down) until both hold five.
    fn rebalance_divisions(&mut self) {
        loop {
            let div1_count = self.players.iter().filter(|p| p.division == Division::One).count();
            if div1_count == schedule::DIVISION_SIZE {
                break;
            }
            if div1_count < schedule::DIVISION_SIZE {
                let candidate = self
                    .players
                    .iter_mut()
                    .filter(|p| p.division == Division::Two)
                    .max_by(|a, b| a.rating.total_cmp(&b.rating));
                match candidate {
                    Some(p) => {
                        info!(player = %p.name, "filling division 1 vacancy");
                        p.division = Division::One;
                    }
                    None => break,
                }
            } else {
                let candidate = self
                    .players
                    .iter_mut()
                    .filter(|p| p.division == Division::One)
                    .min_by(|a, b| a.rating.total_cmp(&b.rating));
                match candidate {
                    Some(p) => {
                        info!(player = %p.name, "moving surplus player to division 2");
                        p.division = Division::Two;
                    }
                    None => break,
                }
            }
        }
    }

    /// Cup entrants for the next season: the previous archive's division-1
    /// top four resolved against active players, backfilled from current
    /// division-1 rating order; season 1 uses rating order directly.
    fn cup_seed_ids(&self) -> Vec<PlayerId> {
        let mut seeds: Vec<PlayerId> = Vec::with_capacity(4);

        if let Some(archive) = self.archives.last() {
            for archived in archive.division1_standings.iter().take(4) {
                if let Some(idx) =
                    self.resolve_by_id_or_display(archived.id, &archived.name, &archived.nationality)
                {
                    let live = &self.players[idx];
                    if live.division == Division::One && !seeds.contains(&live.id) {
                        seeds.push(live.id);
                    }
                }
            }
        }

        let mut div1: Vec<&Player> = self.division_players(Division::One);
        div1.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        for p in div1 {
            if seeds.len() == 4 {
                break;
            }
            if !seeds.contains(&p.id) {
                seeds.push(p.id);
            }
        }
        seeds
    }

    /// Build and append the 3rd-place match and final after both semis.
    fn append_cup_finals(&mut self) {
        let semis: Vec<&Match> = self
            .current_season
            .matches
            .iter()
            .filter(|m| m.kind == MatchKind::CupSemifinal && m.completed)
            .collect();
        debug_assert_eq!(semis.len(), 2);

        let side_of = |m: &Match, winner: bool| -> MatchSide {
            let winner_side =
                if m.winner == Some(m.player1.player_id) { Side::P1 } else { Side::P2 };
            let side = if winner { winner_side } else { winner_side.other() };
            m.side(side).clone()
        };
        let winners = [side_of(semis[0], true), side_of(semis[1], true)];
        let losers = [side_of(semis[0], false), side_of(semis[1], false)];
        let semi_round = semis[0].round.max(semis[1].round);

        let finals =
            schedule::cup_finals(winners, losers, semi_round, self.current_season.number);
        let new_max = finals.iter().map(|m| m.round).max().unwrap_or(semi_round);
        self.current_season.matches.extend(finals);
        self.current_season.max_round = self.current_season.max_round.max(new_max);
        debug!(season = self.current_season.number, "cup finals scheduled");
    }

    /// Extract the cup placements from the completed bracket.
    fn cup_summary(&self, season_number: u32) -> Result<CupSummary> {
        let final_match = self
            .current_season
            .matches
            .iter()
            .find(|m| m.kind == MatchKind::CupFinal && m.completed)
            .ok_or(LeagueError::CupIncomplete(season_number))?;
        let third_match = self
            .current_season
            .matches
            .iter()
            .find(|m| m.kind == MatchKind::CupThirdPlace && m.completed)
            .ok_or(LeagueError::CupIncomplete(season_number))?;

        let standing = |id: Option<PlayerId>| -> Result<CupStanding> {
            let id = id.ok_or(LeagueError::CupIncomplete(season_number))?;
            let player = self.player(id).ok_or(LeagueError::PlayerNotFound(id))?;
            Ok(CupStanding::from_player(player))
        };

        Ok(CupSummary {
            winner: standing(final_match.winner)?,
            runner_up: standing(final_match.loser())?,
            third: standing(third_match.winner)?,
            fourth: standing(third_match.loser())?,
        })
    }

    // Save/load plumbing lives in `crate::save`; these two keep the
    // serialized shape in one place.

    pub(crate) fn snapshot_parts(&self) -> SnapshotParts<'_> {
        SnapshotParts {
            players: &self.players,
            current_season: &self.current_season,
            seasons: &self.seasons,
            archives: &self.archives,
            retired_players: &self.retired_players,
            pending_retirements: &self.pending_retirements,
            phase: self.phase,
            base_seed: self.base_seed,
            rng_draws: self.rng_draws,
        }
    }

    pub(crate) fn from_snapshot(
        players: Vec<Player>,
        current_season: Season,
        seasons: Vec<Season>,
        archives: Vec<SeasonArchive>,
        retired_players: Vec<Player>,
        pending_retirements: Vec<RetirementNotice>,
        phase: Phase,
        base_seed: u64,
        rng_draws: u64,
    ) -> Self {
        Self {
            players,
            current_season,
            seasons,
            archives,
            retired_players,
            pending_retirements,
            phase,
            base_seed,
            rng_draws,
        }
    }
}

/// Borrowed view of everything a snapshot needs.
pub(crate) struct SnapshotParts<'a> {
    pub players: &'a [Player],
    pub current_season: &'a Season,
    pub seasons: &'a [Season],
    pub archives: &'a [SeasonArchive],
    pub retired_players: &'a [Player],
    pub pending_retirements: &'a [RetirementNotice],
    pub phase: Phase,
    pub base_seed: u64,
    pub rng_draws: u64,
}

/// Disjoint mutable borrows of two registry slots.
fn two_mut(players: &mut [Player], i: usize, j: usize) -> (&mut Player, &mut Player) {
    assert_ne!(i, j, "a match needs two distinct players");
    if i < j {
        let (left, right) = players.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = players.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Cup placement label for one player at season close.
fn cup_result_for(id: PlayerId, summary: &CupSummary, season: &Season) -> CupResult {
    if summary.winner.player_id == id {
        CupResult::Champion
    } else if summary.runner_up.player_id == id {
        CupResult::RunnerUp
    } else if summary.third.player_id == id {
        CupResult::ThirdPlace
    } else if summary.fourth.player_id == id || season.cup_participants.contains(&id) {
        CupResult::Semifinalist
    } else {
        CupResult::DidNotQualify
    }
}
