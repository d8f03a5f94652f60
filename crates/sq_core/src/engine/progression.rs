//! End-of-season career progression
//!
//! Runs once per active player after standings are finalized: aging,
//! rating development or decline, cup bookkeeping, the season history
//! record, and the retirement check. Retirement is career-length-only;
//! rating never feeds into it, so a declined veteran is not penalized
//! twice.

use rand::Rng;

use crate::models::player::{RATING_CEILING, RATING_FLOOR};
use crate::models::{CupResult, Player, SeasonRecord};

/// Seasons played before decline rolls begin.
const DECLINE_ONSET_SEASONS: u8 = 7;

/// Base probability of the first decline roll; each further season adds
/// [`DECLINE_CHANCE_STEP`].
const DECLINE_CHANCE_BASE: f64 = 0.3;
const DECLINE_CHANCE_STEP: f64 = 0.2;

/// Growth multiplier before and after peak age.
const PRE_PEAK_FACTOR: f32 = 1.0;
const POST_PEAK_FACTOR: f32 = 0.4;

/// Close the season for one player: mutates age, rating, career counters
/// and history in place.
pub fn close_season_for_player(
    player: &mut Player,
    season: u32,
    position: u8,
    cup_result: CupResult,
    league_points: u32,
    rng: &mut impl Rng,
) {
    player.seasons_played += 1;
    player.age += 1;

    develop(player, rng);

    if cup_result != CupResult::DidNotQualify {
        player.cups_played += 1;
        if cup_result == CupResult::Champion {
            player.cups_won += 1;
        }
    }

    player.season_history.push(SeasonRecord {
        season,
        division: player.division,
        position,
        cup_result,
        end_rating: player.rating,
        league_points,
    });

    if position == 1 {
        player.championships_won += 1;
    }
    if position <= 3 {
        player.podiums += 1;
    }

    if player.seasons_played >= player.career_length {
        player.is_retired = true;
    }
}

/// Apply one season of rating development: a decline roll for veterans at
/// or past their peak, otherwise growth scaled by development rate and
/// damped as the rating climbs past 50.
fn develop(player: &mut Player, rng: &mut impl Rng) {
    if player.age >= player.peak_age && player.seasons_played >= DECLINE_ONSET_SEASONS {
        let seasons_past = (player.seasons_played - DECLINE_ONSET_SEASONS) as f64;
        let chance = (DECLINE_CHANCE_BASE + DECLINE_CHANCE_STEP * seasons_past).min(1.0);
        if rng.gen_bool(chance) {
            player.is_declined = true;
            let drop = rng.gen_range(1.0..=2.5f32);
            player.rating = (player.rating - drop).max(RATING_FLOOR);
            return;
        }
    }

    let base = rng.gen_range(1.0..=2.5f32);
    let phase = if player.age < player.peak_age { PRE_PEAK_FACTOR } else { POST_PEAK_FACTOR };
    let diminishing = (1.0 - (player.rating - 50.0) / 100.0).max(0.1);
    let growth = base * phase * player.development_rate * diminishing;

    player.rating = (player.rating + growth).min(RATING_CEILING);
    player.record_high_rating();
}
