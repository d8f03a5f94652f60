//! Standings calculation
//!
//! One canonical comparator chain, each key consulted only when the
//! previous key ties exactly:
//!
//! 1. league points (1 per league win), descending
//! 2. set difference, descending
//! 3. total points scored, descending
//! 4. head-to-head win differential between the two tied players
//! 5. current rating, descending
//! 6. player id, as a final deterministic fallback
//!
//! Historical variants of this table (win-percentage-first,
//! games-won-first) are intentionally not implemented.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Player, PlayerId};

/// Rank the players of one division, best first. The input order does not
/// affect the result; ranking an unchanged division twice yields the same
/// order.
pub fn rank(players: &[&Player], league_points: &HashMap<PlayerId, u32>) -> Vec<PlayerId> {
    let mut ordered: Vec<&Player> = players.to_vec();
    ordered.sort_by(|a, b| compare(a, b, league_points));
    ordered.iter().map(|p| p.id).collect()
}

/// The canonical comparator. `Ordering::Less` means `a` ranks higher.
pub fn compare(a: &Player, b: &Player, league_points: &HashMap<PlayerId, u32>) -> Ordering {
    let points = |p: &Player| league_points.get(&p.id).copied().unwrap_or(0);

    points(b)
        .cmp(&points(a))
        .then_with(|| b.set_difference().cmp(&a.set_difference()))
        .then_with(|| b.points_scored.cmp(&a.points_scored))
        .then_with(|| head_to_head_ordering(a, b))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pairwise head-to-head key: positive differential ranks higher. Falls
/// through when the pair has never met or is level. The differential is
/// read from one fixed side of the pair so the comparison is symmetric
/// even if the two tables ever disagree.
fn head_to_head_ordering(a: &Player, b: &Player) -> Ordering {
    let (first, second, flip) = if a.id < b.id { (a, b, false) } else { (b, a, true) };

    let diff = first
        .head_to_head_differential(second.id)
        .or_else(|| second.head_to_head_differential(first.id).map(|d| -d))
        .unwrap_or(0);

    let ord = match diff {
        d if d > 0 => Ordering::Less,    // `first` ranks higher
        d if d < 0 => Ordering::Greater, // `second` ranks higher
        _ => Ordering::Equal,
    };

    if flip {
        ord.reverse()
    } else {
        ord
    }
}
