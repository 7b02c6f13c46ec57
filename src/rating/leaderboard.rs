//! Leaderboard ordering

use crate::rating::state::RatingState;
use crate::types::LeaderboardEntry;
use std::cmp::Ordering;

/// Leaderboard order: rating descending, then competitor id ascending
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.competitor.cmp(&b.competitor))
}

/// Sort entries in place into leaderboard order
pub fn sort_leaderboard(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(compare_entries);
}

/// Build the leaderboard from the final rating table
pub fn build_leaderboard(state: &RatingState) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = state
        .iter()
        .map(|(competitor, rating)| LeaderboardEntry {
            competitor: competitor.to_string(),
            rating,
        })
        .collect();

    sort_leaderboard(&mut entries);
    entries
}

/// 1-based rank of a competitor in an ordered leaderboard
pub fn rank_of(leaderboard: &[LeaderboardEntry], competitor: &str) -> Option<usize> {
    leaderboard
        .iter()
        .position(|entry| entry.competitor == competitor)
        .map(|position| position + 1)
}
