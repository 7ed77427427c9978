//! Leaderboard ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::RankedPlayer;

/// Statistic a leaderboard can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum RankingFilter {
    #[default]
    Rating,
    Points,
    Threes,
    TwoInt,
    TwoExt,
    #[serde(rename = "lf")]
    FreeThrows,
    /// Fewest fouls first
    Discipline,
}

impl RankingFilter {
    pub const ALL: [RankingFilter; 7] = [
        RankingFilter::Rating,
        RankingFilter::Points,
        RankingFilter::Threes,
        RankingFilter::TwoInt,
        RankingFilter::TwoExt,
        RankingFilter::FreeThrows,
        RankingFilter::Discipline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingFilter::Rating => "rating",
            RankingFilter::Points => "points",
            RankingFilter::Threes => "threes",
            RankingFilter::TwoInt => "twoInt",
            RankingFilter::TwoExt => "twoExt",
            RankingFilter::FreeThrows => "lf",
            RankingFilter::Discipline => "discipline",
        }
    }

    fn compare(&self, a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
        match self {
            RankingFilter::Rating => b.rating.cmp(&a.rating),
            RankingFilter::Points => b.averages.pts.total_cmp(&a.averages.pts),
            RankingFilter::Threes => b.averages.threes.total_cmp(&a.averages.threes),
            RankingFilter::TwoInt => b.averages.two_int.total_cmp(&a.averages.two_int),
            RankingFilter::TwoExt => b.averages.two_ext.total_cmp(&a.averages.two_ext),
            RankingFilter::FreeThrows => b.averages.lf.total_cmp(&a.averages.lf),
            RankingFilter::Discipline => a.averages.fouls.total_cmp(&b.averages.fouls),
        }
    }
}

impl fmt::Display for RankingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankingFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown ranking filter '{s}'"))
    }
}

/// Leaderboard order: rating, then points per game, then id
pub fn rank_players(players: &[RankedPlayer]) -> Vec<RankedPlayer> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| {
        b.rating
            .cmp(&a.rating)
            .then_with(|| b.averages.pts.total_cmp(&a.averages.pts))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

/// Sort a copy of the players by a single statistic. Stable, so equal
/// values keep their incoming order.
pub fn sort_players(players: &[RankedPlayer], filter: RankingFilter) -> Vec<RankedPlayer> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| filter.compare(a, b));
    sorted
}

/// Movement of a player between two leaderboard snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTrend {
    Up,
    Down,
    Same,
}

/// 1-based rank of every player in an ordered leaderboard. A repeated id
/// keeps the rank of its first occurrence.
pub fn rank_positions(players: &[RankedPlayer]) -> HashMap<String, usize> {
    let mut ranks = HashMap::with_capacity(players.len());
    for (index, player) in players.iter().enumerate() {
        ranks.entry(player.id.clone()).or_insert(index + 1);
    }
    ranks
}

/// Compare an ordered leaderboard with the ranks of the previous snapshot.
/// Players absent from the previous snapshot are `Same`.
pub fn rank_trends(
    players: &[RankedPlayer],
    previous: &HashMap<String, usize>,
) -> HashMap<String, RankTrend> {
    rank_positions(players)
        .into_iter()
        .map(|(id, rank)| {
            let trend = match previous.get(&id) {
                Some(prev) if rank < *prev => RankTrend::Up,
                Some(prev) if rank > *prev => RankTrend::Down,
                _ => RankTrend::Same,
            };
            (id, trend)
        })
        .collect()
}
