//! Player Rating Engine
//!
//! Turns a player's per-match box scores into season averages and a single
//! overall rating between 50 and 100 that depends on the player's position.
//! Everything here is a pure function of its inputs: no I/O, no shared
//! mutable state.

pub mod aggregation;
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod position;
pub mod ranking;

#[cfg(test)]
mod tests;

pub use aggregation::MatchStatAggregator;
pub use calculator::RatingCalculator;
pub use config::{InvalidRecordPolicy, RatingConfig};
pub use engine::{RatingEngine, RosterOutcome};
pub use error::{RatingError, ValidationError};
pub use models::*;
pub use position::{PositionCategory, PositionProfile, PositionWeights};
pub use ranking::{rank_players, rank_positions, rank_trends, sort_players, RankTrend, RankingFilter};

/// Season averages for a set of match records
pub fn aggregate(records: &[MatchRecord]) -> Result<PlayerAverages, RatingError> {
    MatchStatAggregator::new().aggregate(records)
}

/// Overall rating with the default weighting model
pub fn rate(averages: &PlayerAverages, position: Option<&str>) -> u8 {
    RatingCalculator::default().rate(averages, position)
}
