use chrono::Utc;
use tracing::{info, warn};

use crate::{
    aggregation::MatchStatAggregator,
    calculator::RatingCalculator,
    config::{InvalidRecordPolicy, RatingConfig},
    error::RatingError,
    models::{PlayerInput, RankedPlayer, RatingEvent},
    ranking::rank_players,
};

/// Result of rating a whole roster
#[derive(Debug, Clone)]
pub struct RosterOutcome {
    /// Rated players in leaderboard order
    pub ranking: Vec<RankedPlayer>,
    pub events: Vec<RatingEvent>,
}

/// Aggregates and rates a roster of players in one pass
#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: RatingConfig,
    aggregator: MatchStatAggregator,
    calculator: RatingCalculator,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Result<Self, RatingError> {
        config.validate()?;

        Ok(Self {
            aggregator: MatchStatAggregator::new(),
            calculator: RatingCalculator::new(config.clone()),
            config,
        })
    }

    pub fn calculator(&self) -> &RatingCalculator {
        &self.calculator
    }

    /// Aggregate and rate a single player, failing on the first malformed
    /// match document
    pub fn rate_player(&self, player: &PlayerInput) -> Result<RankedPlayer, RatingError> {
        let averages = self.aggregator.aggregate_documents(&player.matches)?;
        let rating = self.calculator.rate(&averages, player.position.as_deref());

        Ok(RankedPlayer {
            id: player.id.clone(),
            name: player.name.clone(),
            position: player.position.clone(),
            averages,
            rating,
        })
    }

    /// Rate every player and build the leaderboard. Malformed match
    /// documents are handled per the configured [`InvalidRecordPolicy`];
    /// only `Abort` turns them into an error.
    pub fn process_roster(&self, roster: &[PlayerInput]) -> Result<RosterOutcome, RatingError> {
        info!("Rating roster of {} players", roster.len());

        let policy = self.config.batch.invalid_record_policy;
        let mut rated = Vec::with_capacity(roster.len());
        let mut events = Vec::new();
        let mut rejected_records = 0;

        for player in roster {
            let (records, rejected) = self.aggregator.partition_documents(&player.matches);

            if !rejected.is_empty() {
                rejected_records += rejected.len();

                match policy {
                    InvalidRecordPolicy::Abort => {
                        let (index, source) = rejected[0].clone();
                        return Err(RatingError::PlayerRejected {
                            player_id: player.id.clone(),
                            source: Box::new(RatingError::InvalidRecord { index, source }),
                        });
                    }
                    InvalidRecordPolicy::SkipPlayer => {
                        let (index, source) = &rejected[0];
                        warn!(
                            "Skipping player {}: {} invalid match records (first #{}: {})",
                            player.id,
                            rejected.len(),
                            index,
                            source
                        );
                        events.push(RatingEvent::PlayerSkipped {
                            player_id: player.id.clone(),
                            error: format!("Invalid match record #{index}: {source}"),
                            timestamp: Utc::now(),
                        });
                        continue;
                    }
                    InvalidRecordPolicy::SkipRecord => {
                        for (index, source) in &rejected {
                            warn!("Dropping match record #{} for player {}: {}", index, player.id, source);
                            events.push(RatingEvent::RecordRejected {
                                player_id: player.id.clone(),
                                record_index: *index,
                                error: source.to_string(),
                                timestamp: Utc::now(),
                            });
                        }
                    }
                }
            }

            let averages = self.aggregator.aggregate(&records)?;
            let rating = self.calculator.rate(&averages, player.position.as_deref());

            events.push(RatingEvent::PlayerRated {
                player_id: player.id.clone(),
                rating,
                games_played: averages.games_played,
                timestamp: Utc::now(),
            });

            rated.push(RankedPlayer {
                id: player.id.clone(),
                name: player.name.clone(),
                position: player.position.clone(),
                averages,
                rating,
            });
        }

        let rated_count = rated.len();
        events.push(RatingEvent::BatchCompleted {
            processed_count: roster.len(),
            rated_count,
            rejected_records,
            timestamp: Utc::now(),
        });

        info!(
            "Roster rating complete: {} processed, {} rated, {} records rejected",
            roster.len(),
            rated_count,
            rejected_records
        );

        Ok(RosterOutcome { ranking: rank_players(&rated), events })
    }
}
