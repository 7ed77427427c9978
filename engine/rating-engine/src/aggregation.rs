//! Season averages from per-match records.
//!
//! Every tracked statistic is summed over all records, divided by the
//! record count and rounded to one decimal place, half away from zero.

use serde_json::Value;
use tracing::debug;

use crate::error::{RatingError, ValidationError};
use crate::models::{MatchRecord, PlayerAverages};

/// Round to one decimal place, ties away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reduces match records into [`PlayerAverages`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchStatAggregator;

impl MatchStatAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Average already-typed records. Order does not matter; duplicates
    /// count as separate games.
    pub fn aggregate(&self, records: &[MatchRecord]) -> Result<PlayerAverages, RatingError> {
        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|source| RatingError::InvalidRecord { index, source })?;
        }
        Ok(Self::average(records))
    }

    /// Average raw match documents, failing on the first malformed one
    pub fn aggregate_documents(&self, documents: &[Value]) -> Result<PlayerAverages, RatingError> {
        let records = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                MatchRecord::from_value(doc).map_err(|source| RatingError::InvalidRecord { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::average(&records))
    }

    /// Parse raw match documents, keeping the valid ones and reporting the
    /// rest by index
    pub fn partition_documents(
        &self,
        documents: &[Value],
    ) -> (Vec<MatchRecord>, Vec<(usize, ValidationError)>) {
        let mut records = Vec::with_capacity(documents.len());
        let mut rejected = Vec::new();

        for (index, doc) in documents.iter().enumerate() {
            match MatchRecord::from_value(doc) {
                Ok(record) => records.push(record),
                Err(err) => rejected.push((index, err)),
            }
        }

        (records, rejected)
    }

    fn average(records: &[MatchRecord]) -> PlayerAverages {
        if records.is_empty() {
            return PlayerAverages::zero();
        }

        let total = records.iter().fold(MatchRecord::default(), |acc, m| {
            MatchRecord::new(
                acc.points + m.points,
                acc.threes + m.threes,
                acc.two_int + m.two_int,
                acc.two_ext + m.two_ext,
                acc.ft_made + m.ft_made,
                acc.fouls_committed + m.fouls_committed,
            )
        });

        let n = records.len() as f64;
        let averages = PlayerAverages {
            pts: round_to_tenth(total.points / n),
            threes: round_to_tenth(total.threes / n),
            two_int: round_to_tenth(total.two_int / n),
            two_ext: round_to_tenth(total.two_ext / n),
            lf: round_to_tenth(total.ft_made / n),
            fouls: round_to_tenth(total.fouls_committed / n),
            games_played: u32::try_from(records.len()).unwrap_or(u32::MAX),
        };

        debug!(
            "Aggregated {} games: {:.1} pts, {:.1} 3pt, {:.1} 2int, {:.1} 2ext, {:.1} lf, {:.1} fouls",
            averages.games_played,
            averages.pts,
            averages.threes,
            averages.two_int,
            averages.two_ext,
            averages.lf,
            averages.fouls
        );

        averages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_empty_records_give_zero_averages() {
        let averages = MatchStatAggregator::new().aggregate(&[]).unwrap();
        assert_eq!(averages, PlayerAverages::zero());
        assert_eq!(averages.games_played, 0);
        assert_eq!(averages.pts, 0.0);
    }

    #[test]
    fn test_single_record() {
        let record = MatchRecord::new(20.0, 2.0, 3.0, 1.0, 4.0, 2.0);
        let averages = MatchStatAggregator::new().aggregate(&[record]).unwrap();
        assert_eq!(
            averages,
            PlayerAverages {
                pts: 20.0,
                threes: 2.0,
                two_int: 3.0,
                two_ext: 1.0,
                lf: 4.0,
                fouls: 2.0,
                games_played: 1,
            }
        );
    }

    #[test]
    fn test_means_are_rounded_to_one_decimal() {
        let records = [
            MatchRecord::new(10.0, 1.0, 0.0, 1.0, 2.0, 1.0),
            MatchRecord::new(3.0, 0.0, 2.0, 0.0, 1.0, 0.0),
            MatchRecord::new(4.0, 0.0, 1.0, 0.0, 0.0, 3.0),
        ];
        let averages = MatchStatAggregator::new().aggregate(&records).unwrap();
        // 17 / 3 = 5.666..
        assert_eq!(averages.pts, 5.7);
        // 1 / 3 = 0.333..
        assert_eq!(averages.threes, 0.3);
        assert_eq!(averages.two_int, 1.0);
        assert_eq!(averages.lf, 1.0);
        // 4 / 3 = 1.333..
        assert_eq!(averages.fouls, 1.3);
        assert_eq!(averages.games_played, 3);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(round_to_tenth(2.25), 2.3);
        assert_eq!(round_to_tenth(0.05), 0.1);
        assert_eq!(round_to_tenth(3.5), 3.5);
        assert_eq!(round_to_tenth(0.04), 0.0);

        // 9 points over 4 games = 2.25 per game
        let records = [
            MatchRecord::new(4.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            MatchRecord::new(5.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            MatchRecord::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            MatchRecord::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ];
        let averages = MatchStatAggregator::new().aggregate(&records).unwrap();
        assert_eq!(averages.pts, 2.3);
    }

    #[test]
    fn test_duplicates_count_as_separate_games() {
        let record = MatchRecord::new(8.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let averages = MatchStatAggregator::new().aggregate(&[record, record]).unwrap();
        assert_eq!(averages.games_played, 2);
        assert_eq!(averages.pts, 8.0);
    }

    #[test]
    fn test_documents_with_missing_fields() {
        let docs = vec![json!({ "points": 12 }), json!({ "points": 6, "ft_made": 2, "fouls_committed": null })];
        let averages = MatchStatAggregator::new().aggregate_documents(&docs).unwrap();
        assert_eq!(averages.pts, 9.0);
        assert_eq!(averages.lf, 1.0);
        assert_eq!(averages.fouls, 0.0);
        assert_eq!(averages.games_played, 2);
    }

    #[test]
    fn test_malformed_document_fails_with_index() {
        let docs = vec![json!({ "points": 12 }), json!({ "points": "douze" })];
        let err = MatchStatAggregator::new().aggregate_documents(&docs).unwrap_err();
        match err {
            RatingError::InvalidRecord { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(source, ValidationError::NonNumeric { field: "points", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_typed_record_rejected() {
        let records = [MatchRecord::new(5.0, 0.0, 0.0, 0.0, -1.0, 0.0)];
        let err = MatchStatAggregator::new().aggregate(&records).unwrap_err();
        assert!(matches!(err, RatingError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_partition_documents() {
        let docs = vec![json!({ "points": 10 }), json!("not a match"), json!({ "threes": [1] })];
        let (records, rejected) = MatchStatAggregator::new().partition_documents(&docs);
        assert_eq!(records.len(), 1);
        assert_eq!(rejected.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 2]);
    }

    fn record_strategy() -> impl Strategy<Value = MatchRecord> {
        (0u32..60, 0u32..10, 0u32..15, 0u32..10, 0u32..15, 0u32..6).prop_map(|(p, t, i, e, f, c)| {
            MatchRecord::new(p as f64, t as f64, i as f64, e as f64, f as f64, c as f64)
        })
    }

    proptest! {
        #[test]
        fn each_average_is_rounded_mean(records in prop::collection::vec(record_strategy(), 1..40)) {
            let averages = MatchStatAggregator::new().aggregate(&records).unwrap();
            let n = records.len() as f64;
            let mean = |f: fn(&MatchRecord) -> f64| round_to_tenth(records.iter().map(f).sum::<f64>() / n);

            prop_assert_eq!(averages.games_played as usize, records.len());
            prop_assert_eq!(averages.pts, mean(|m| m.points));
            prop_assert_eq!(averages.threes, mean(|m| m.threes));
            prop_assert_eq!(averages.two_int, mean(|m| m.two_int));
            prop_assert_eq!(averages.two_ext, mean(|m| m.two_ext));
            prop_assert_eq!(averages.lf, mean(|m| m.ft_made));
            prop_assert_eq!(averages.fouls, mean(|m| m.fouls_committed));
        }

        #[test]
        fn record_order_is_irrelevant(mut records in prop::collection::vec(record_strategy(), 1..20)) {
            let aggregator = MatchStatAggregator::new();
            let forward = aggregator.aggregate(&records).unwrap();
            records.reverse();
            let backward = aggregator.aggregate(&records).unwrap();
            prop_assert_eq!(forward, backward);
        }
    }
}
