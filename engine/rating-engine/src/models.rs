use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{json_type_name, ValidationError};
use crate::position::{PositionCategory, PositionWeights};

/// One played game's box-score contribution.
///
/// Deserializing goes through [`MatchRecord::from_value`], so absent or
/// `null` fields become `0` while non-numeric or negative ones are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct MatchRecord {
    pub points: f64,
    /// Made three-point shots
    pub threes: f64,
    /// Made interior two-point shots
    pub two_int: f64,
    /// Made exterior (mid-range) two-point shots
    pub two_ext: f64,
    /// Made free throws
    pub ft_made: f64,
    pub fouls_committed: f64,
}

impl MatchRecord {
    /// Field names as they appear in match documents
    pub const FIELDS: [&'static str; 6] =
        ["points", "threes", "two_int", "two_ext", "ft_made", "fouls_committed"];

    /// Create a new match record
    pub fn new(
        points: f64,
        threes: f64,
        two_int: f64,
        two_ext: f64,
        ft_made: f64,
        fouls_committed: f64,
    ) -> Self {
        Self { points, threes, two_int, two_ext, ft_made, fouls_committed }
    }

    /// Read a match record from a raw match document
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject { found: json_type_name(value) })?;

        let read = |field: &'static str| -> Result<f64, ValidationError> {
            match object.get(field) {
                None | Some(Value::Null) => Ok(0.0),
                Some(Value::Number(n)) => {
                    let v = n.as_f64().ok_or(ValidationError::NotFinite { field })?;
                    check_stat(field, v)
                }
                Some(other) => {
                    Err(ValidationError::NonNumeric { field, found: json_type_name(other) })
                }
            }
        };

        Ok(Self {
            points: read("points")?,
            threes: read("threes")?,
            two_int: read("two_int")?,
            two_ext: read("two_ext")?,
            ft_made: read("ft_made")?,
            fouls_committed: read("fouls_committed")?,
        })
    }

    /// Check every field is a finite, non-negative count
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in Self::FIELDS.into_iter().zip(self.values()) {
            check_stat(field, value)?;
        }
        Ok(())
    }

    fn values(&self) -> [f64; 6] {
        [self.points, self.threes, self.two_int, self.two_ext, self.ft_made, self.fouls_committed]
    }
}

fn check_stat(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

impl TryFrom<Value> for MatchRecord {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Per-game season averages, each rounded to one decimal place
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAverages {
    pub pts: f64,
    pub threes: f64,
    pub two_int: f64,
    pub two_ext: f64,
    /// Free throws made
    pub lf: f64,
    pub fouls: f64,
    pub games_played: u32,
}

impl PlayerAverages {
    /// Averages of a player with no recorded games
    pub fn zero() -> Self {
        Self::default()
    }
}

/// The five 0-100 intermediate metrics feeding the overall rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub scoring: f64,
    pub inside: f64,
    pub outside: f64,
    pub free_throws: f64,
    pub discipline: f64,
}

/// Everything that went into one rating, for display and auditing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBreakdown {
    /// Canonical categories recognized in the position label
    pub categories: Vec<PositionCategory>,
    /// True when the label was absent or empty and no scoring ran
    pub short_circuited: bool,
    pub sub_scores: SubScores,
    pub weights: PositionWeights,
    pub weighted_sum: f64,
    pub participation_bonus: f64,
    /// `weighted_sum + participation_bonus` before rounding and clamping
    pub raw_total: f64,
    pub rating: u8,
}

/// A player as handed over by the storage layer: identity, stored position
/// label and the raw match documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInput {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub matches: Vec<Value>,
}

/// A rated player as shown on the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub averages: PlayerAverages,
    pub rating: u8,
}

/// Events emitted while processing a roster
#[derive(Debug, Clone, Serialize)]
pub enum RatingEvent {
    /// Player aggregated and rated
    PlayerRated {
        player_id: String,
        rating: u8,
        games_played: u32,
        timestamp: DateTime<Utc>,
    },

    /// A single match document was dropped
    RecordRejected {
        player_id: String,
        record_index: usize,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Player left out of the leaderboard
    PlayerSkipped {
        player_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Batch processing completed
    BatchCompleted {
        processed_count: usize,
        rated_count: usize,
        rejected_records: usize,
        timestamp: DateTime<Utc>,
    },
}
