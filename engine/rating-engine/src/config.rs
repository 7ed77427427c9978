use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::RatingError;
use crate::position::{PositionCategory, PositionWeights};

/// Weight vectors must sum to 1.0 within this tolerance
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Configuration for the rating engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RatingConfig {
    /// Sub-score scaling parameters
    pub scales: SubScoreScales,

    /// Position-specific weight vectors
    pub weights: WeightTable,

    /// Participation bonus
    pub bonus: BonusConfig,

    /// Final rating bounds
    pub bounds: RatingBounds,

    /// Roster batch processing
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreScales {
    /// Scoring sub-score per point of average (10 pts/game => 100)
    pub pts_multiplier: f64,

    /// Inside sub-score per interior make
    pub inside_multiplier: f64,

    /// Outside sub-score per combined three/exterior-two make
    pub outside_multiplier: f64,

    /// Outside sub-score used when the player has no outside makes at all.
    /// Product heuristic, safe to tune.
    pub outside_zero_floor: f64,

    /// Free-throw sub-score per made free throw
    pub free_throw_multiplier: f64,

    /// Discipline points lost per foul
    pub foul_penalty: f64,
}

impl Default for SubScoreScales {
    fn default() -> Self {
        Self {
            pts_multiplier: 10.0,
            inside_multiplier: 30.0,
            outside_multiplier: 50.0,
            outside_zero_floor: 20.0,
            free_throw_multiplier: 40.0,
            foul_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub point_guard: PositionWeights,
    pub shooting_guard: PositionWeights,
    pub wing: PositionWeights,
    pub center: PositionWeights,
    /// Neutral profile for unrecognized labels
    pub unknown: PositionWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            point_guard: PositionWeights::new(0.30, 0.10, 0.40, 0.10, 0.10),
            shooting_guard: PositionWeights::new(0.40, 0.10, 0.35, 0.10, 0.05),
            wing: PositionWeights::new(0.35, 0.20, 0.25, 0.10, 0.10),
            center: PositionWeights::new(0.20, 0.50, 0.05, 0.15, 0.10),
            unknown: PositionWeights::new(0.35, 0.25, 0.20, 0.10, 0.10),
        }
    }
}

impl WeightTable {
    /// Weight vector for a canonical category
    pub fn for_category(&self, category: PositionCategory) -> PositionWeights {
        match category {
            PositionCategory::PointGuard => self.point_guard,
            PositionCategory::ShootingGuard => self.shooting_guard,
            PositionCategory::Wing => self.wing,
            PositionCategory::Center => self.center,
            PositionCategory::Unknown => self.unknown,
        }
    }

    fn entries(&self) -> [(PositionCategory, PositionWeights); 5] {
        [
            (PositionCategory::PointGuard, self.point_guard),
            (PositionCategory::ShootingGuard, self.shooting_guard),
            (PositionCategory::Wing, self.wing),
            (PositionCategory::Center, self.center),
            (PositionCategory::Unknown, self.unknown),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// Rating points per game played
    pub per_game: f64,

    /// Maximum participation bonus
    pub cap: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self { per_game: 2.0, cap: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingBounds {
    /// Minimum rating, also returned when no position is set
    pub floor: u8,

    /// Maximum rating
    pub ceiling: u8,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self { floor: 50, ceiling: 100 }
    }
}

/// What the batch engine does with a match document that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InvalidRecordPolicy {
    /// Drop the record and rate the player on the remaining ones
    #[default]
    SkipRecord,
    /// Leave the player out of the leaderboard
    SkipPlayer,
    /// Stop the batch with an error
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    pub invalid_record_policy: InvalidRecordPolicy,
}

impl RatingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(floor) = env_parse("RATING_OUTSIDE_ZERO_FLOOR")? {
            config.scales.outside_zero_floor = floor;
        }

        if let Some(per_game) = env_parse("RATING_BONUS_PER_GAME")? {
            config.bonus.per_game = per_game;
        }

        if let Some(cap) = env_parse("RATING_BONUS_CAP")? {
            config.bonus.cap = cap;
        }

        if let Some(floor) = env_parse("RATING_FLOOR")? {
            config.bounds.floor = floor;
        }

        if let Some(ceiling) = env_parse("RATING_CEILING")? {
            config.bounds.ceiling = ceiling;
        }

        if let Ok(policy) = std::env::var("RATING_INVALID_RECORD_POLICY") {
            config.batch.invalid_record_policy = match policy.as_str() {
                "skip-record" => InvalidRecordPolicy::SkipRecord,
                "skip-player" => InvalidRecordPolicy::SkipPlayer,
                "abort" => InvalidRecordPolicy::Abort,
                other => anyhow::bail!("Unknown RATING_INVALID_RECORD_POLICY '{other}'"),
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RatingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Layered load: defaults, then the optional TOML file, then
    /// `RATING__<SECTION>__<KEY>` environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).format(::config::FileFormat::Toml));
        }

        let config: RatingConfig = builder
            .add_source(::config::Environment::with_prefix("RATING").prefix_separator("__").separator("__"))
            .build()
            .context("Failed to assemble rating configuration")?
            .try_deserialize()
            .context("Failed to deserialize rating configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check weights, scales and bounds are usable
    pub fn validate(&self) -> Result<(), RatingError> {
        for (category, weights) in self.weights.entries() {
            if !weights.is_non_negative() {
                return Err(RatingError::Config(format!(
                    "{category} weights must be finite and non-negative"
                )));
            }
            if (weights.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(RatingError::Config(format!(
                    "{category} weights must sum to 1.0, got {:.4}",
                    weights.sum()
                )));
            }
        }

        let scales = [
            ("pts_multiplier", self.scales.pts_multiplier),
            ("inside_multiplier", self.scales.inside_multiplier),
            ("outside_multiplier", self.scales.outside_multiplier),
            ("outside_zero_floor", self.scales.outside_zero_floor),
            ("free_throw_multiplier", self.scales.free_throw_multiplier),
            ("foul_penalty", self.scales.foul_penalty),
            ("bonus.per_game", self.bonus.per_game),
            ("bonus.cap", self.bonus.cap),
        ];
        for (name, value) in scales {
            if !value.is_finite() || value < 0.0 {
                return Err(RatingError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.bounds.ceiling > 100 {
            return Err(RatingError::Config(format!(
                "ceiling must be <= 100, got {}",
                self.bounds.ceiling
            )));
        }
        if self.bounds.floor > self.bounds.ceiling {
            return Err(RatingError::Config(format!(
                "floor ({}) must not exceed ceiling ({})",
                self.bounds.floor, self.bounds.ceiling
            )));
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw.parse::<T>().with_context(|| format!("Invalid value for {key}: '{raw}'"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}
