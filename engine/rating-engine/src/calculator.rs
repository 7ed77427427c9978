use tracing::{debug, warn};

use crate::config::RatingConfig;
use crate::models::{PlayerAverages, RatingBreakdown, SubScores};
use crate::position::{PositionProfile, PositionWeights};

/// Totals are snapped to this many steps per point before the final round,
/// so sums like `48.49999999999999` settle on their exact grid value
const SNAP_STEPS_PER_POINT: f64 = 1e6;

/// Position-weighted overall rating calculator
#[derive(Debug, Clone)]
pub struct RatingCalculator {
    config: RatingConfig,
}

impl Default for RatingCalculator {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}

impl RatingCalculator {
    /// Create a new rating calculator
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Overall rating in `[floor, ceiling]` for a player at a position.
    ///
    /// An absent or blank position returns the floor without scoring.
    pub fn rate(&self, averages: &PlayerAverages, position: Option<&str>) -> u8 {
        self.breakdown(averages, position).rating
    }

    /// Full computation detail behind [`RatingCalculator::rate`]
    pub fn breakdown(&self, averages: &PlayerAverages, position: Option<&str>) -> RatingBreakdown {
        let Some(profile) = position.and_then(PositionProfile::resolve) else {
            return RatingBreakdown {
                categories: Vec::new(),
                short_circuited: true,
                sub_scores: SubScores::default(),
                weights: PositionWeights::new(0.0, 0.0, 0.0, 0.0, 0.0),
                weighted_sum: 0.0,
                participation_bonus: 0.0,
                raw_total: 0.0,
                rating: self.config.bounds.floor,
            };
        };

        let sub_scores = self.sub_scores(averages);
        let weights = self.weights_for(&profile);

        let weighted_sum = snap(
            sub_scores.scoring * weights.pts
                + sub_scores.inside * weights.inside
                + sub_scores.outside * weights.outside
                + sub_scores.free_throws * weights.lf
                + sub_scores.discipline * weights.fouls,
        );

        let participation_bonus = self.participation_bonus(averages.games_played);
        let raw_total = snap(weighted_sum + participation_bonus);
        let rating = self.clamp_rating(raw_total);

        debug!(
            "Rated {:?}: sub-scores {:?}, weighted {:.2}, bonus {:.1}, rating {}",
            profile.categories(),
            sub_scores,
            weighted_sum,
            participation_bonus,
            rating
        );

        RatingBreakdown {
            categories: profile.categories().to_vec(),
            short_circuited: false,
            sub_scores,
            weights,
            weighted_sum,
            participation_bonus,
            raw_total,
            rating,
        }
    }

    /// The five sub-scores, each in `[0, 100]`
    pub fn sub_scores(&self, averages: &PlayerAverages) -> SubScores {
        let scales = &self.config.scales;

        let pts = nan_as_zero("pts", averages.pts);
        let threes = nan_as_zero("threes", averages.threes);
        let two_int = nan_as_zero("twoInt", averages.two_int);
        let two_ext = nan_as_zero("twoExt", averages.two_ext);
        let lf = nan_as_zero("lf", averages.lf);
        let fouls = nan_as_zero("fouls", averages.fouls);

        let outside_raw = (threes + two_ext) * scales.outside_multiplier;
        let outside = if outside_raw == 0.0 { scales.outside_zero_floor } else { outside_raw };

        SubScores {
            scoring: to_score(pts * scales.pts_multiplier),
            inside: to_score(two_int * scales.inside_multiplier),
            outside: to_score(outside),
            free_throws: to_score(lf * scales.free_throw_multiplier),
            discipline: to_score(100.0 - fouls * scales.foul_penalty),
        }
    }

    /// Weight vector for a profile: the mean over its categories
    pub fn weights_for(&self, profile: &PositionProfile) -> PositionWeights {
        let vectors: Vec<PositionWeights> = profile
            .categories()
            .iter()
            .map(|category| self.config.weights.for_category(*category))
            .collect();

        PositionWeights::mean(&vectors).unwrap_or(self.config.weights.unknown)
    }

    /// Additive credit for games played, capped
    pub fn participation_bonus(&self, games_played: u32) -> f64 {
        (games_played as f64 * self.config.bonus.per_game).min(self.config.bonus.cap)
    }

    fn clamp_rating(&self, raw_total: f64) -> u8 {
        let floor = self.config.bounds.floor as f64;
        let ceiling = self.config.bounds.ceiling as f64;
        raw_total.round().clamp(floor, ceiling) as u8
    }
}

/// Clamp to `[0, 100]`. Infinite values saturate; `inf * 0` style NaN
/// products score 0.
fn to_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn snap(value: f64) -> f64 {
    (value * SNAP_STEPS_PER_POINT).round() / SNAP_STEPS_PER_POINT
}

fn nan_as_zero(field: &str, value: f64) -> f64 {
    if value.is_nan() {
        warn!("NaN average for {field}, scoring it as 0");
        0.0
    } else {
        value
    }
}
