//! Position labels and their canonical categories.
//!
//! Stored labels are free text ("Meneur", "PG", "Ailier-Fort", "Arrière").
//! They are folded to a bare lowercase ASCII key and looked up in a fixed
//! alias table. Unrecognized labels map to [`PositionCategory::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical position category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionCategory {
    PointGuard,
    ShootingGuard,
    /// Small and power forwards
    Wing,
    Center,
    Unknown,
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PositionCategory::PointGuard => "POINT_GUARD",
            PositionCategory::ShootingGuard => "SHOOTING_GUARD",
            PositionCategory::Wing => "WING",
            PositionCategory::Center => "CENTER",
            PositionCategory::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Folded label -> category
const ALIASES: &[(&str, PositionCategory)] = &[
    ("men", PositionCategory::PointGuard),
    ("meneur", PositionCategory::PointGuard),
    ("m", PositionCategory::PointGuard),
    ("pg", PositionCategory::PointGuard),
    ("pointguard", PositionCategory::PointGuard),
    ("arr", PositionCategory::ShootingGuard),
    ("arriere", PositionCategory::ShootingGuard),
    ("ar", PositionCategory::ShootingGuard),
    ("sg", PositionCategory::ShootingGuard),
    ("shootingguard", PositionCategory::ShootingGuard),
    ("ail", PositionCategory::Wing),
    ("ailier", PositionCategory::Wing),
    ("sf", PositionCategory::Wing),
    ("af", PositionCategory::Wing),
    ("ailierfort", PositionCategory::Wing),
    ("pf", PositionCategory::Wing),
    ("smallforward", PositionCategory::Wing),
    ("powerforward", PositionCategory::Wing),
    ("forward", PositionCategory::Wing),
    ("piv", PositionCategory::Center),
    ("pivot", PositionCategory::Center),
    ("c", PositionCategory::Center),
    ("center", PositionCategory::Center),
    ("centre", PositionCategory::Center),
];

/// Characters that separate several labels in one stored value
const LABEL_SEPARATORS: &[char] = &[',', '/', ';', '+'];

/// Fold a label to its lookup key: accents stripped, lowercase, no
/// whitespace or hyphens.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(strip_diacritic)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a single label to its category. Never fails.
pub fn categorize(label: &str) -> PositionCategory {
    lookup(&normalize_label(label)).unwrap_or(PositionCategory::Unknown)
}

fn lookup(key: &str) -> Option<PositionCategory> {
    ALIASES.iter().find(|(alias, _)| *alias == key).map(|(_, category)| *category)
}

/// Base letter for the accented Latin letters found in position labels.
///
/// Only single letters from Latin-1 Supplement and Latin Extended-A are
/// folded. Ligatures and letters without a one-char base (`œ`, `æ`, `ß`)
/// pass through unchanged.
fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        other => other,
    }
}

/// Categories resolved from a stored position value.
///
/// A value may carry several labels ("Ailier, Pivot"). Each label is
/// categorized on its own; the distinct recognized categories are kept in
/// the order they appear. When nothing is recognized the profile is
/// `[Unknown]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionProfile {
    categories: Vec<PositionCategory>,
}

impl PositionProfile {
    /// Resolve a stored position value. `None` when the value is blank.
    pub fn resolve(position: &str) -> Option<Self> {
        let mut labels = position
            .split(LABEL_SEPARATORS)
            .map(normalize_label)
            .filter(|key| !key.is_empty())
            .peekable();

        labels.peek()?;

        let mut categories = Vec::new();
        for key in labels {
            if let Some(category) = lookup(&key) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }

        if categories.is_empty() {
            categories.push(PositionCategory::Unknown);
        }

        Some(Self { categories })
    }

    pub fn categories(&self) -> &[PositionCategory] {
        &self.categories
    }

    /// The single category when the value named exactly one
    pub fn primary(&self) -> PositionCategory {
        self.categories[0]
    }

    pub fn is_blended(&self) -> bool {
        self.categories.len() > 1
    }
}

/// Share of each sub-score in the overall rating. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionWeights {
    pub pts: f64,
    pub inside: f64,
    pub outside: f64,
    pub lf: f64,
    pub fouls: f64,
}

impl PositionWeights {
    pub const fn new(pts: f64, inside: f64, outside: f64, lf: f64, fouls: f64) -> Self {
        Self { pts, inside, outside, lf, fouls }
    }

    pub fn sum(&self) -> f64 {
        self.pts + self.inside + self.outside + self.lf + self.fouls
    }

    fn components(&self) -> [f64; 5] {
        [self.pts, self.inside, self.outside, self.lf, self.fouls]
    }

    pub fn is_non_negative(&self) -> bool {
        self.components().iter().all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Component-wise mean. `None` for an empty slice.
    pub fn mean(weights: &[PositionWeights]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }
        let n = weights.len() as f64;
        let total = weights.iter().fold(Self::new(0.0, 0.0, 0.0, 0.0, 0.0), |acc, w| {
            Self::new(
                acc.pts + w.pts,
                acc.inside + w.inside,
                acc.outside + w.outside,
                acc.lf + w.lf,
                acc.fouls + w.fouls,
            )
        });
        Some(Self::new(total.pts / n, total.inside / n, total.outside / n, total.lf / n, total.fouls / n))
    }
}
