//! Scoring primitives shared by the component scorers.
//!
//! ## Band tables
//!
//! A [`BandTable`] is an ordered list of inclusive ranges, each with a score
//! and status. The first range containing the value wins, so elite bands are
//! listed first and a shared edge belongs to the better band. Values matched
//! by no range (including NaN and absurd inputs) take the table's floor,
//! which keeps every score inside [0, 100].
//!
//! ## Linear bands
//!
//! A [`LinearBand`] scores 100 inside an elite interval and loses a fixed
//! number of points per unit outside it, with separate rates below and
//! above.

use serde::{Deserialize, Serialize};

/// Inclusive range with its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    pub score: u8,
    pub status: &'static str,
}

impl Band {
    pub const fn new(min: f64, max: f64, score: u8, status: &'static str) -> Self {
        Self {
            min,
            max,
            score,
            status,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Piecewise table of disjoint or asymmetric bands
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub bands: &'static [Band],
    pub floor_score: u8,
    pub floor_status: &'static str,
}

impl BandTable {
    pub fn lookup(&self, value: f64) -> (u8, &'static str) {
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map(|band| (band.score, band.status))
            .unwrap_or((self.floor_score, self.floor_status))
    }
}

/// Elite interval with linear degradation on either side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearBand {
    pub elite_min: f64,
    pub elite_max: f64,
    /// Points lost per unit below `elite_min`
    pub below_rate: f64,
    /// Points lost per unit above `elite_max`
    pub above_rate: f64,
}

impl LinearBand {
    pub const fn new(elite_min: f64, elite_max: f64, below_rate: f64, above_rate: f64) -> Self {
        Self {
            elite_min,
            elite_max,
            below_rate,
            above_rate,
        }
    }

    pub fn score(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        let penalty = if value < self.elite_min {
            (self.elite_min - value) * self.below_rate
        } else if value > self.elite_max {
            (value - self.elite_max) * self.above_rate
        } else {
            0.0
        };
        (100.0 - penalty).clamp(0.0, 100.0)
    }
}

/// Five-level rating of a component score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Elite,
    Good,
    Developing,
    Beginner,
    Critical,
}

impl Category {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Category::Elite,
            80..=89 => Category::Good,
            65..=79 => Category::Developing,
            45..=64 => Category::Beginner,
            _ => Category::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Elite => "Elite",
            Category::Good => "Good",
            Category::Developing => "Developing",
            Category::Beginner => "Beginner",
            Category::Critical => "Critical",
        }
    }
}

/// Physical unit of a raw measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Degrees,
    Inches,
    Seconds,
    MetersPerSecondSquared,
}

pub const NO_DATA: &str = "No data";

/// One named measurement with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub name: String,
    pub score: u8,
    pub status: String,
    /// `None` when the measurement was indeterminate
    pub measurement: Option<f64>,
    pub unit: Unit,
}

impl SubScore {
    /// Score a measurement through `table`; `None` scores 0 as "No data"
    pub fn from_table(name: &str, measurement: Option<f64>, unit: Unit, table: &BandTable) -> Self {
        match measurement {
            Some(value) => {
                let (score, status) = table.lookup(value);
                Self {
                    name: name.to_string(),
                    score,
                    status: status.to_string(),
                    measurement: Some(value),
                    unit,
                }
            }
            None => Self::no_data(name, unit),
        }
    }

    pub fn no_data(name: &str, unit: Unit) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
            status: NO_DATA.to_string(),
            measurement: None,
            unit,
        }
    }

    pub fn has_data(&self) -> bool {
        self.measurement.is_some()
    }
}

/// Comma-separated names of the sub-scores that could not be measured,
/// `None` when every one has a measurement
pub fn missing_measurements(subs: &[&SubScore]) -> Option<String> {
    let missing: Vec<&str> = subs
        .iter()
        .filter(|s| !s.has_data())
        .map(|s| s.name.as_str())
        .collect();
    (!missing.is_empty()).then(|| missing.join(", "))
}

/// Round a weighted sum of sub-scores to an integer in [0, 100]
pub fn weighted_score(parts: &[(u8, f64)]) -> u8 {
    let total: f64 = parts.iter().map(|&(score, weight)| score as f64 * weight).sum();
    total.round().clamp(0.0, 100.0) as u8
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Coaching insight with a stable key for downstream narrative generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub key: String,
    pub message: String,
}

/// Entry of an ordered insight list. The first rule that applies wins.
pub struct InsightRule<C> {
    pub key: &'static str,
    pub applies: fn(&C) -> bool,
    pub message: fn(&C) -> String,
}

/// Evaluate `rules` in order, falling back to `default` when none applies
pub fn select_insight<C>(rules: &[InsightRule<C>], context: &C, default: &InsightRule<C>) -> Insight {
    let rule = rules
        .iter()
        .find(|rule| (rule.applies)(context))
        .unwrap_or(default);

    Insight {
        key: rule.key.to_string(),
        message: (rule.message)(context),
    }
}

/// Aggregate score of one swing component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub overall: u8,
    pub category: Category,
    pub sub_scores: Vec<SubScore>,
    pub insight: Insight,
}

impl ComponentScore {
    pub fn sub_score(&self, name: &str) -> Option<&SubScore> {
        self.sub_scores.iter().find(|s| s.name == name)
    }
}
