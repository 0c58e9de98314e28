//! Swing-mechanics quality scoring.
//!
//! Works on scalar summary inputs rather than frames. Three dimensions are
//! blended from piecewise-scored measurements and 0-100 qualitative ratings:
//!
//! | Dimension  | 0.40                  | 0.35               | 0.25                 |
//! |------------|-----------------------|--------------------|----------------------|
//! | Direction  | attack angle          | bat path plane     | connection           |
//! | Timing     | tempo ratio           | sequence quality   | acceleration pattern |
//! | Efficiency | hip-shoulder separation | connection       | balance              |
//!
//! Overall = direction × 0.40 + timing × 0.35 + efficiency × 0.25.

use serde::{Deserialize, Serialize};

use crate::config::MechanicsDefaults;
use crate::scoring::{round1, LinearBand};

/// Attack angle and bat path plane share one shape: elite 5-15°, losing
/// ground faster above the band than below it
pub const PATH_ANGLE_BAND: LinearBand = LinearBand::new(5.0, 15.0, 5.0, 8.0);

/// Load-to-fire tempo, elite 2.3-2.7:1
pub const TEMPO_BAND: LinearBand = LinearBand::new(2.3, 2.7, 80.0, 60.0);

/// Hip-shoulder separation, elite 40-50°
pub const SEPARATION_BAND: LinearBand = LinearBand::new(40.0, 50.0, 3.0, 4.0);

const PRIMARY_WEIGHT: f64 = 0.40;
const SECONDARY_WEIGHT: f64 = 0.35;
const TERTIARY_WEIGHT: f64 = 0.25;

/// Bat-speed range reported around a measured point estimate
const BAT_SPEED_SPREAD_MPH: f64 = 2.5;

/// Summary measurements of one swing.
///
/// Qualitative ratings are 0-100; a missing rating takes its configured
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicsInputs {
    /// Upward angle of the barrel through contact, degrees
    pub attack_angle_deg: f64,
    /// Inclination of the swing plane, degrees
    pub bat_path_plane_deg: f64,
    /// Maximum shoulder-line to hip-line angle, degrees
    pub hip_shoulder_separation_deg: f64,
    /// Load duration over fire duration
    pub tempo_ratio: f64,
    #[serde(default)]
    pub connection_quality: Option<f64>,
    #[serde(default)]
    pub sequence_quality: Option<f64>,
    #[serde(default)]
    pub acceleration_pattern: Option<f64>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub bat_speed_mph: Option<f64>,
}

impl MechanicsInputs {
    pub fn new(
        attack_angle_deg: f64,
        bat_path_plane_deg: f64,
        hip_shoulder_separation_deg: f64,
        tempo_ratio: f64,
    ) -> Self {
        Self {
            attack_angle_deg,
            bat_path_plane_deg,
            hip_shoulder_separation_deg,
            tempo_ratio,
            connection_quality: None,
            sequence_quality: None,
            acceleration_pattern: None,
            balance: None,
            bat_speed_mph: None,
        }
    }
}

/// Qualitative tier of the overall mechanics score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Elite,
    Good,
    Developing,
    Poor,
}

impl QualityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            QualityTier::Elite
        } else if score >= 75.0 {
            QualityTier::Good
        } else if score >= 60.0 {
            QualityTier::Developing
        } else {
            QualityTier::Poor
        }
    }

    /// Typical bat-speed range for the tier
    pub fn bat_speed_range(&self) -> &'static str {
        match self {
            QualityTier::Elite => "75-85 mph",
            QualityTier::Good => "68-75 mph",
            QualityTier::Developing => "60-68 mph",
            QualityTier::Poor => "50-60 mph",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicsFeedback {
    pub direction: String,
    pub timing: String,
    pub efficiency: String,
}

/// Composite mechanics score. All scores are 0-100 at one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingMechanicsQuality {
    pub overall: f64,
    pub direction: f64,
    pub timing: f64,
    pub efficiency: f64,
    pub tier: QualityTier,
    pub predicted_bat_speed: String,
    pub feedback: MechanicsFeedback,
}

/// Scores [`MechanicsInputs`] against configured rating defaults
#[derive(Debug, Clone, Default)]
pub struct MechanicsScorer {
    defaults: MechanicsDefaults,
}

impl MechanicsScorer {
    pub fn new(defaults: MechanicsDefaults) -> Self {
        Self { defaults }
    }

    pub fn score(&self, inputs: &MechanicsInputs) -> SwingMechanicsQuality {
        let connection = rating(inputs.connection_quality, self.defaults.connection_quality);
        let sequence = rating(inputs.sequence_quality, self.defaults.sequence_quality);
        let acceleration = rating(inputs.acceleration_pattern, self.defaults.acceleration_pattern);
        let balance = rating(inputs.balance, self.defaults.balance);

        let direction = blend(
            PATH_ANGLE_BAND.score(inputs.attack_angle_deg),
            PATH_ANGLE_BAND.score(inputs.bat_path_plane_deg),
            connection,
        );
        let timing = blend(TEMPO_BAND.score(inputs.tempo_ratio), sequence, acceleration);
        let efficiency = blend(
            SEPARATION_BAND.score(inputs.hip_shoulder_separation_deg),
            connection,
            balance,
        );
        let overall = bounded(blend(direction, timing, efficiency));
        let tier = QualityTier::from_score(overall);

        let predicted_bat_speed = match inputs.bat_speed_mph {
            Some(mph) if mph.is_finite() && mph > 0.0 => format!(
                "{:.1}-{:.1} mph",
                mph - BAT_SPEED_SPREAD_MPH,
                mph + BAT_SPEED_SPREAD_MPH
            ),
            _ => tier.bat_speed_range().to_string(),
        };

        tracing::debug!(overall, direction, timing, efficiency, ?tier, "Mechanics scored");

        SwingMechanicsQuality {
            overall,
            direction: bounded(direction),
            timing: bounded(timing),
            efficiency: bounded(efficiency),
            tier,
            predicted_bat_speed,
            feedback: MechanicsFeedback {
                direction: direction_feedback(direction, inputs),
                timing: timing_feedback(timing, inputs),
                efficiency: efficiency_feedback(efficiency, inputs),
            },
        }
    }
}

/// Score with default ratings for missing qualitative inputs
pub fn swing_mechanics_quality(inputs: &MechanicsInputs) -> SwingMechanicsQuality {
    MechanicsScorer::default().score(inputs)
}

fn rating(value: Option<f64>, default: f64) -> f64 {
    let value = value.unwrap_or(default);
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn blend(primary: f64, secondary: f64, tertiary: f64) -> f64 {
    primary * PRIMARY_WEIGHT + secondary * SECONDARY_WEIGHT + tertiary * TERTIARY_WEIGHT
}

fn bounded(score: f64) -> f64 {
    round1(score).clamp(0.0, 100.0)
}

fn direction_feedback(score: f64, inputs: &MechanicsInputs) -> String {
    let attack = inputs.attack_angle_deg;
    match QualityTier::from_score(score) {
        QualityTier::Elite => format!(
            "Excellent swing direction. A {attack:.1}° attack angle matches the pitch plane."
        ),
        QualityTier::Good => format!(
            "Solid swing direction. Fine-tune the {attack:.1}° attack angle toward 5-15° for more line drives."
        ),
        QualityTier::Developing => format!(
            "Swing direction needs work. Attack angle {attack:.1}° and path plane {:.1}° drift from the 5-15° window.",
            inputs.bat_path_plane_deg
        ),
        QualityTier::Poor => {
            "Swing direction is a major leak. Rebuild the path so the barrel works slightly upward through the zone."
                .to_string()
        }
    }
}

fn timing_feedback(score: f64, inputs: &MechanicsInputs) -> String {
    let tempo = inputs.tempo_ratio;
    match QualityTier::from_score(score) {
        QualityTier::Elite => format!("Excellent rhythm. A {tempo:.2}:1 tempo loads and fires on time."),
        QualityTier::Good => format!(
            "Good timing. Nudge the {tempo:.2}:1 tempo toward 2.5:1 for a smoother load."
        ),
        QualityTier::Developing => format!(
            "Timing is inconsistent. The {tempo:.2}:1 tempo rushes or drags the load; aim for 2.3-2.7:1."
        ),
        QualityTier::Poor => {
            "Timing breaks down. Work on a controlled load and an explosive, sequenced fire.".to_string()
        }
    }
}

fn efficiency_feedback(score: f64, inputs: &MechanicsInputs) -> String {
    let separation = inputs.hip_shoulder_separation_deg;
    match QualityTier::from_score(score) {
        QualityTier::Elite => format!(
            "Highly efficient. {separation:.0}° of hip-shoulder separation stores and releases energy well."
        ),
        QualityTier::Good => format!(
            "Efficient swing. Building separation from {separation:.0}° toward 40-50° adds easy power."
        ),
        QualityTier::Developing => format!(
            "Energy is leaking. {separation:.0}° of separation and the connection between body and hands need attention."
        ),
        QualityTier::Poor => {
            "Swing is inefficient. Focus on letting the hips lead the shoulders while staying balanced.".to_string()
        }
    }
}
