//! Analysis configuration.
//!
//! Every tunable constant of the engine lives here with its default. The
//! thresholds in `segmentation`, `front_leg` and `weight_transfer` were
//! calibrated against a small set of reference swings and are heuristics,
//! not physical constants.

use serde::{Deserialize, Serialize};
use swing_core::{Calibration, Error, Result, DEFAULT_MIN_CONFIDENCE, DEFAULT_PIXELS_PER_METER};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub kinematics: KinematicsConfig,
    pub segmentation: SegmentationConfig,
    pub front_leg: FrontLegConfig,
    pub weight_transfer: WeightTransferConfig,
    pub mechanics: MechanicsDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    /// Image pixels per real-world meter
    pub pixels_per_meter: f64,

    /// Keypoints at or below this confidence are ignored
    pub min_confidence: f64,

    /// Interval assumed for the first frame (~30 fps)
    pub default_frame_interval_ms: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            default_frame_interval_ms: 33.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Sequence position used as contact when no frame is tagged contact
    pub contact_fallback_fraction: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            contact_fallback_fraction: 0.80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontLegConfig {
    /// Lead ankle speed (m/s) below which the stride foot counts as planted
    pub stop_velocity_threshold: f64,
}

impl Default for FrontLegConfig {
    fn default() -> Self {
        Self {
            stop_velocity_threshold: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTransferConfig {
    /// Rear ankle rise (inches) above its stance baseline that counts as lift
    pub foot_lift_threshold_in: f64,

    /// Lift time assumed when the rear foot never leaves the ground
    pub never_lifted_offset_s: f64,
}

impl Default for WeightTransferConfig {
    fn default() -> Self {
        Self {
            foot_lift_threshold_in: 4.0,
            never_lifted_offset_s: 0.10,
        }
    }
}

/// Fallbacks for qualitative mechanics inputs the caller did not measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanicsDefaults {
    pub connection_quality: f64,
    pub sequence_quality: f64,
    pub acceleration_pattern: f64,
    pub balance: f64,
}

impl Default for MechanicsDefaults {
    fn default() -> Self {
        Self {
            connection_quality: 75.0,
            sequence_quality: 75.0,
            acceleration_pattern: 75.0,
            balance: 75.0,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file, overridden by `SWING__*` variables
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SWING").separator("__"))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("SWING").separator("__"))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    /// Parse an inline TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Calibration::new(self.kinematics.pixels_per_meter)?;

        if !(0.0..=1.0).contains(&self.kinematics.min_confidence) {
            return Err(Error::Config(format!(
                "min_confidence must lie in [0, 1], got {}",
                self.kinematics.min_confidence
            )));
        }
        if self.kinematics.default_frame_interval_ms <= 0.0 {
            return Err(Error::Config(
                "default_frame_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.segmentation.contact_fallback_fraction) {
            return Err(Error::Config(format!(
                "contact_fallback_fraction must lie in [0, 1], got {}",
                self.segmentation.contact_fallback_fraction
            )));
        }
        if self.front_leg.stop_velocity_threshold <= 0.0 {
            return Err(Error::Config(
                "stop_velocity_threshold must be positive".to_string(),
            ));
        }
        if self.weight_transfer.foot_lift_threshold_in <= 0.0 {
            return Err(Error::Config(
                "foot_lift_threshold_in must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Calibration derived from `kinematics.pixels_per_meter`
    pub fn calibration(&self) -> Result<Calibration> {
        Calibration::new(self.kinematics.pixels_per_meter)
    }
}

fn config_error(e: config::ConfigError) -> Error {
    Error::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.kinematics.pixels_per_meter, 100.0);
        assert_eq!(config.kinematics.min_confidence, 0.5);
        assert_eq!(config.segmentation.contact_fallback_fraction, 0.8);
        assert_eq!(config.mechanics.balance, 75.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [kinematics]
            pixels_per_meter = 250.0

            [weight_transfer]
            foot_lift_threshold_in = 3.5
            "#,
        )
        .unwrap();

        assert_eq!(config.kinematics.pixels_per_meter, 250.0);
        assert_eq!(config.kinematics.min_confidence, 0.5);
        assert_eq!(config.weight_transfer.foot_lift_threshold_in, 3.5);
        assert_eq!(config.weight_transfer.never_lifted_offset_s, 0.10);
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let result = AnalysisConfig::from_toml_str(
            r#"
            [kinematics]
            pixels_per_meter = 0.0
            "#,
        );
        assert!(matches!(result, Err(Error::Calibration(_))));
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let mut config = AnalysisConfig::default();
        config.segmentation.contact_fallback_fraction = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
