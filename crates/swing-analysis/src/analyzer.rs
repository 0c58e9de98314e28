//! Complete swing analyzer orchestrating all analysis components.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use swing_core::{FrameRecord, PoseSequence, Result};

use crate::config::AnalysisConfig;
use crate::front_leg::FrontLegScorer;
use crate::mechanics::{MechanicsInputs, MechanicsScorer, SwingMechanicsQuality};
use crate::pipeline::FrameProcessor;
use crate::scoring::ComponentScore;
use crate::summary::{summarize_with, RunSummary};
use crate::weight_transfer::WeightTransferScorer;

/// Everything produced by one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingReport {
    pub frames: Vec<FrameRecord>,
    pub summary: RunSummary,
    pub front_leg: Option<ComponentScore>,
    pub weight_transfer: Option<ComponentScore>,
    /// Inputs the mechanics score was computed from, supplied or estimated
    pub mechanics_inputs: Option<MechanicsInputs>,
    pub mechanics: Option<SwingMechanicsQuality>,
}

impl SwingReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Complete swing analyzer.
///
/// Stateless between runs: every call works only on its own input, so one
/// analyzer can serve many runs concurrently.
#[derive(Debug, Clone)]
pub struct SwingAnalyzer {
    config: AnalysisConfig,
    processor: FrameProcessor,
    front_leg: FrontLegScorer,
    weight_transfer: WeightTransferScorer,
    mechanics: MechanicsScorer,
}

impl SwingAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            processor: FrameProcessor::new(config.kinematics.clone())?,
            front_leg: FrontLegScorer::new(config.front_leg.clone(), config.segmentation.clone()),
            weight_transfer: WeightTransferScorer::new(&config)?,
            mechanics: MechanicsScorer::new(config.mechanics.clone()),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one swing, estimating mechanics inputs from its frames
    pub fn analyze(&self, sequence: &PoseSequence) -> SwingReport {
        self.analyze_with_inputs(sequence, None)
    }

    /// Analyze one swing. Supplied `inputs` take precedence over the
    /// frame-based estimate.
    pub fn analyze_with_inputs(
        &self,
        sequence: &PoseSequence,
        inputs: Option<MechanicsInputs>,
    ) -> SwingReport {
        let frames = self.processor.process(sequence);
        let summary = summarize_with(&frames, sequence.duration_ms, &self.config.segmentation);

        let front_leg = self.front_leg.score(&frames);
        let weight_transfer = self.weight_transfer.score(&frames);

        let mechanics_inputs =
            inputs.or_else(|| MechanicsInputs::estimate_from_frames(&frames, &self.config));
        let mechanics = mechanics_inputs.as_ref().map(|i| self.mechanics.score(i));

        tracing::info!(
            frames = frames.len(),
            front_leg = front_leg.as_ref().map(|s| s.overall),
            weight_transfer = weight_transfer.as_ref().map(|s| s.overall),
            mechanics = mechanics.as_ref().map(|m| m.overall),
            anomalies = summary.anomalies.len(),
            "Swing analyzed"
        );

        SwingReport {
            frames,
            summary,
            front_leg,
            weight_transfer,
            mechanics_inputs,
            mechanics,
        }
    }

    /// Parse a pose-source JSON document and analyze it
    pub fn analyze_json(&self, json: &str) -> Result<SwingReport> {
        let sequence = PoseSequence::from_json(json)?;
        Ok(self.analyze(&sequence))
    }

    /// Analyze independent swings in parallel. Each swing is still
    /// processed frame by frame in order; results keep the input order.
    pub fn analyze_batch(&self, sequences: &[PoseSequence]) -> Vec<SwingReport> {
        tracing::debug!(runs = sequences.len(), "Batch analysis started");
        sequences.par_iter().map(|s| self.analyze(s)).collect()
    }
}

impl Default for SwingAnalyzer {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            processor: FrameProcessor::default(),
            front_leg: FrontLegScorer::default(),
            weight_transfer: WeightTransferScorer::default(),
            mechanics: MechanicsScorer::new(config.mechanics.clone()),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swing_core::{Error, Keypoint, PoseFrame, PoseKeypoint};

    fn sequence(len: usize) -> PoseSequence {
        let frames = (0..len)
            .map(|i| {
                let t = i as f64 * 33.0;
                let drift = i as f64 * 2.0;
                PoseFrame::new(
                    t,
                    vec![
                        PoseKeypoint::new(Keypoint::LeftShoulder.name(), 240.0 + drift, 100.0, 0.9),
                        PoseKeypoint::new(Keypoint::RightShoulder.name(), 200.0 + drift, 100.0, 0.9),
                        PoseKeypoint::new(Keypoint::LeftHip.name(), 235.0 + drift, 200.0, 0.9),
                        PoseKeypoint::new(Keypoint::RightHip.name(), 205.0 + drift, 200.0, 0.9),
                    ],
                )
            })
            .collect();
        PoseSequence::new(frames)
    }

    #[test]
    fn test_empty_run() {
        let report = SwingAnalyzer::default().analyze(&PoseSequence::default());
        assert!(report.frames.is_empty());
        assert_eq!(report.summary, RunSummary::default());
        assert!(report.front_leg.is_none());
        assert!(report.weight_transfer.is_none());
        assert!(report.mechanics.is_none());
    }

    #[test]
    fn test_supplied_inputs_take_precedence() {
        let inputs = MechanicsInputs::new(10.0, 10.0, 45.0, 2.5);
        let report =
            SwingAnalyzer::default().analyze_with_inputs(&sequence(12), Some(inputs.clone()));
        assert_eq!(report.mechanics_inputs, Some(inputs));
        assert!(report.mechanics.is_some());
        assert_eq!(report.frames.len(), 12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.kinematics.pixels_per_meter = -1.0;
        assert!(matches!(SwingAnalyzer::new(config), Err(Error::Calibration(_))));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let analyzer = SwingAnalyzer::default();
        let runs = vec![sequence(10), sequence(0), sequence(25)];
        let batch = analyzer.analyze_batch(&runs);
        assert_eq!(batch.len(), 3);
        for (run, report) in runs.iter().zip(&batch) {
            assert_eq!(&analyzer.analyze(run), report);
        }
    }

    #[test]
    fn test_analyze_json_rejects_bad_input() {
        let analyzer = SwingAnalyzer::default();
        assert!(matches!(analyzer.analyze_json("{"), Err(Error::Serialization(_))));

        let report = analyzer
            .analyze_json(r#"{"frames": [{"keypoints": [], "timestamp_ms": 0.0}], "fps": 30.0}"#)
            .unwrap();
        assert_eq!(report.summary.total_frames, 1);
        assert!(report.to_json().unwrap().contains("\"total_frames\":1"));
    }
}
