//! Frame processing pipeline.
//!
//! Turns a pose sequence into one [`FrameRecord`] per frame. Frames are
//! processed strictly in index order: velocities depend on the previous
//! record, and handedness is fixed from the first frame for the whole run.

use swing_core::{
    detect_handedness, joint_angles, joint_velocities, Calibration, FrameRecord, PoseSequence,
    Result, SwingPhase,
};

use crate::config::KinematicsConfig;

/// Converts pose sequences into frame records
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    config: KinematicsConfig,
    calibration: Calibration,
}

impl FrameProcessor {
    pub fn new(config: KinematicsConfig) -> Result<Self> {
        let calibration = Calibration::new(config.pixels_per_meter)?;
        Ok(Self {
            config,
            calibration,
        })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Process a full sequence. An empty sequence yields no records.
    pub fn process(&self, sequence: &PoseSequence) -> Vec<FrameRecord> {
        let Some(first) = sequence.frames.first() else {
            return Vec::new();
        };

        let total = sequence.frames.len();
        let handedness = detect_handedness(&first.to_keypoint_map(), self.config.min_confidence);
        tracing::debug!(frames = total, ?handedness, "Processing pose sequence");

        let mut records: Vec<FrameRecord> = Vec::with_capacity(total);

        for (index, frame) in sequence.frames.iter().enumerate() {
            let joints = frame.to_keypoint_map();

            let (timestamp_ms, delta_ms) = match records.last() {
                Some(prev) => {
                    let mut timestamp = frame.timestamp_ms;
                    if timestamp < prev.timestamp_ms {
                        tracing::warn!(
                            frame = index,
                            timestamp,
                            previous = prev.timestamp_ms,
                            "Non-monotonic timestamp clamped to previous frame"
                        );
                        timestamp = prev.timestamp_ms;
                    }
                    (timestamp, timestamp - prev.timestamp_ms)
                }
                None => (frame.timestamp_ms, self.config.default_frame_interval_ms),
            };

            let velocities = match records.last() {
                Some(prev) => {
                    if delta_ms <= 0.0 {
                        tracing::warn!(frame = index, "Zero frame interval, velocities omitted");
                    }
                    joint_velocities(
                        &joints,
                        &prev.joints,
                        delta_ms,
                        &self.calibration,
                        self.config.min_confidence,
                    )
                }
                None => Vec::new(),
            };

            let angles = joint_angles(&joints, handedness, self.config.min_confidence);

            records.push(FrameRecord {
                frame_index: index,
                timestamp_ms,
                delta_ms,
                phase: SwingPhase::from_position(index, total),
                handedness,
                joints,
                angles,
                velocities,
            });
        }

        records
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self {
            config: KinematicsConfig::default(),
            calibration: Calibration::default(),
        }
    }
}
