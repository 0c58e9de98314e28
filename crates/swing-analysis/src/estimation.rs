//! Mechanics inputs estimated from frame records.
//!
//! Used when no external estimator supplies [`MechanicsInputs`]. There is
//! no bat keypoint, so attack angle and bat path plane are read from the
//! lead wrist's direction of travel, and tempo relies on the phase labels
//! carried by the frames.

use swing_core::{
    line_orientation, line_separation, locate_contact_frame, FrameRecord, Joint, Keypoint,
    KeypointLookup, SwingPhase,
};

use crate::config::AnalysisConfig;
use crate::mechanics::MechanicsInputs;

impl MechanicsInputs {
    /// Estimate the scalar inputs from a processed run.
    ///
    /// Returns `None` when any required signal is missing: no load or fire
    /// time, no frame with both shoulders and hips visible, or no lead
    /// wrist motion at contact. Qualitative ratings are left unset.
    pub fn estimate_from_frames(frames: &[FrameRecord], config: &AnalysisConfig) -> Option<Self> {
        let min_confidence = config.kinematics.min_confidence;

        let tempo_ratio = tempo_ratio(frames)?;
        let separation = max_hip_shoulder_separation(frames, min_confidence)?;

        let contact = locate_contact_frame(frames, config.segmentation.contact_fallback_fraction)?;
        let attack_angle = lead_wrist_elevation(&frames[contact])?;

        let path: Vec<f64> = frames
            .iter()
            .filter(|f| matches!(f.phase, SwingPhase::Fire | SwingPhase::Contact))
            .filter_map(lead_wrist_elevation)
            .collect();
        let bat_path_plane = if path.is_empty() {
            attack_angle
        } else {
            path.iter().sum::<f64>() / path.len() as f64
        };

        tracing::debug!(
            tempo_ratio,
            separation,
            attack_angle,
            bat_path_plane,
            "Mechanics inputs estimated"
        );

        Some(MechanicsInputs::new(
            attack_angle,
            bat_path_plane,
            separation,
            tempo_ratio,
        ))
    }
}

/// Time spent in `phase`: each frame's interval to the next frame
pub fn phase_duration_ms(frames: &[FrameRecord], phase: SwingPhase) -> f64 {
    frames
        .windows(2)
        .filter(|w| w[0].phase == phase)
        .map(|w| w[1].timestamp_ms - w[0].timestamp_ms)
        .sum()
}

fn tempo_ratio(frames: &[FrameRecord]) -> Option<f64> {
    let load = phase_duration_ms(frames, SwingPhase::Load);
    let fire = phase_duration_ms(frames, SwingPhase::Fire);
    (load > 0.0 && fire > 0.0).then(|| load / fire)
}

fn max_hip_shoulder_separation(frames: &[FrameRecord], min_confidence: f64) -> Option<f64> {
    frames
        .iter()
        .filter_map(|f| {
            let line = |left: Keypoint, right: Keypoint| {
                let a = f.joints.reliable(left, min_confidence)?;
                let b = f.joints.reliable(right, min_confidence)?;
                line_orientation(&a.to_point(), &b.to_point())
            };
            let shoulders = line(Keypoint::LeftShoulder, Keypoint::RightShoulder)?;
            let hips = line(Keypoint::LeftHip, Keypoint::RightHip)?;
            Some(line_separation(shoulders, hips))
        })
        .fold(None, |max, sep| Some(max.map_or(sep, |m: f64| m.max(sep))))
}

/// Upward angle of the lead wrist's travel, degrees. Image y grows
/// downward; horizontal direction is ignored so both batting sides agree.
fn lead_wrist_elevation(frame: &FrameRecord) -> Option<f64> {
    let velocity = frame.velocity(frame.lead(Joint::Wrist))?;
    if velocity.speed <= 0.0 {
        return None;
    }
    let d = velocity.direction;
    Some((-d.y).atan2(d.x.abs()).to_degrees())
}
