//! Run-level summary of a processed swing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use swing_core::{
    locate_phase_frame, AngleKind, AngleStatus, FrameRecord, Handedness, SwingPhase,
};

use crate::config::SegmentationConfig;

/// Angles reported at a representative frame of a phase
const CRITICAL_ANGLES: [(&str, AngleKind, SwingPhase); 6] = [
    ("lead_knee_at_contact", AngleKind::LeadKnee, SwingPhase::Contact),
    ("lead_ankle_at_contact", AngleKind::LeadAnkle, SwingPhase::Contact),
    ("lead_elbow_at_contact", AngleKind::LeadElbow, SwingPhase::Contact),
    ("spine_tilt_at_contact", AngleKind::SpineTilt, SwingPhase::Contact),
    ("rear_knee_at_load", AngleKind::RearKnee, SwingPhase::Load),
    ("rear_elbow_at_load", AngleKind::RearElbow, SwingPhase::Load),
];

/// Summary of a whole analysis run.
///
/// Always present, even for an empty run: counts are zero, collections
/// empty and optional values `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_frames: usize,
    pub duration_ms: Option<f64>,
    pub handedness: Option<Handedness>,
    pub phase_breakdown: BTreeMap<SwingPhase, usize>,
    /// Named angles sampled at key phases, degrees
    pub critical_angles: BTreeMap<String, f64>,
    pub max_spine_tilt: Option<f64>,
    /// Peak speed per joint family, m/s
    pub peak_velocities: BTreeMap<String, f64>,
    /// One entry per angle that entered its danger band
    pub anomalies: Vec<String>,
}

/// Summarize with default segmentation and the duration spanned by the frames
pub fn summarize(frames: &[FrameRecord]) -> RunSummary {
    summarize_with(frames, None, &SegmentationConfig::default())
}

/// Summarize a processed run.
///
/// `duration_ms` is the notional capture duration; without it the span
/// between first and last timestamp is used.
pub fn summarize_with(
    frames: &[FrameRecord],
    duration_ms: Option<f64>,
    segmentation: &SegmentationConfig,
) -> RunSummary {
    if frames.is_empty() {
        return RunSummary::default();
    }

    let mut phase_breakdown = BTreeMap::new();
    for frame in frames {
        *phase_breakdown.entry(frame.phase).or_insert(0) += 1;
    }

    let duration_ms = duration_ms.or_else(|| {
        let first = frames.first()?;
        let last = frames.last()?;
        Some(last.timestamp_ms - first.timestamp_ms)
    });

    RunSummary {
        total_frames: frames.len(),
        duration_ms,
        handedness: frames.first().map(|f| f.handedness),
        phase_breakdown,
        critical_angles: critical_angles(frames, segmentation),
        max_spine_tilt: max_spine_tilt(frames),
        peak_velocities: peak_velocities(frames),
        anomalies: anomalies(frames),
    }
}

fn critical_angles(
    frames: &[FrameRecord],
    segmentation: &SegmentationConfig,
) -> BTreeMap<String, f64> {
    CRITICAL_ANGLES
        .iter()
        .filter_map(|&(name, kind, phase)| {
            let fallback = match phase {
                SwingPhase::Contact => segmentation.contact_fallback_fraction,
                other => other.nominal_fraction(),
            };
            let index = locate_phase_frame(frames, phase, fallback)?;
            let degrees = frames[index].angle_degrees(kind)?;
            Some((name.to_string(), degrees))
        })
        .collect()
}

fn max_spine_tilt(frames: &[FrameRecord]) -> Option<f64> {
    frames
        .iter()
        .filter_map(|f| f.angle_degrees(AngleKind::SpineTilt))
        .fold(None, |max, tilt| Some(max.map_or(tilt, |m: f64| m.max(tilt))))
}

fn peak_velocities(frames: &[FrameRecord]) -> BTreeMap<String, f64> {
    let mut peaks: BTreeMap<String, f64> = BTreeMap::new();
    for velocity in frames.iter().flat_map(|f| f.velocities.iter()) {
        let Some(joint) = velocity.keypoint.joint() else {
            continue;
        };
        let peak = peaks.entry(joint.name().to_string()).or_insert(0.0);
        *peak = peak.max(velocity.speed);
    }
    peaks
}

fn anomalies(frames: &[FrameRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut flags = Vec::new();

    for frame in frames {
        for angle in frame.angles.iter().filter(|a| a.status == AngleStatus::Danger) {
            if !seen.insert(angle.kind) {
                continue;
            }
            let [min, max] = angle.optimal_range;
            flags.push(format!(
                "{} in danger range: {:.1}° during {} (optimal {:.0}-{:.0}°)",
                angle.name(),
                angle.degrees,
                frame.phase,
                min,
                max
            ));
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use swing_core::{segment_positional, JointAngle, JointVelocity, Keypoint, KeypointMap};

    fn run(len: usize) -> Vec<FrameRecord> {
        segment_positional(len)
            .into_iter()
            .enumerate()
            .map(|(i, phase)| FrameRecord {
                frame_index: i,
                timestamp_ms: i as f64 * 33.0,
                delta_ms: 33.0,
                phase,
                handedness: Handedness::Left,
                joints: KeypointMap::new(),
                angles: Vec::new(),
                velocities: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_empty_summary_is_present() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_frames, 0);
        assert!(summary.phase_breakdown.is_empty());
        assert!(summary.critical_angles.is_empty());
        assert!(summary.peak_velocities.is_empty());
        assert!(summary.anomalies.is_empty());
        assert_eq!(summary.handedness, None);
        assert_eq!(summary.duration_ms, None);
    }

    #[test]
    fn test_phase_histogram_and_duration() {
        let summary = summarize(&run(20));
        assert_eq!(summary.total_frames, 20);
        assert_eq!(summary.phase_breakdown[&SwingPhase::Stance], 3);
        assert_eq!(summary.phase_breakdown[&SwingPhase::Load], 4);
        assert_eq!(summary.phase_breakdown[&SwingPhase::Contact], 2);
        assert_eq!(summary.phase_breakdown[&SwingPhase::FollowThrough], 3);
        assert_eq!(summary.duration_ms, Some(19.0 * 33.0));
        assert_eq!(summary.handedness, Some(Handedness::Left));

        let supplied = summarize_with(&run(20), Some(1000.0), &SegmentationConfig::default());
        assert_eq!(supplied.duration_ms, Some(1000.0));
    }

    #[test]
    fn test_critical_angles_use_phase_frames() {
        let mut frames = run(20);
        // First contact frame is 15, first load frame is 3
        frames[15].angles.push(JointAngle::new(AngleKind::LeadKnee, 152.0));
        frames[16].angles.push(JointAngle::new(AngleKind::LeadKnee, 170.0));
        frames[3].angles.push(JointAngle::new(AngleKind::RearKnee, 125.0));

        let summary = summarize(&frames);
        assert_eq!(summary.critical_angles["lead_knee_at_contact"], 152.0);
        assert_eq!(summary.critical_angles["rear_knee_at_load"], 125.0);
        assert!(!summary.critical_angles.contains_key("lead_elbow_at_contact"));
    }

    #[test]
    fn test_critical_angle_percentile_fallback() {
        let mut frames = run(10);
        for f in &mut frames {
            f.phase = SwingPhase::Stance;
        }
        frames[8].angles.push(JointAngle::new(AngleKind::LeadKnee, 149.0));

        let summary = summarize(&frames);
        assert_eq!(summary.critical_angles["lead_knee_at_contact"], 149.0);
    }

    #[test]
    fn test_anomalies_deduplicated_first_wins() {
        let mut frames = run(20);
        frames[4].angles.push(JointAngle::new(AngleKind::LeadKnee, 95.0));
        frames[12].angles.push(JointAngle::new(AngleKind::LeadKnee, 90.0));
        frames[12].angles.push(JointAngle::new(AngleKind::SpineTilt, 60.0));
        frames[13].angles.push(JointAngle::new(AngleKind::SpineTilt, 18.0));

        let summary = summarize(&frames);
        assert_eq!(summary.anomalies.len(), 2);
        assert!(summary.anomalies[0].starts_with("lead_knee_angle"));
        assert!(summary.anomalies[0].contains("during load"));
        assert!(summary.anomalies[0].contains("95.0"));
        assert!(summary.anomalies[1].starts_with("spine_tilt_angle"));
        assert_eq!(summary.max_spine_tilt, Some(60.0));
    }

    #[test]
    fn test_peak_velocity_per_family() {
        let mut frames = run(5);
        let v = |keypoint, speed| JointVelocity {
            keypoint,
            speed,
            direction: Vector2::new(1.0, 0.0),
        };
        frames[1].velocities.push(v(Keypoint::LeftWrist, 3.0));
        frames[2].velocities.push(v(Keypoint::RightWrist, 5.5));
        frames[3].velocities.push(v(Keypoint::LeftHip, 1.2));

        let summary = summarize(&frames);
        assert_eq!(summary.peak_velocities["wrist"], 5.5);
        assert_eq!(summary.peak_velocities["hip"], 1.2);
        assert_eq!(summary.peak_velocities.len(), 2);
    }
}
