//! Fundamental types for the swing analysis engine.

use std::collections::BTreeMap;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::phase::SwingPhase;

/// Body side, as seen from the athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Batting handedness. A right-handed hitter leads with the left side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    /// Side facing the pitcher
    pub fn lead_side(&self) -> Side {
        match self {
            Handedness::Right => Side::Left,
            Handedness::Left => Side::Right,
        }
    }

    pub fn rear_side(&self) -> Side {
        self.lead_side().opposite()
    }

    /// Image x direction of the stride: +1 when the hitter moves toward
    /// larger x, -1 otherwise. Matches the chest-facing camera assumed by
    /// handedness detection.
    pub fn forward_sign(&self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Anatomical joint, independent of side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
    Heel,
    FootIndex,
}

/// Named landmark: the 17 COCO keypoints plus optional foot landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
    // Foot landmarks, present only with whole-body models
    LeftHeel = 17,
    RightHeel = 18,
    LeftFootIndex = 19,
    RightFootIndex = 20,
}

impl Keypoint {
    pub const COUNT: usize = 21;

    pub const ALL: [Keypoint; Keypoint::COUNT] = [
        Keypoint::Nose,
        Keypoint::LeftEye,
        Keypoint::RightEye,
        Keypoint::LeftEar,
        Keypoint::RightEar,
        Keypoint::LeftShoulder,
        Keypoint::RightShoulder,
        Keypoint::LeftElbow,
        Keypoint::RightElbow,
        Keypoint::LeftWrist,
        Keypoint::RightWrist,
        Keypoint::LeftHip,
        Keypoint::RightHip,
        Keypoint::LeftKnee,
        Keypoint::RightKnee,
        Keypoint::LeftAnkle,
        Keypoint::RightAnkle,
        Keypoint::LeftHeel,
        Keypoint::RightHeel,
        Keypoint::LeftFootIndex,
        Keypoint::RightFootIndex,
    ];

    /// Wire name used by the pose source
    pub fn name(&self) -> &'static str {
        match self {
            Keypoint::Nose => "nose",
            Keypoint::LeftEye => "left_eye",
            Keypoint::RightEye => "right_eye",
            Keypoint::LeftEar => "left_ear",
            Keypoint::RightEar => "right_ear",
            Keypoint::LeftShoulder => "left_shoulder",
            Keypoint::RightShoulder => "right_shoulder",
            Keypoint::LeftElbow => "left_elbow",
            Keypoint::RightElbow => "right_elbow",
            Keypoint::LeftWrist => "left_wrist",
            Keypoint::RightWrist => "right_wrist",
            Keypoint::LeftHip => "left_hip",
            Keypoint::RightHip => "right_hip",
            Keypoint::LeftKnee => "left_knee",
            Keypoint::RightKnee => "right_knee",
            Keypoint::LeftAnkle => "left_ankle",
            Keypoint::RightAnkle => "right_ankle",
            Keypoint::LeftHeel => "left_heel",
            Keypoint::RightHeel => "right_heel",
            Keypoint::LeftFootIndex => "left_foot_index",
            Keypoint::RightFootIndex => "right_foot_index",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kp| kp.name() == name)
    }

    /// Resolve a side-independent joint to its keypoint
    pub fn of(side: Side, joint: Joint) -> Self {
        match (side, joint) {
            (Side::Left, Joint::Shoulder) => Keypoint::LeftShoulder,
            (Side::Right, Joint::Shoulder) => Keypoint::RightShoulder,
            (Side::Left, Joint::Elbow) => Keypoint::LeftElbow,
            (Side::Right, Joint::Elbow) => Keypoint::RightElbow,
            (Side::Left, Joint::Wrist) => Keypoint::LeftWrist,
            (Side::Right, Joint::Wrist) => Keypoint::RightWrist,
            (Side::Left, Joint::Hip) => Keypoint::LeftHip,
            (Side::Right, Joint::Hip) => Keypoint::RightHip,
            (Side::Left, Joint::Knee) => Keypoint::LeftKnee,
            (Side::Right, Joint::Knee) => Keypoint::RightKnee,
            (Side::Left, Joint::Ankle) => Keypoint::LeftAnkle,
            (Side::Right, Joint::Ankle) => Keypoint::RightAnkle,
            (Side::Left, Joint::Heel) => Keypoint::LeftHeel,
            (Side::Right, Joint::Heel) => Keypoint::RightHeel,
            (Side::Left, Joint::FootIndex) => Keypoint::LeftFootIndex,
            (Side::Right, Joint::FootIndex) => Keypoint::RightFootIndex,
        }
    }

    /// Joint family used when aggregating peak velocities
    pub fn joint(&self) -> Option<Joint> {
        match self {
            Keypoint::LeftShoulder | Keypoint::RightShoulder => Some(Joint::Shoulder),
            Keypoint::LeftElbow | Keypoint::RightElbow => Some(Joint::Elbow),
            Keypoint::LeftWrist | Keypoint::RightWrist => Some(Joint::Wrist),
            Keypoint::LeftHip | Keypoint::RightHip => Some(Joint::Hip),
            Keypoint::LeftKnee | Keypoint::RightKnee => Some(Joint::Knee),
            Keypoint::LeftAnkle | Keypoint::RightAnkle => Some(Joint::Ankle),
            Keypoint::LeftHeel | Keypoint::RightHeel => Some(Joint::Heel),
            Keypoint::LeftFootIndex | Keypoint::RightFootIndex => Some(Joint::FootIndex),
            _ => None,
        }
    }
}

impl Joint {
    pub fn name(&self) -> &'static str {
        match self {
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
            Joint::Wrist => "wrist",
            Joint::Hip => "hip",
            Joint::Knee => "knee",
            Joint::Ankle => "ankle",
            Joint::Heel => "heel",
            Joint::FootIndex => "foot_index",
        }
    }
}

/// 2-D image coordinate (optionally with depth) and detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub confidence: f64,
}

impl JointPosition {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            confidence,
        }
    }

    pub fn to_point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Strictly above the threshold counts as reliable
    pub fn is_reliable(&self, min_confidence: f64) -> bool {
        self.confidence > min_confidence
    }
}

/// Joint name to position for one frame
pub type KeypointMap = BTreeMap<String, JointPosition>;

/// Lookup helpers over a keypoint map
pub trait KeypointLookup {
    fn position(&self, keypoint: Keypoint) -> Option<&JointPosition>;

    /// Position only when its confidence exceeds `min_confidence`
    fn reliable(&self, keypoint: Keypoint, min_confidence: f64) -> Option<&JointPosition> {
        self.position(keypoint)
            .filter(|p| p.is_reliable(min_confidence))
    }
}

impl KeypointLookup for KeypointMap {
    fn position(&self, keypoint: Keypoint) -> Option<&JointPosition> {
        self.get(keypoint.name())
    }
}

/// Single landmark as delivered by the pose source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseKeypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub confidence: f64,
}

impl PoseKeypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z: None,
            confidence,
        }
    }
}

/// One pose-estimation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub keypoints: Vec<PoseKeypoint>,
    /// Milliseconds from sequence start
    pub timestamp_ms: f64,
}

impl PoseFrame {
    pub fn new(timestamp_ms: f64, keypoints: Vec<PoseKeypoint>) -> Self {
        Self {
            keypoints,
            timestamp_ms,
        }
    }

    /// Convert raw keypoints into a joint-position map. Later duplicates win.
    pub fn to_keypoint_map(&self) -> KeypointMap {
        self.keypoints
            .iter()
            .map(|kp| {
                (
                    kp.name.clone(),
                    JointPosition {
                        x: kp.x,
                        y: kp.y,
                        z: kp.z,
                        confidence: kp.confidence,
                    },
                )
            })
            .collect()
    }
}

/// Ordered pose sequence for one swing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSequence {
    pub frames: Vec<PoseFrame>,
    /// Source capture rate, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    /// Notional total duration of the capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
}

impl PoseSequence {
    pub fn new(frames: Vec<PoseFrame>) -> Self {
        Self {
            frames,
            fps: None,
            duration_ms: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let sequence: PoseSequence = serde_json::from_str(json)?;
        sequence.validate()?;
        Ok(sequence)
    }

    /// Reject values no pose source can legitimately produce
    pub fn validate(&self) -> Result<()> {
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.timestamp_ms.is_finite() || frame.timestamp_ms < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "frame {index} has invalid timestamp {}",
                    frame.timestamp_ms
                )));
            }
            if let Some(kp) = frame
                .keypoints
                .iter()
                .find(|kp| !kp.x.is_finite() || !kp.y.is_finite())
            {
                return Err(Error::InvalidInput(format!(
                    "frame {index} keypoint '{}' has non-finite coordinates",
                    kp.name
                )));
            }
        }
        if matches!(self.fps, Some(fps) if fps <= 0.0) {
            return Err(Error::InvalidInput("fps must be positive".to_string()));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Status band of a joint angle relative to its optimal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleStatus {
    Optimal,
    Warning,
    Danger,
}

/// Catalog of tracked joint angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AngleKind {
    #[serde(rename = "lead_knee_angle")]
    LeadKnee,
    #[serde(rename = "rear_knee_angle")]
    RearKnee,
    #[serde(rename = "lead_ankle_angle")]
    LeadAnkle,
    #[serde(rename = "rear_ankle_angle")]
    RearAnkle,
    #[serde(rename = "lead_elbow_angle")]
    LeadElbow,
    #[serde(rename = "rear_elbow_angle")]
    RearElbow,
    #[serde(rename = "spine_tilt_angle")]
    SpineTilt,
}

impl AngleKind {
    pub const ALL: [AngleKind; 7] = [
        AngleKind::LeadKnee,
        AngleKind::RearKnee,
        AngleKind::LeadAnkle,
        AngleKind::RearAnkle,
        AngleKind::LeadElbow,
        AngleKind::RearElbow,
        AngleKind::SpineTilt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AngleKind::LeadKnee => "lead_knee_angle",
            AngleKind::RearKnee => "rear_knee_angle",
            AngleKind::LeadAnkle => "lead_ankle_angle",
            AngleKind::RearAnkle => "rear_ankle_angle",
            AngleKind::LeadElbow => "lead_elbow_angle",
            AngleKind::RearElbow => "rear_elbow_angle",
            AngleKind::SpineTilt => "spine_tilt_angle",
        }
    }

    /// Optimal range in degrees
    pub fn optimal_range(&self) -> [f64; 2] {
        match self {
            AngleKind::LeadKnee => [140.0, 165.0],
            AngleKind::RearKnee => [110.0, 145.0],
            AngleKind::LeadAnkle => [80.0, 105.0],
            AngleKind::RearAnkle => [75.0, 110.0],
            AngleKind::LeadElbow => [100.0, 160.0],
            AngleKind::RearElbow => [70.0, 120.0],
            AngleKind::SpineTilt => [5.0, 30.0],
        }
    }

    /// Degrees outside the optimal range still rated `Warning`
    pub fn warning_margin(&self) -> f64 {
        match self {
            AngleKind::LeadKnee => 15.0,
            AngleKind::RearKnee => 20.0,
            AngleKind::LeadAnkle => 10.0,
            AngleKind::RearAnkle => 12.0,
            AngleKind::LeadElbow => 25.0,
            AngleKind::RearElbow => 20.0,
            AngleKind::SpineTilt => 10.0,
        }
    }

    pub fn status(&self, degrees: f64) -> AngleStatus {
        let [min, max] = self.optimal_range();
        let deviation = if degrees < min {
            min - degrees
        } else if degrees > max {
            degrees - max
        } else {
            return AngleStatus::Optimal;
        };

        if deviation <= self.warning_margin() {
            AngleStatus::Warning
        } else {
            AngleStatus::Danger
        }
    }
}

/// Joint angle measured in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    pub kind: AngleKind,
    pub degrees: f64,
    pub optimal_range: [f64; 2],
    pub status: AngleStatus,
}

impl JointAngle {
    pub fn new(kind: AngleKind, degrees: f64) -> Self {
        Self {
            kind,
            degrees,
            optimal_range: kind.optimal_range(),
            status: kind.status(degrees),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Joint speed between two consecutive frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointVelocity {
    pub keypoint: Keypoint,
    /// Meters per second
    pub speed: f64,
    /// Unit vector in image axes, zero when the joint did not move
    pub direction: Vector2<f64>,
}

/// Per-frame output of the processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_index: usize,
    pub timestamp_ms: f64,
    /// Interval since the previous frame
    pub delta_ms: f64,
    pub phase: SwingPhase,
    /// Detected once per sequence
    pub handedness: Handedness,
    pub joints: KeypointMap,
    pub angles: Vec<JointAngle>,
    pub velocities: Vec<JointVelocity>,
}

impl FrameRecord {
    pub fn angle(&self, kind: AngleKind) -> Option<&JointAngle> {
        self.angles.iter().find(|a| a.kind == kind)
    }

    pub fn angle_degrees(&self, kind: AngleKind) -> Option<f64> {
        self.angle(kind).map(|a| a.degrees)
    }

    pub fn velocity(&self, keypoint: Keypoint) -> Option<&JointVelocity> {
        self.velocities.iter().find(|v| v.keypoint == keypoint)
    }

    pub fn lead(&self, joint: Joint) -> Keypoint {
        Keypoint::of(self.handedness.lead_side(), joint)
    }

    pub fn rear(&self, joint: Joint) -> Keypoint {
        Keypoint::of(self.handedness.rear_side(), joint)
    }

    /// Midpoint of both hips, used as the center-of-mass proxy
    pub fn hip_center(&self, min_confidence: f64) -> Option<Point2<f64>> {
        let left = self.joints.reliable(Keypoint::LeftHip, min_confidence)?;
        let right = self.joints.reliable(Keypoint::RightHip, min_confidence)?;
        Some(nalgebra::center(&left.to_point(), &right.to_point()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_name_roundtrip() {
        for kp in Keypoint::ALL {
            assert_eq!(Keypoint::from_name(kp.name()), Some(kp));
        }
        assert_eq!(Keypoint::from_name("left_toe"), None);
    }

    #[test]
    fn test_handedness_sides() {
        assert_eq!(Handedness::Right.lead_side(), Side::Left);
        assert_eq!(Handedness::Left.lead_side(), Side::Right);
        assert_eq!(Handedness::default(), Handedness::Right);
        assert_eq!(Handedness::Right.forward_sign(), 1.0);
        assert_eq!(Handedness::Left.forward_sign(), -1.0);
    }

    #[test]
    fn test_angle_status_tiers_differ_per_angle() {
        // 12 degrees short of the range
        assert_eq!(AngleKind::LeadKnee.status(128.0), AngleStatus::Warning);
        assert_eq!(AngleKind::LeadAnkle.status(68.0), AngleStatus::Danger);
        assert_eq!(AngleKind::LeadKnee.status(150.0), AngleStatus::Optimal);
        assert_eq!(AngleKind::SpineTilt.status(45.0), AngleStatus::Danger);
    }

    #[test]
    fn test_pose_sequence_from_json() {
        let json = r#"{
            "frames": [
                {"keypoints": [{"name": "left_hip", "x": 10.0, "y": 20.0, "confidence": 0.9}], "timestamp_ms": 0.0},
                {"keypoints": [], "timestamp_ms": 33.0}
            ],
            "fps": 30.0
        }"#;
        let seq = PoseSequence::from_json(json).unwrap();
        assert_eq!(seq.len(), 2);
        let map = seq.frames[0].to_keypoint_map();
        assert_eq!(map.position(Keypoint::LeftHip).map(|p| p.y), Some(20.0));
        assert!(map.reliable(Keypoint::LeftHip, 0.95).is_none());
    }

    #[test]
    fn test_pose_sequence_rejects_negative_timestamp() {
        let json = r#"{"frames": [{"keypoints": [], "timestamp_ms": -5.0}]}"#;
        assert!(matches!(
            PoseSequence::from_json(json),
            Err(Error::InvalidInput(_))
        ));
    }
}
