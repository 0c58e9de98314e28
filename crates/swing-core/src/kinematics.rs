//! Per-frame kinematics: handedness, joint angles and joint velocities.

use nalgebra::Point2;

use crate::geometry::{self, Calibration};
use crate::types::{
    AngleKind, Handedness, Joint, JointAngle, JointVelocity, Keypoint, KeypointLookup,
    KeypointMap, Side,
};

/// Keypoints must be strictly more confident than this to be used
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Joints whose frame-to-frame velocity is tracked
pub const TRACKED_JOINTS: [Keypoint; 12] = [
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
];

/// Infer batting handedness from a single frame.
///
/// Camera faces the hitter's chest for a right-hander, so the left shoulder
/// appears to the right of the right shoulder in the image. Hips break a
/// tie or stand in for missing shoulders. Defaults to right-handed.
pub fn detect_handedness(keypoints: &KeypointMap, min_confidence: f64) -> Handedness {
    let pairs = [
        (Keypoint::LeftShoulder, Keypoint::RightShoulder),
        (Keypoint::LeftHip, Keypoint::RightHip),
    ];

    for (left, right) in pairs {
        let (Some(l), Some(r)) = (
            keypoints.reliable(left, min_confidence),
            keypoints.reliable(right, min_confidence),
        ) else {
            continue;
        };

        if l.x > r.x {
            return Handedness::Right;
        }
        if l.x < r.x {
            return Handedness::Left;
        }
    }

    Handedness::Right
}

/// Compute the angle catalog for one frame.
///
/// An angle is emitted only when all of its input keypoints are reliable and
/// the geometry is non-degenerate.
pub fn joint_angles(
    keypoints: &KeypointMap,
    handedness: Handedness,
    min_confidence: f64,
) -> Vec<JointAngle> {
    let lead = handedness.lead_side();
    let rear = handedness.rear_side();

    AngleKind::ALL
        .iter()
        .filter_map(|&kind| {
            let degrees = match kind {
                AngleKind::LeadKnee => {
                    limb_angle(keypoints, lead, [Joint::Hip, Joint::Knee, Joint::Ankle], min_confidence)
                }
                AngleKind::RearKnee => {
                    limb_angle(keypoints, rear, [Joint::Hip, Joint::Knee, Joint::Ankle], min_confidence)
                }
                AngleKind::LeadAnkle => limb_angle(
                    keypoints,
                    lead,
                    [Joint::Knee, Joint::Ankle, Joint::FootIndex],
                    min_confidence,
                ),
                AngleKind::RearAnkle => limb_angle(
                    keypoints,
                    rear,
                    [Joint::Knee, Joint::Ankle, Joint::FootIndex],
                    min_confidence,
                ),
                AngleKind::LeadElbow => limb_angle(
                    keypoints,
                    lead,
                    [Joint::Shoulder, Joint::Elbow, Joint::Wrist],
                    min_confidence,
                ),
                AngleKind::RearElbow => limb_angle(
                    keypoints,
                    rear,
                    [Joint::Shoulder, Joint::Elbow, Joint::Wrist],
                    min_confidence,
                ),
                AngleKind::SpineTilt => spine_tilt(keypoints, min_confidence),
            }?;
            Some(JointAngle::new(kind, degrees))
        })
        .collect()
}

fn limb_angle(
    keypoints: &KeypointMap,
    side: Side,
    [a, vertex, b]: [Joint; 3],
    min_confidence: f64,
) -> Option<f64> {
    let point = |joint| {
        keypoints
            .reliable(Keypoint::of(side, joint), min_confidence)
            .map(|p| p.to_point())
    };
    geometry::angle(&point(a)?, &point(vertex)?, &point(b)?)
}

/// Torso lean away from vertical, measured at the hip center
fn spine_tilt(keypoints: &KeypointMap, min_confidence: f64) -> Option<f64> {
    let midpoint = |left, right| -> Option<Point2<f64>> {
        let l = keypoints.reliable(left, min_confidence)?;
        let r = keypoints.reliable(right, min_confidence)?;
        Some(nalgebra::center(&l.to_point(), &r.to_point()))
    };

    let shoulders = midpoint(Keypoint::LeftShoulder, Keypoint::RightShoulder)?;
    let hips = midpoint(Keypoint::LeftHip, Keypoint::RightHip)?;
    // Image y grows downward
    let above_hips = Point2::new(hips.x, hips.y - 1.0);

    geometry::angle(&shoulders, &hips, &above_hips)
}

/// Velocities of the tracked joints between two frames.
///
/// A joint is included only when both frames see it reliably. An interval
/// that is not positive yields no velocities at all.
pub fn joint_velocities(
    current: &KeypointMap,
    previous: &KeypointMap,
    dt_ms: f64,
    calibration: &Calibration,
    min_confidence: f64,
) -> Vec<JointVelocity> {
    TRACKED_JOINTS
        .iter()
        .filter_map(|&keypoint| {
            let curr = current.reliable(keypoint, min_confidence)?;
            let prev = previous.reliable(keypoint, min_confidence)?;
            let motion =
                geometry::velocity(&prev.to_point(), &curr.to_point(), dt_ms, calibration)?;
            Some(JointVelocity {
                keypoint,
                speed: motion.speed,
                direction: motion.direction,
            })
        })
        .collect()
}
