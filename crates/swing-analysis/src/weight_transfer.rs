//! Weight-transfer scoring.
//!
//! The hip center stands in for the center of mass (COM). Four independent
//! measurements are taken from it and from the rear ankle:
//!
//! - **Vertical movement**: COM height range over the whole swing, inches
//! - **Timing**: peak forward COM speed, seconds before contact
//! - **Rear-foot lift**: rear ankle leaving the ground, seconds after contact
//! - **Acceleration**: peak forward COM acceleration and its timing
//!
//! "Forward" is the stride direction in the image, taken from the run's
//! handedness. Peaks are the largest signed forward values, so the braking
//! at front-foot plant never counts as hip drive.
//!
//! Times are signed relative to the contact frame. "Before contact" values
//! are positive when the event precedes contact; "after contact" values are
//! positive when it follows.

use nalgebra::Point2;
use swing_core::{
    locate_contact_frame, Calibration, FrameRecord, Joint, KeypointLookup, Result, SwingPhase,
};

use crate::config::{AnalysisConfig, SegmentationConfig, WeightTransferConfig};
use crate::scoring::{
    missing_measurements, select_insight, weighted_score, Band, BandTable, Category,
    ComponentScore, InsightRule, SubScore, Unit,
};

pub const VERTICAL_MOVEMENT: &str = "vertical_movement";
pub const TIMING: &str = "timing";
pub const BACK_FOOT: &str = "back_foot";
pub const ACCELERATION: &str = "acceleration";

const VERTICAL_WEIGHT: f64 = 0.25;
const TIMING_WEIGHT: f64 = 0.35;
const BACK_FOOT_WEIGHT: f64 = 0.25;
const ACCELERATION_WEIGHT: f64 = 0.15;

/// COM height range, inches
pub const VERTICAL_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(0.0, 1.5, 100, "Elite - quiet, level center of mass"),
        Band::new(1.5, 3.0, 85, "Good - minor vertical movement"),
        Band::new(3.0, 5.0, 70, "Developing - noticeable bobbing"),
        Band::new(5.0, 7.0, 50, "Beginner - excessive vertical movement"),
    ],
    floor_score: 25,
    floor_status: "Critical - center of mass rising or dropping sharply",
};

/// Peak COM speed, seconds before contact
pub const TIMING_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(0.10, 0.15, 100, "Elite - hips peak just before contact"),
        Band::new(0.05, 0.10, 85, "Good - hips peak slightly late"),
        Band::new(0.15, 0.20, 85, "Good - hips peak slightly early"),
        Band::new(0.0, 0.05, 70, "Developing - hips peak late"),
        Band::new(0.20, 0.30, 70, "Developing - hips peak early"),
        Band::new(-0.05, 0.0, 50, "Beginner - hips peak after contact"),
        Band::new(0.30, 0.40, 50, "Beginner - hips fire far too early"),
    ],
    floor_score: 25,
    floor_status: "Critical - hip drive disconnected from contact",
};

/// Rear-foot lift, seconds after contact
pub const BACK_FOOT_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(0.05, 0.15, 100, "Elite - rear foot stays connected through contact"),
        Band::new(0.0, 0.05, 85, "Good - rear foot releases at contact"),
        Band::new(0.15, 0.25, 85, "Good - rear foot releases slightly late"),
        Band::new(-0.05, 0.0, 70, "Developing - rear foot releases just before contact"),
        Band::new(0.25, 0.35, 70, "Developing - rear foot dragging"),
        Band::new(-0.10, -0.05, 50, "Beginner - rear foot lifts before contact"),
    ],
    floor_score: 25,
    floor_status: "Critical - rear foot timing disconnected from contact",
};

/// Joint band over (acceleration, seconds before contact)
#[derive(Debug, Clone, Copy)]
struct AccelerationBand {
    min_accel: f64,
    timing_min: f64,
    timing_max: f64,
    score: u8,
    status: &'static str,
}

const ACCELERATION_BANDS: [AccelerationBand; 4] = [
    AccelerationBand {
        min_accel: 8.0,
        timing_min: 0.05,
        timing_max: 0.20,
        score: 100,
        status: "Elite - explosive, well-timed hip drive",
    },
    AccelerationBand {
        min_accel: 5.0,
        timing_min: 0.0,
        timing_max: 0.25,
        score: 85,
        status: "Good - strong hip acceleration",
    },
    AccelerationBand {
        min_accel: 3.0,
        timing_min: -0.05,
        timing_max: 0.30,
        score: 70,
        status: "Developing - moderate or mistimed hip drive",
    },
    AccelerationBand {
        min_accel: 1.5,
        timing_min: f64::NEG_INFINITY,
        timing_max: f64::INFINITY,
        score: 50,
        status: "Beginner - weak hip acceleration",
    },
];

const ACCELERATION_FLOOR: (u8, &str) = (25, "Critical - little forward hip acceleration");

pub fn score_vertical_movement(inches: f64) -> (u8, &'static str) {
    VERTICAL_TABLE.lookup(inches)
}

pub fn score_timing(seconds_before_contact: f64) -> (u8, &'static str) {
    TIMING_TABLE.lookup(seconds_before_contact)
}

pub fn score_back_foot(seconds_after_contact: f64) -> (u8, &'static str) {
    BACK_FOOT_TABLE.lookup(seconds_after_contact)
}

/// Score peak acceleration (m/s²) together with its timing before contact
pub fn score_acceleration(accel: f64, seconds_before_contact: f64) -> (u8, &'static str) {
    ACCELERATION_BANDS
        .iter()
        .find(|b| {
            accel >= b.min_accel
                && seconds_before_contact >= b.timing_min
                && seconds_before_contact <= b.timing_max
        })
        .map(|b| (b.score, b.status))
        .unwrap_or(ACCELERATION_FLOOR)
}

/// Peak forward COM acceleration and when it occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationPeak {
    /// Forward component, m/s². Negative when the hips only slow down.
    pub magnitude: f64,
    pub seconds_before_contact: f64,
}

/// Raw weight-transfer measurements; `None` marks an indeterminate value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightTransferMeasurements {
    pub vertical_movement_in: Option<f64>,
    pub timing_s: Option<f64>,
    pub back_foot_lift_s: Option<f64>,
    pub acceleration: Option<AccelerationPeak>,
}

/// Timestamped COM position
#[derive(Debug, Clone, Copy)]
struct ComSample {
    timestamp_ms: f64,
    position: Point2<f64>,
}

/// Scores weight transfer over a completed frame sequence
#[derive(Debug, Clone)]
pub struct WeightTransferScorer {
    config: WeightTransferConfig,
    segmentation: SegmentationConfig,
    calibration: Calibration,
    min_confidence: f64,
}

impl WeightTransferScorer {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            config: config.weight_transfer.clone(),
            segmentation: config.segmentation.clone(),
            calibration: config.calibration()?,
            min_confidence: config.kinematics.min_confidence,
        })
    }

    /// Extract the raw measurements. `None` for an empty sequence.
    pub fn measure(&self, frames: &[FrameRecord]) -> Option<WeightTransferMeasurements> {
        let contact = locate_contact_frame(frames, self.segmentation.contact_fallback_fraction)?;
        let contact_ms = frames[contact].timestamp_ms;
        let forward = frames[contact].handedness.forward_sign();

        let com: Vec<ComSample> = frames
            .iter()
            .filter_map(|f| {
                Some(ComSample {
                    timestamp_ms: f.timestamp_ms,
                    position: f.hip_center(self.min_confidence)?,
                })
            })
            .collect();

        Some(WeightTransferMeasurements {
            vertical_movement_in: self.vertical_movement(&com),
            timing_s: self.peak_velocity_timing(&com, forward, contact_ms),
            back_foot_lift_s: self.back_foot_lift(frames, contact_ms),
            acceleration: self.peak_acceleration(&com, forward, contact_ms),
        })
    }

    /// `None` for an empty sequence
    pub fn score(&self, frames: &[FrameRecord]) -> Option<ComponentScore> {
        let m = self.measure(frames)?;

        let vertical = SubScore::from_table(
            VERTICAL_MOVEMENT,
            m.vertical_movement_in,
            Unit::Inches,
            &VERTICAL_TABLE,
        );
        let timing = SubScore::from_table(TIMING, m.timing_s, Unit::Seconds, &TIMING_TABLE);
        let back_foot =
            SubScore::from_table(BACK_FOOT, m.back_foot_lift_s, Unit::Seconds, &BACK_FOOT_TABLE);
        let acceleration = match m.acceleration {
            Some(peak) => {
                let (score, status) =
                    score_acceleration(peak.magnitude, peak.seconds_before_contact);
                SubScore {
                    name: ACCELERATION.to_string(),
                    score,
                    status: format!("{status} ({:.2}s before contact)", peak.seconds_before_contact),
                    measurement: Some(peak.magnitude),
                    unit: Unit::MetersPerSecondSquared,
                }
            }
            None => SubScore::no_data(ACCELERATION, Unit::MetersPerSecondSquared),
        };

        let overall = weighted_score(&[
            (vertical.score, VERTICAL_WEIGHT),
            (timing.score, TIMING_WEIGHT),
            (back_foot.score, BACK_FOOT_WEIGHT),
            (acceleration.score, ACCELERATION_WEIGHT),
        ]);

        let reading = WeightTransferReading {
            vertical,
            timing,
            back_foot,
            acceleration,
        };
        let insight = select_insight(&INSIGHT_RULES, &reading, &BALANCED);

        tracing::debug!(
            vertical = reading.vertical.score,
            timing = reading.timing.score,
            back_foot = reading.back_foot.score,
            acceleration = reading.acceleration.score,
            overall,
            "Weight transfer scored"
        );

        Some(ComponentScore {
            overall,
            category: Category::from_score(overall),
            sub_scores: vec![
                reading.vertical,
                reading.timing,
                reading.back_foot,
                reading.acceleration,
            ],
            insight,
        })
    }

    fn vertical_movement(&self, com: &[ComSample]) -> Option<f64> {
        if com.len() < 2 {
            return None;
        }
        let (min, max) = com.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.position.y), hi.max(s.position.y))
        });
        Some(self.calibration.px_to_inches(max - min))
    }

    /// Signed forward COM velocity (m/s) between consecutive samples, tagged
    /// with the later sample's timestamp
    fn forward_velocities(&self, com: &[ComSample], forward: f64) -> Vec<(f64, f64)> {
        com.windows(2)
            .filter_map(|w| {
                let dt_s = (w[1].timestamp_ms - w[0].timestamp_ms) / 1000.0;
                if dt_s <= 0.0 {
                    return None;
                }
                let dx_m = self.calibration.px_to_meters(w[1].position.x - w[0].position.x);
                Some((w[1].timestamp_ms, forward * dx_m / dt_s))
            })
            .collect()
    }

    fn peak_velocity_timing(&self, com: &[ComSample], forward: f64, contact_ms: f64) -> Option<f64> {
        let (peak_ms, _) = max_by_value(self.forward_velocities(com, forward))?;
        Some((contact_ms - peak_ms) / 1000.0)
    }

    fn back_foot_lift(&self, frames: &[FrameRecord], contact_ms: f64) -> Option<f64> {
        let rear_ankle = frames.first()?.rear(Joint::Ankle);
        let ankle_y = |f: &FrameRecord| {
            f.joints
                .reliable(rear_ankle, self.min_confidence)
                .map(|p| p.y)
        };

        let baseline: Vec<f64> = frames
            .iter()
            .filter(|f| matches!(f.phase, SwingPhase::Stance | SwingPhase::Load))
            .filter_map(ankle_y)
            .collect();
        if baseline.is_empty() {
            return None;
        }
        let baseline_y = baseline.iter().sum::<f64>() / baseline.len() as f64;
        let threshold_px = self
            .calibration
            .inches_to_px(self.config.foot_lift_threshold_in);

        // Image y grows downward, so a raised foot has a smaller y
        let lift = frames
            .iter()
            .find(|f| ankle_y(f).is_some_and(|y| baseline_y - y > threshold_px));

        Some(match lift {
            Some(frame) => (frame.timestamp_ms - contact_ms) / 1000.0,
            None => self.config.never_lifted_offset_s,
        })
    }

    fn peak_acceleration(
        &self,
        com: &[ComSample],
        forward: f64,
        contact_ms: f64,
    ) -> Option<AccelerationPeak> {
        let accelerations = com.windows(3).filter_map(|w| {
            let dt1 = (w[1].timestamp_ms - w[0].timestamp_ms) / 1000.0;
            let dt2 = (w[2].timestamp_ms - w[1].timestamp_ms) / 1000.0;
            if dt1 <= 0.0 || dt2 <= 0.0 {
                return None;
            }
            let v1 = self.calibration.px_to_meters(w[1].position.x - w[0].position.x) / dt1;
            let v2 = self.calibration.px_to_meters(w[2].position.x - w[1].position.x) / dt2;
            let accel = forward * (v2 - v1) / ((dt1 + dt2) / 2.0);
            Some((w[1].timestamp_ms, accel))
        });
        let (peak_ms, magnitude) = max_by_value(accelerations)?;

        Some(AccelerationPeak {
            magnitude,
            seconds_before_contact: (contact_ms - peak_ms) / 1000.0,
        })
    }
}

/// Largest `(timestamp, value)` pair by value; the earliest wins a tie
fn max_by_value(samples: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    samples
        .into_iter()
        .fold(None, |best: Option<(f64, f64)>, (t, v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((t, v)),
        })
}

impl Default for WeightTransferScorer {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            config: config.weight_transfer,
            segmentation: config.segmentation,
            calibration: Calibration::default(),
            min_confidence: config.kinematics.min_confidence,
        }
    }
}

/// Score with default configuration
pub fn weight_transfer(frames: &[FrameRecord]) -> Option<ComponentScore> {
    WeightTransferScorer::default().score(frames)
}

struct WeightTransferReading {
    vertical: SubScore,
    timing: SubScore,
    back_foot: SubScore,
    acceleration: SubScore,
}

impl WeightTransferReading {
    fn missing(&self) -> Option<String> {
        missing_measurements(&[&self.vertical, &self.timing, &self.back_foot, &self.acceleration])
    }
}

fn needs_work(sub: &SubScore) -> bool {
    sub.has_data() && sub.score < 70
}

const INSIGHT_RULES: [InsightRule<WeightTransferReading>; 5] = [
    InsightRule {
        key: "transfer_timing",
        applies: |r| needs_work(&r.timing),
        message: |r| {
            let seconds = r.timing.measurement.unwrap_or_default();
            if seconds < 0.10 {
                format!(
                    "Hips reach peak speed {seconds:.2}s before contact, too late to power the swing. Start the forward move earlier."
                )
            } else {
                format!(
                    "Hips reach peak speed {seconds:.2}s before contact and coast into the ball. Sync the hip drive with the swing."
                )
            }
        },
    },
    InsightRule {
        key: "vertical_movement",
        applies: |r| needs_work(&r.vertical),
        message: |r| {
            format!(
                "Center of mass moves {:.1} inches vertically. Stay level through the stride to keep the eyes and barrel on plane.",
                r.vertical.measurement.unwrap_or_default()
            )
        },
    },
    InsightRule {
        key: "back_foot",
        applies: |r| needs_work(&r.back_foot),
        message: |r| {
            let seconds = r.back_foot.measurement.unwrap_or_default();
            if seconds < 0.0 {
                format!(
                    "Rear foot leaves the ground {:.2}s before contact. Keep it connected so weight transfers into the front side.",
                    -seconds
                )
            } else {
                format!(
                    "Rear foot stays planted {seconds:.2}s after contact. Let the back side release to finish rotation."
                )
            }
        },
    },
    InsightRule {
        key: "hip_acceleration",
        applies: |r| needs_work(&r.acceleration),
        message: |r| {
            format!(
                "Peak hip acceleration is {:.1} m/s². Drive the back hip forward more aggressively into the stride.",
                r.acceleration.measurement.unwrap_or_default()
            )
        },
    },
    InsightRule {
        key: "weight_transfer_insufficient_data",
        applies: |r| r.missing().is_some(),
        message: |r| {
            format!(
                "Could not measure {} from the tracked keypoints. Keep both hips and the rear foot in frame.",
                r.missing().unwrap_or_default()
            )
        },
    },
];

const BALANCED: InsightRule<WeightTransferReading> = InsightRule {
    key: "weight_transfer_solid",
    applies: |_| true,
    message: |_| {
        "Weight transfer is well sequenced: level, on time and connected through contact.".to_string()
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use swing_core::{segment_positional, Handedness, JointPosition, Keypoint, KeypointMap};

    /// Frames with hips centered at (x, y) and rear ankle height `ankle_y`
    fn run(points: &[(f64, f64, f64)], step_ms: f64) -> Vec<FrameRecord> {
        segment_positional(points.len())
            .into_iter()
            .zip(points)
            .enumerate()
            .map(|(i, (phase, &(x, y, ankle_y)))| {
                let mut joints = KeypointMap::new();
                let mut put = |kp: Keypoint, px: f64, py: f64| {
                    joints.insert(kp.name().to_string(), JointPosition::new(px, py, 0.9));
                };
                put(Keypoint::LeftHip, x - 10.0, y);
                put(Keypoint::RightHip, x + 10.0, y);
                // Right-handed hitter: rear ankle is the right ankle
                put(Keypoint::RightAnkle, x + 10.0, ankle_y);
                FrameRecord {
                    frame_index: i,
                    timestamp_ms: i as f64 * step_ms,
                    delta_ms: step_ms,
                    phase,
                    handedness: Handedness::Right,
                    joints,
                    angles: Vec::new(),
                    velocities: Vec::new(),
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_none() {
        assert!(weight_transfer(&[]).is_none());
    }

    #[test]
    fn test_rising_com_is_critical() {
        let ys = [300.0, 300.0, 300.0, 300.0, 300.0, 296.0, 292.0, 288.0, 284.0, 280.0];
        let points: Vec<_> = ys.iter().map(|&y| (200.0, y, 400.0)).collect();
        let frames = run(&points, 33.0);

        let m = WeightTransferScorer::default().measure(&frames).unwrap();
        let inches = m.vertical_movement_in.unwrap();
        assert_relative_eq!(inches, 20.0 / 100.0 * 39.37, epsilon = 1e-9);

        let (score, status) = score_vertical_movement(inches);
        assert_eq!(score, 25);
        assert!(status.starts_with("Critical"));

        let result = weight_transfer(&frames).unwrap();
        let vertical = result.sub_score(VERTICAL_MOVEMENT).unwrap();
        assert_eq!(vertical.score, 25);
    }

    #[test]
    fn test_timing_and_acceleration() {
        // 20 frames at 50 ms; contact is frame 15 (750 ms)
        let mut x = 200.0;
        let mut points = Vec::new();
        for i in 0..20 {
            let step = match i {
                0..=8 => 0.0,
                9..=11 => 5.0,
                12 => 20.0,
                _ => 2.0,
            };
            x += step;
            points.push((x, 300.0, 400.0));
        }
        let frames = run(&points, 50.0);
        let m = WeightTransferScorer::default().measure(&frames).unwrap();

        // Fastest interval ends at frame 12 (600 ms)
        assert_relative_eq!(m.timing_s.unwrap(), 0.15, epsilon = 1e-9);
        assert_eq!(score_timing(m.timing_s.unwrap()).0, 100);

        // Forward peak is centered on frame 11: 1.0 m/s -> 4.0 m/s across
        // 50 ms. The 4.0 -> 0.4 m/s braking at frame 12 is larger but backward.
        let peak = m.acceleration.unwrap();
        assert_relative_eq!(peak.magnitude, 60.0, epsilon = 1e-6);
        assert_relative_eq!(peak.seconds_before_contact, 0.20, epsilon = 1e-9);
        assert_eq!(score_acceleration(peak.magnitude, peak.seconds_before_contact).0, 100);
    }

    /// Hips accelerate 4/10/15/15 px per 50 ms frame, then stop dead at
    /// contact (frame 15). `dir` flips the image direction of travel.
    fn drive_then_plant(dir: f64) -> Vec<(f64, f64, f64)> {
        let mut x = 200.0;
        (0..20)
            .map(|i| {
                x += dir * match i {
                    11 => 4.0,
                    12 => 10.0,
                    13 | 14 => 15.0,
                    _ => 0.0,
                };
                (x, 300.0, 400.0)
            })
            .collect()
    }

    #[test]
    fn test_plant_braking_is_not_hip_drive() {
        let frames = run(&drive_then_plant(1.0), 50.0);
        let m = WeightTransferScorer::default().measure(&frames).unwrap();

        // 0.8 -> 2.0 m/s around frame 11; the -60 m/s² stop is ignored
        let peak = m.acceleration.unwrap();
        assert_relative_eq!(peak.magnitude, 24.0, epsilon = 1e-6);
        assert_relative_eq!(peak.seconds_before_contact, 0.20, epsilon = 1e-9);

        // Equal 3 m/s intervals end at frames 13 and 14; the earlier wins
        assert_relative_eq!(m.timing_s.unwrap(), 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_forward_follows_handedness() {
        let mut frames = run(&drive_then_plant(-1.0), 50.0);
        for f in &mut frames {
            f.handedness = Handedness::Left;
        }
        let m = WeightTransferScorer::default().measure(&frames).unwrap();
        let peak = m.acceleration.unwrap();
        assert_relative_eq!(peak.magnitude, 24.0, epsilon = 1e-6);
        assert_relative_eq!(m.timing_s.unwrap(), 0.10, epsilon = 1e-9);

        // Read as a right-handed hitter the drive is backward, so the stop at
        // frame 14 becomes the forward peak
        let backward = run(&drive_then_plant(-1.0), 50.0);
        let peak = WeightTransferScorer::default()
            .measure(&backward)
            .unwrap()
            .acceleration
            .unwrap();
        assert_relative_eq!(peak.magnitude, 60.0, epsilon = 1e-6);
        assert_relative_eq!(peak.seconds_before_contact, 0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_acceleration_table_is_two_dimensional() {
        assert_eq!(score_acceleration(10.0, 0.10).0, 100);
        // Same magnitude, poor timing
        assert_eq!(score_acceleration(10.0, 0.28).0, 70);
        assert_eq!(score_acceleration(10.0, 0.5).0, 50);
        assert_eq!(score_acceleration(1.0, 0.10).0, 25);
    }

    #[test]
    fn test_never_lifted_rear_foot_defaults_favorably() {
        let points: Vec<_> = (0..20).map(|_| (200.0, 300.0, 400.0)).collect();
        let frames = run(&points, 33.0);
        let m = WeightTransferScorer::default().measure(&frames).unwrap();
        assert_eq!(m.back_foot_lift_s, Some(0.10));
        assert_eq!(score_back_foot(0.10).0, 100);
    }

    #[test]
    fn test_early_rear_foot_lift() {
        // Rear ankle rises 32 px (about 8 inches) at frame 12, contact at 15
        let points: Vec<_> = (0..20)
            .map(|i| (200.0, 300.0, if i >= 12 { 368.0 } else { 400.0 }))
            .collect();
        let frames = run(&points, 50.0);
        let m = WeightTransferScorer::default().measure(&frames).unwrap();
        assert_relative_eq!(m.back_foot_lift_s.unwrap(), -0.15, epsilon = 1e-9);

        let score = weight_transfer(&frames).unwrap();
        assert_eq!(score.sub_score(BACK_FOOT).unwrap().score, 25);
    }

    #[test]
    fn test_missing_hips_are_no_data() {
        let mut frames = run(&[(200.0, 300.0, 400.0); 10], 33.0);
        for f in &mut frames {
            f.joints.remove(Keypoint::LeftHip.name());
        }
        let score = weight_transfer(&frames).unwrap();
        for name in [VERTICAL_MOVEMENT, TIMING, ACCELERATION] {
            let sub = score.sub_score(name).unwrap();
            assert_eq!(sub.score, 0);
            assert_eq!(sub.status, "No data");
        }
        // Rear ankle is still visible
        assert!(score.sub_score(BACK_FOOT).unwrap().has_data());
        assert_eq!(score.overall, 25);
        assert_eq!(score.insight.key, "weight_transfer_insufficient_data");
        assert!(score
            .insight
            .message
            .contains("vertical_movement, timing, acceleration"));
    }

    fn sub(name: &str, score: u8, measurement: f64, unit: Unit) -> SubScore {
        SubScore {
            name: name.to_string(),
            score,
            status: String::new(),
            measurement: Some(measurement),
            unit,
        }
    }

    #[test]
    fn test_insight_priority() {
        let mut reading = WeightTransferReading {
            vertical: sub(VERTICAL_MOVEMENT, 25, 8.0, Unit::Inches),
            timing: sub(TIMING, 25, 0.45, Unit::Seconds),
            back_foot: sub(BACK_FOOT, 50, -0.08, Unit::Seconds),
            acceleration: sub(ACCELERATION, 25, 1.0, Unit::MetersPerSecondSquared),
        };
        let key = |r: &WeightTransferReading| select_insight(&INSIGHT_RULES, r, &BALANCED).key;

        assert_eq!(key(&reading), "transfer_timing");
        reading.timing.score = 100;
        assert_eq!(key(&reading), "vertical_movement");
        reading.vertical.score = 85;
        assert_eq!(key(&reading), "back_foot");
        reading.back_foot.score = 70;
        assert_eq!(key(&reading), "hip_acceleration");
        reading.acceleration.score = 85;
        assert_eq!(key(&reading), "weight_transfer_solid");

        reading.acceleration = SubScore::no_data(ACCELERATION, Unit::MetersPerSecondSquared);
        assert_eq!(key(&reading), "weight_transfer_insufficient_data");
    }

    #[test]
    fn test_late_hip_drive_outranks_other_faults() {
        // 20 frames at 50 ms, contact at frame 15. Hips drop 30 px at frame 10
        // and only surge forward at frame 18, after contact.
        let mut x = 200.0;
        let points: Vec<_> = (0..20)
            .map(|i| {
                if i == 18 {
                    x += 20.0;
                }
                (x, if i >= 10 { 330.0 } else { 300.0 }, 400.0)
            })
            .collect();
        let score = weight_transfer(&run(&points, 50.0)).unwrap();

        assert_eq!(score.sub_score(VERTICAL_MOVEMENT).unwrap().score, 25);
        assert_eq!(score.sub_score(TIMING).unwrap().score, 25);
        assert_eq!(score.sub_score(ACCELERATION).unwrap().score, 50);
        assert_eq!(score.sub_score(BACK_FOOT).unwrap().score, 100);

        assert_eq!(score.insight.key, "transfer_timing");
        assert!(score.insight.message.contains("too late"));
    }
}
