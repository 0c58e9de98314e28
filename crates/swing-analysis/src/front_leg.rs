//! Front-leg stability scoring.
//!
//! A stable front side stops the stride, braces the lead knee and lets the
//! body rotate around a firm post. Three measurements are combined:
//!
//! | Measurement | Source | Weight |
//! |-------------|--------|--------|
//! | Lead knee angle | contact frame | 0.40 |
//! | Lead ankle angle | contact frame | 0.30 |
//! | Lead ankle deceleration | stride/fire peak to plant | 0.30 |

use swing_core::{locate_contact_frame, AngleKind, FrameRecord, Joint, SwingPhase};

use crate::config::{FrontLegConfig, SegmentationConfig};
use crate::scoring::{
    missing_measurements, select_insight, weighted_score, Band, BandTable, Category,
    ComponentScore, InsightRule, SubScore, Unit,
};

pub const KNEE_ANGLE: &str = "knee_angle";
pub const ANKLE_ANGLE: &str = "ankle_angle";
pub const DECELERATION: &str = "deceleration";

const KNEE_WEIGHT: f64 = 0.40;
const ANKLE_WEIGHT: f64 = 0.30;
const DECELERATION_WEIGHT: f64 = 0.30;

/// Lead knee at contact, degrees. Locking out degrades faster than flexing.
pub const KNEE_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(145.0, 160.0, 100, "Elite - firm, braced front knee"),
        Band::new(135.0, 145.0, 85, "Good - slightly soft front knee"),
        Band::new(160.0, 167.0, 85, "Good - front knee nearly locked"),
        Band::new(120.0, 135.0, 70, "Developing - front knee too flexed"),
        Band::new(167.0, 173.0, 70, "Developing - front knee locking out"),
        Band::new(100.0, 120.0, 50, "Beginner - front knee collapsing"),
        Band::new(173.0, 178.0, 50, "Beginner - front knee hyperextending"),
    ],
    floor_score: 25,
    floor_status: "Critical - front leg not bracing",
};

/// Lead ankle at contact, degrees
pub const ANKLE_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(85.0, 100.0, 100, "Elite - stable, planted ankle"),
        Band::new(78.0, 85.0, 85, "Good - ankle slightly closed"),
        Band::new(100.0, 108.0, 85, "Good - ankle slightly open"),
        Band::new(70.0, 78.0, 70, "Developing - ankle rolling forward"),
        Band::new(108.0, 115.0, 70, "Developing - ankle rolling open"),
        Band::new(60.0, 70.0, 50, "Beginner - unstable ankle"),
        Band::new(115.0, 125.0, 50, "Beginner - ankle giving way"),
    ],
    floor_score: 25,
    floor_status: "Critical - no stable base at the ankle",
};

/// Lead ankle deceleration, m/s²
pub const DECELERATION_TABLE: BandTable = BandTable {
    bands: &[
        Band::new(15.0, f64::INFINITY, 100, "Elite - decisive front-foot plant"),
        Band::new(10.0, 15.0, 85, "Good - firm plant"),
        Band::new(6.0, 10.0, 70, "Developing - soft plant"),
        Band::new(3.0, 6.0, 50, "Beginner - drifting stride foot"),
    ],
    floor_score: 25,
    floor_status: "Critical - stride foot never stops",
};

pub fn score_knee_angle(degrees: f64) -> (u8, &'static str) {
    KNEE_TABLE.lookup(degrees)
}

pub fn score_ankle_angle(degrees: f64) -> (u8, &'static str) {
    ANKLE_TABLE.lookup(degrees)
}

pub fn score_deceleration(rate: f64) -> (u8, &'static str) {
    DECELERATION_TABLE.lookup(rate)
}

/// Scores front-leg stability over a completed frame sequence
#[derive(Debug, Clone, Default)]
pub struct FrontLegScorer {
    config: FrontLegConfig,
    segmentation: SegmentationConfig,
}

impl FrontLegScorer {
    pub fn new(config: FrontLegConfig, segmentation: SegmentationConfig) -> Self {
        Self {
            config,
            segmentation,
        }
    }

    /// `None` for an empty sequence
    pub fn score(&self, frames: &[FrameRecord]) -> Option<ComponentScore> {
        let contact = locate_contact_frame(frames, self.segmentation.contact_fallback_fraction)?;
        let contact_frame = &frames[contact];

        let knee = SubScore::from_table(
            KNEE_ANGLE,
            contact_frame.angle_degrees(AngleKind::LeadKnee),
            Unit::Degrees,
            &KNEE_TABLE,
        );
        let ankle = SubScore::from_table(
            ANKLE_ANGLE,
            contact_frame.angle_degrees(AngleKind::LeadAnkle),
            Unit::Degrees,
            &ANKLE_TABLE,
        );
        let deceleration = SubScore::from_table(
            DECELERATION,
            lead_ankle_deceleration(frames, self.config.stop_velocity_threshold),
            Unit::MetersPerSecondSquared,
            &DECELERATION_TABLE,
        );

        let overall = weighted_score(&[
            (knee.score, KNEE_WEIGHT),
            (ankle.score, ANKLE_WEIGHT),
            (deceleration.score, DECELERATION_WEIGHT),
        ]);

        let context = FrontLegReading {
            knee,
            ankle,
            deceleration,
        };
        let insight = select_insight(&INSIGHT_RULES, &context, &SOLID);

        tracing::debug!(
            contact_frame = contact,
            knee = context.knee.score,
            ankle = context.ankle.score,
            deceleration = context.deceleration.score,
            overall,
            "Front-leg stability scored"
        );

        Some(ComponentScore {
            overall,
            category: Category::from_score(overall),
            sub_scores: vec![context.knee, context.ankle, context.deceleration],
            insight,
        })
    }
}

/// Score with default configuration
pub fn front_leg_stability(frames: &[FrameRecord]) -> Option<ComponentScore> {
    FrontLegScorer::default().score(frames)
}

/// Deceleration of the lead ankle from its stride peak to the plant, m/s².
///
/// The peak is taken over `stride` and `fire` frames; the plant is the first
/// later frame whose speed drops below `stop_threshold`. Returns `None` when
/// either event is missing or no time elapses between them.
pub fn lead_ankle_deceleration(frames: &[FrameRecord], stop_threshold: f64) -> Option<f64> {
    let lead_speed = |frame: &FrameRecord| {
        frame
            .velocity(frame.lead(Joint::Ankle))
            .map(|v| v.speed)
    };

    let (peak_index, peak_speed) = frames
        .iter()
        .enumerate()
        .filter(|(_, f)| matches!(f.phase, SwingPhase::Stride | SwingPhase::Fire))
        .filter_map(|(i, f)| Some((i, lead_speed(f)?)))
        .fold(None, |best: Option<(usize, f64)>, (i, speed)| match best {
            Some((_, best_speed)) if best_speed >= speed => best,
            _ => Some((i, speed)),
        })?;

    let plant = frames[peak_index + 1..]
        .iter()
        .find(|f| lead_speed(f).is_some_and(|speed| speed < stop_threshold))?;

    let elapsed_s = (plant.timestamp_ms - frames[peak_index].timestamp_ms) / 1000.0;
    if elapsed_s <= 0.0 {
        return None;
    }

    Some(peak_speed / elapsed_s)
}

struct FrontLegReading {
    knee: SubScore,
    ankle: SubScore,
    deceleration: SubScore,
}

impl FrontLegReading {
    fn missing(&self) -> Option<String> {
        missing_measurements(&[&self.knee, &self.ankle, &self.deceleration])
    }
}

fn needs_work(sub: &SubScore) -> bool {
    sub.has_data() && sub.score < 70
}

const INSIGHT_RULES: [InsightRule<FrontLegReading>; 4] = [
    InsightRule {
        key: "front_knee",
        applies: |r| needs_work(&r.knee),
        message: |r| {
            let degrees = r.knee.measurement.unwrap_or_default();
            if degrees < 145.0 {
                format!(
                    "Lead knee collapses to {degrees:.0}° at contact. Brace the front leg so the hips can rotate around a firm post."
                )
            } else {
                format!(
                    "Lead knee locks out at {degrees:.0}° at contact. Keep a slight flex to absorb force without jamming the joint."
                )
            }
        },
    },
    InsightRule {
        key: "front_foot_plant",
        applies: |r| needs_work(&r.deceleration),
        message: |r| {
            format!(
                "Stride foot decelerates at only {:.1} m/s². Land the front foot decisively to stop forward drift and start rotation.",
                r.deceleration.measurement.unwrap_or_default()
            )
        },
    },
    InsightRule {
        key: "front_ankle",
        applies: |r| needs_work(&r.ankle),
        message: |r| {
            format!(
                "Lead ankle sits at {:.0}° at contact. A stable ankle keeps the front side from leaking energy.",
                r.ankle.measurement.unwrap_or_default()
            )
        },
    },
    InsightRule {
        key: "front_leg_insufficient_data",
        applies: |r| r.missing().is_some(),
        message: |r| {
            format!(
                "Could not measure {} from the tracked keypoints. Film the full lower body so the front leg can be assessed.",
                r.missing().unwrap_or_default()
            )
        },
    },
];

const SOLID: InsightRule<FrontLegReading> = InsightRule {
    key: "front_leg_solid",
    applies: |_| true,
    message: |_| {
        "Front-leg mechanics are solid: a braced knee, stable ankle and decisive plant.".to_string()
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use swing_core::{
        segment_positional, Handedness, JointAngle, JointVelocity, Keypoint, KeypointMap,
    };

    fn run(len: usize) -> Vec<FrameRecord> {
        segment_positional(len)
            .into_iter()
            .enumerate()
            .map(|(i, phase)| FrameRecord {
                frame_index: i,
                timestamp_ms: i as f64 * 50.0,
                delta_ms: 50.0,
                phase,
                handedness: Handedness::Right,
                joints: KeypointMap::new(),
                angles: Vec::new(),
                velocities: Vec::new(),
            })
            .collect()
    }

    fn lead_ankle(frame: &mut FrameRecord, speed: f64) {
        frame.velocities.push(JointVelocity {
            keypoint: Keypoint::LeftAnkle,
            speed,
            direction: Vector2::new(1.0, 0.0),
        });
    }

    #[test]
    fn test_knee_at_150_is_elite() {
        let (score, status) = score_knee_angle(150.0);
        assert_eq!(score, 100);
        assert!(status.contains("Elite"));
    }

    #[test]
    fn test_knee_table_is_asymmetric() {
        assert_eq!(score_knee_angle(140.0).0, 85);
        assert_eq!(score_knee_angle(165.0).0, 85);
        assert_eq!(score_knee_angle(130.0).0, 70);
        assert_eq!(score_knee_angle(170.0).0, 70);
        assert_eq!(score_knee_angle(110.0).0, 50);
        assert_eq!(score_knee_angle(176.0).0, 50);
        assert_eq!(score_knee_angle(90.0).0, 25);
        assert_eq!(score_knee_angle(400.0).0, 25);
    }

    #[test]
    fn test_empty_sequence_is_none() {
        assert!(front_leg_stability(&[]).is_none());
    }

    #[test]
    fn test_deceleration_from_peak_to_plant() {
        let mut frames = run(20);
        // Stride frames 7..=10, fire 11..=14
        lead_ankle(&mut frames[8], 1.5);
        lead_ankle(&mut frames[10], 2.4);
        lead_ankle(&mut frames[11], 1.0);
        lead_ankle(&mut frames[12], 0.5);
        lead_ankle(&mut frames[13], 0.1);

        // 2.4 m/s over 150 ms
        let rate = lead_ankle_deceleration(&frames, 0.2).unwrap();
        assert!((rate - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_deceleration_indeterminate_without_plant() {
        let mut frames = run(20);
        lead_ankle(&mut frames[8], 1.5);
        lead_ankle(&mut frames[9], 1.2);
        assert!(lead_ankle_deceleration(&frames, 0.2).is_none());
        assert!(lead_ankle_deceleration(&run(20), 0.2).is_none());
    }

    #[test]
    fn test_scores_and_insight_priority() {
        let mut frames = run(20);
        frames[15].angles.push(JointAngle::new(AngleKind::LeadKnee, 110.0));
        frames[15].angles.push(JointAngle::new(AngleKind::LeadAnkle, 65.0));

        let score = front_leg_stability(&frames).unwrap();
        assert_eq!(score.sub_score(KNEE_ANGLE).unwrap().score, 50);
        assert_eq!(score.sub_score(ANKLE_ANGLE).unwrap().score, 50);

        let decel = score.sub_score(DECELERATION).unwrap();
        assert_eq!(decel.score, 0);
        assert_eq!(decel.status, "No data");
        assert_eq!(decel.measurement, None);

        // 50*0.4 + 50*0.3 + 0
        assert_eq!(score.overall, 35);
        assert_eq!(score.category, Category::Critical);
        // Knee outranks the ankle
        assert_eq!(score.insight.key, "front_knee");
        assert!(score.insight.message.contains("110°"));
    }

    #[test]
    fn test_solid_front_leg() {
        let mut frames = run(20);
        frames[15].angles.push(JointAngle::new(AngleKind::LeadKnee, 152.0));
        frames[15].angles.push(JointAngle::new(AngleKind::LeadAnkle, 92.0));
        lead_ankle(&mut frames[10], 3.0);
        lead_ankle(&mut frames[12], 0.05);

        let score = front_leg_stability(&frames).unwrap();
        assert_eq!(score.overall, 100);
        assert_eq!(score.category, Category::Elite);
        assert_eq!(score.insight.key, "front_leg_solid");
        assert_eq!(front_leg_stability(&frames), Some(score));
    }

    #[test]
    fn test_unmeasured_leg_is_not_called_solid() {
        let score = front_leg_stability(&run(20)).unwrap();
        assert_eq!(score.overall, 0);
        assert_eq!(score.category, Category::Critical);
        assert_eq!(score.insight.key, "front_leg_insufficient_data");
        assert!(score.insight.message.contains("knee_angle, ankle_angle, deceleration"));

        // A measured problem still outranks missing data
        let mut frames = run(20);
        frames[15].angles.push(JointAngle::new(AngleKind::LeadKnee, 110.0));
        let score = front_leg_stability(&frames).unwrap();
        assert_eq!(score.insight.key, "front_knee");
    }
}
