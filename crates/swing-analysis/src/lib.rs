//! # Swing-Analysis
//!
//! Turns a pose sequence into a structured swing report.
//!
//! ## Pipeline
//!
//! 1. **Frame processing** - joint angles, joint velocities and a swing
//!    phase for every frame, with handedness fixed from the first frame
//! 2. **Run summary** - phase histogram, critical angles at key phases,
//!    peak velocities and danger-band anomalies
//! 3. **Component scores** - front-leg stability and weight transfer,
//!    each a weighted 0-100 blend of piecewise-scored measurements
//! 4. **Mechanics quality** - direction, timing and efficiency from scalar
//!    swing metrics, supplied by the caller or estimated from the frames
//!
//! ## Scores
//!
//! | Score           | Sub-scores (weight)                                         |
//! |-----------------|-------------------------------------------------------------|
//! | Front leg       | knee (0.40), ankle (0.30), deceleration (0.30)              |
//! | Weight transfer | vertical (0.25), timing (0.35), back foot (0.25), accel (0.15) |
//! | Mechanics       | direction (0.40), timing (0.35), efficiency (0.25)          |
//!
//! Scorers return `None` for an empty run. A measurement that cannot be
//! taken scores 0 with status "No data" rather than a fabricated value.

pub mod analyzer;
pub mod config;
pub mod estimation;
pub mod front_leg;
pub mod mechanics;
pub mod pipeline;
pub mod scoring;
pub mod summary;
pub mod weight_transfer;

pub use analyzer::*;
pub use crate::config::*;
pub use estimation::phase_duration_ms;
pub use front_leg::{front_leg_stability, lead_ankle_deceleration, FrontLegScorer};
pub use mechanics::*;
pub use pipeline::*;
pub use scoring::*;
pub use summary::*;
pub use weight_transfer::{
    weight_transfer, AccelerationPeak, WeightTransferMeasurements, WeightTransferScorer,
};
