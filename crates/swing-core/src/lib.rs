//! # Swing-Core
//!
//! Core types and kinematics for biomechanical swing analysis: joint
//! geometry on 2-D pose keypoints, frame records and swing phase
//! segmentation.

pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod phase;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use kinematics::*;
pub use phase::*;
pub use types::*;
