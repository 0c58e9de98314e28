//! Swing phase segmentation.
//!
//! The baseline segmenter is purely positional: each phase owns a fixed slice
//! of the normalized sequence. It is imprecise but never undefined, so
//! scorers that need a specific event fall back to a nominal position inside
//! the phase's slice when no frame carries that phase.

use serde::{Deserialize, Serialize};

use crate::types::FrameRecord;

/// Ordered swing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Stance,
    Load,
    Stride,
    Fire,
    Contact,
    FollowThrough,
}

impl SwingPhase {
    pub const ALL: [SwingPhase; 6] = [
        SwingPhase::Stance,
        SwingPhase::Load,
        SwingPhase::Stride,
        SwingPhase::Fire,
        SwingPhase::Contact,
        SwingPhase::FollowThrough,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            SwingPhase::Stance => "stance",
            SwingPhase::Load => "load",
            SwingPhase::Stride => "stride",
            SwingPhase::Fire => "fire",
            SwingPhase::Contact => "contact",
            SwingPhase::FollowThrough => "follow_through",
        }
    }

    /// Normalized `[start, end)` slice of the sequence owned by this phase
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            SwingPhase::Stance => (0.0, 0.15),
            SwingPhase::Load => (0.15, 0.35),
            SwingPhase::Stride => (0.35, 0.55),
            SwingPhase::Fire => (0.55, 0.75),
            SwingPhase::Contact => (0.75, 0.85),
            SwingPhase::FollowThrough => (0.85, 1.0),
        }
    }

    /// Position used when no frame carries this phase: the slice midpoint
    pub fn nominal_fraction(&self) -> f64 {
        let (start, end) = self.bounds();
        (start + end) / 2.0
    }

    /// Phase of a normalized position in [0, 1]
    pub fn from_fraction(fraction: f64) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|phase| fraction < phase.bounds().1)
            .unwrap_or(SwingPhase::FollowThrough)
    }

    /// Positional phase of frame `index` in a sequence of `total` frames
    pub fn from_position(index: usize, total: usize) -> Self {
        if total == 0 {
            return SwingPhase::Stance;
        }
        Self::from_fraction(index as f64 / total as f64)
    }
}

impl std::fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Positional segmentation of a whole sequence
pub fn segment_positional(total: usize) -> Vec<SwingPhase> {
    (0..total)
        .map(|i| SwingPhase::from_position(i, total))
        .collect()
}

/// Frame index at `fraction` of the sequence, clamped to the last frame
pub fn percentile_index(len: usize, fraction: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (len as f64 * fraction.clamp(0.0, 1.0)).floor() as usize;
    Some(idx.min(len - 1))
}

/// First frame tagged `phase`, else the frame at `fallback_fraction`
pub fn locate_phase_frame(
    frames: &[FrameRecord],
    phase: SwingPhase,
    fallback_fraction: f64,
) -> Option<usize> {
    frames
        .iter()
        .position(|f| f.phase == phase)
        .or_else(|| percentile_index(frames.len(), fallback_fraction))
}

/// Contact frame, falling back to `fallback_fraction` of the sequence
pub fn locate_contact_frame(frames: &[FrameRecord], fallback_fraction: f64) -> Option<usize> {
    locate_phase_frame(frames, SwingPhase::Contact, fallback_fraction)
}
