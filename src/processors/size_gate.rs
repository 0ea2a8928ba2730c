//! Rejects images whose dimensions fall outside the accepted range.
//!
//! A rejected image is not an error: the pipeline answers with an all-zero
//! mask of the image's shape and skips every later stage.

use super::LabelGrid;
use crate::core::config::SizeLimits;

/// Outcome of the size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Dimensions are within limits; continue processing.
    Accept,
    /// Dimensions are outside limits; answer with a zero mask.
    Reject,
}

/// Checks `width`×`height` against `limits`.
pub fn check_size(width: u32, height: u32, limits: &SizeLimits) -> GateDecision {
    if limits.accepts(width, height) {
        GateDecision::Accept
    } else {
        tracing::warn!(
            "Image {}x{} outside accepted range [{}, {}], returning empty mask",
            width,
            height,
            limits.min_side,
            limits.max_side
        );
        GateDecision::Reject
    }
}

/// The mask returned for a rejected image: all background, shape `(height, width)`.
pub fn rejected_mask(width: u32, height: u32) -> LabelGrid {
    LabelGrid::zeros((height as usize, width as usize))
}
