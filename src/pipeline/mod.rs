//! The refinement pipeline and the sessions that feed it.
//!
//! [`MaskRefiner`] turns an (image, coarse labels) pair into a refined mask:
//! size gate, color normalization, dense field inference, skeleton overlay
//! and closing. [`SegmentationSession`] and [`InteractiveSession`] bind the
//! external models to it.

mod refiner;
mod session;

pub use refiner::{MaskRefiner, apply_dense_crf};
pub use session::{InteractiveSession, SegmentationSession};
