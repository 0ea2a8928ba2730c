//! Utility functions for the refinement pipeline.
//!
//! Mask/image conversions, shape checks and logging setup.

pub mod logging;
pub mod mask;
pub mod validation;

pub use logging::init_tracing;
pub use mask::{MaskEncoding, labels_from_gray, labels_to_gray, mask_to_labels};
pub use validation::ensure_grid_matches_image;
