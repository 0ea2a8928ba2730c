//! Processing stages of the refinement pipeline.
//!
//! Each stage is a pure function over per-call grids:
//!
//! - [`size_gate`] - rejects images outside the accepted size range
//! - [`color`] - reduces input images to 8-bit RGB
//! - [`unary`] - per-pixel, per-label energies from coarse labels
//! - [`permutohedral`] - approximate high-dimensional Gaussian filtering
//! - [`pairwise`] - smoothness and appearance kernels
//! - [`mean_field`] - iterative marginal refinement
//! - [`skeleton`] - skeleton of the coarse foreground and its overlay
//! - [`mask_morphology`] - 3×3 closing of the refined grid

pub mod color;
pub mod mask_morphology;
pub mod mean_field;
pub mod pairwise;
pub mod permutohedral;
pub mod size_gate;
pub mod skeleton;
pub mod unary;

/// Per-pixel integer labels indexed `[y, x]`; label 0 is background.
pub type LabelGrid = ndarray::Array2<u32>;

pub use color::{drop_alpha, to_rgb};
pub use mask_morphology::close_labels;
pub use mean_field::{MarginalGrid, mean_field_inference};
pub use pairwise::{KernelKind, PairwiseKernel, build_pairwise_kernels};
pub use permutohedral::PermutohedralLattice;
pub use size_gate::{GateDecision, check_size, rejected_mask};
pub use skeleton::{foreground_mask, overlay_skeleton, skeletonize};
pub use unary::{num_labels, unary_from_labels};
