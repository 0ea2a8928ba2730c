//! # mask-refine
//!
//! Refines the coarse label grid produced by a semantic segmentation network
//! into a boundary-accurate mask.
//!
//! The refinement runs a fully-connected pairwise random field over the image
//! (mean-field inference with Gaussian kernels evaluated on a permutohedral
//! lattice), then forces the skeleton of the coarse foreground back into the
//! result and closes small holes with a 3×3 structuring element.
//!
//! ```no_run
//! use mask_refine::{MaskRefiner, RefineConfig};
//! use ndarray::Array2;
//!
//! # fn main() -> Result<(), mask_refine::RefineError> {
//! let image = image::DynamicImage::new_rgb8(128, 96);
//! let coarse: Array2<u32> = Array2::zeros((96, 128));
//!
//! let refiner = MaskRefiner::new(RefineConfig::default())?;
//! let mask = refiner.refine(&image, coarse.view())?;
//! assert_eq!(mask.dim(), (96, 128));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use crate::core::config::{
    BilateralKernelConfig, ConfigError, ConfigValidator, GaussianKernelConfig, PairwiseConfig,
    ParallelPolicy, PromptModelConfig, RefineConfig, SizeLimits,
};
pub use crate::core::errors::{ProcessingStage, RefineError, RefineResult};
pub use crate::core::registry::{PromptModelRegistry, PromptModelVariant};
pub use crate::core::traits::{BoxPrompt, PointPrompt, PromptSegmenter, Prompts, SegmentationModel};
pub use crate::pipeline::{InteractiveSession, MaskRefiner, SegmentationSession, apply_dense_crf};
pub use crate::processors::LabelGrid;
