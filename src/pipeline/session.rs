//! Sessions binding external models to the refinement pipeline.

use super::refiner::MaskRefiner;
use crate::core::config::RefineConfig;
use crate::core::errors::{RefineError, RefineResult};
use crate::core::traits::{PromptSegmenter, Prompts, SegmentationModel};
use crate::processors::{GateDecision, LabelGrid, check_size, rejected_mask, to_rgb};
use crate::utils::ensure_grid_matches_image;
use image::DynamicImage;
use ndarray::Array2;
use std::sync::Arc;

/// Semantic segmentation followed by refinement.
///
/// The model is shared immutably; cloning the session is cheap.
#[derive(Debug, Clone)]
pub struct SegmentationSession {
    model: Arc<dyn SegmentationModel>,
    refiner: MaskRefiner,
}

impl SegmentationSession {
    /// Creates a session around an already loaded model.
    pub fn new(model: Arc<dyn SegmentationModel>, config: RefineConfig) -> RefineResult<Self> {
        Ok(Self {
            model,
            refiner: MaskRefiner::new(config)?,
        })
    }

    /// The refiner applied to model outputs.
    pub fn refiner(&self) -> &MaskRefiner {
        &self.refiner
    }

    /// Segments and refines `image` using the configured `do_crf` flag.
    pub fn infer(&self, image: &DynamicImage) -> RefineResult<LabelGrid> {
        self.infer_with_crf(image, self.refiner.config().do_crf)
    }

    /// Segments `image` and refines the result when `do_crf` is set.
    ///
    /// Images outside the size limits are answered with an all-zero grid
    /// without invoking the model.
    pub fn infer_with_crf(&self, image: &DynamicImage, do_crf: bool) -> RefineResult<LabelGrid> {
        let (width, height) = (image.width(), image.height());
        if check_size(width, height, &self.refiner.config().size_limits) == GateDecision::Reject {
            return Ok(rejected_mask(width, height));
        }

        let rgb = to_rgb(image);
        let coarse = self
            .model
            .segment(&rgb)
            .map_err(|e| RefineError::model_error(self.model.name(), "segmentation failed", e))?;
        ensure_grid_matches_image("model output", width, height, coarse.dim())?;

        tracing::debug!(
            model = self.model.name(),
            "Segmented {}x{} image, refining (do_crf = {})",
            width,
            height,
            do_crf
        );
        self.refiner.refine_accepted(&rgb, coarse.view(), do_crf)
    }
}

/// A prompt-driven model bound to the image it is currently looking at.
#[derive(Debug)]
pub struct InteractiveSession {
    model: Box<dyn PromptSegmenter>,
    image_size: Option<(u32, u32)>,
}

impl InteractiveSession {
    /// Wraps a model; no image is set yet.
    pub fn new(model: Box<dyn PromptSegmenter>) -> Self {
        Self {
            model,
            image_size: None,
        }
    }

    /// Name of the wrapped model.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// `(width, height)` of the current image, if one is set.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// Hands `image`, reduced to RGB, to the model.
    ///
    /// On failure the previous image is forgotten.
    pub fn set_image(&mut self, image: &DynamicImage) -> RefineResult<()> {
        self.image_size = None;
        let rgb = to_rgb(image);
        self.model
            .set_image(&rgb)
            .map_err(|e| RefineError::model_error(self.model.name(), "set_image failed", e))?;
        self.image_size = Some(rgb.dimensions());
        tracing::debug!(
            "{} ready for prompts on {}x{} image",
            self.model.name(),
            rgb.width(),
            rgb.height()
        );
        Ok(())
    }

    /// Evaluates `prompts` on the current image.
    ///
    /// # Errors
    ///
    /// [`RefineError::InvalidInput`] when no image is set, when `prompts` is
    /// empty or reaches outside the image; [`RefineError::ShapeMismatch`] when
    /// the model returns a mask of the wrong size.
    pub fn predict(&self, prompts: &Prompts) -> RefineResult<Array2<bool>> {
        let (width, height) = self.image_size.ok_or_else(|| RefineError::InvalidInput {
            message: "no image set for prompt prediction".to_string(),
        })?;
        if prompts.is_empty() {
            return Err(RefineError::InvalidInput {
                message: "at least one point or a box is required".to_string(),
            });
        }
        prompts
            .validate_bounds(width, height)
            .map_err(|message| RefineError::InvalidInput { message })?;

        let mask = self
            .model
            .predict(prompts)
            .map_err(|e| RefineError::model_error(self.model.name(), "prompt prediction failed", e))?;
        ensure_grid_matches_image("prompt mask", width, height, mask.dim())?;
        Ok(mask)
    }
}
