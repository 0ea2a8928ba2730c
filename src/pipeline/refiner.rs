//! The mask refinement entry point.

use crate::core::config::{ConfigValidator, RefineConfig};
use crate::core::errors::RefineResult;
use crate::processors::{
    GateDecision, LabelGrid, build_pairwise_kernels, check_size, close_labels,
    mean_field_inference, num_labels, overlay_skeleton, rejected_mask, to_rgb, unary_from_labels,
};
use crate::utils::ensure_grid_matches_image;
use image::{DynamicImage, RgbImage};
use ndarray::ArrayView2;
use std::time::Instant;

/// Runs the dense field over `image` with `coarse` as the unary evidence and
/// returns the most probable label of every pixel.
///
/// A grid with a single label is returned unchanged.
///
/// # Errors
///
/// Fails when `coarse` does not cover `image`, or when inference produces
/// non-finite values.
pub fn apply_dense_crf(
    image: &RgbImage,
    coarse: ArrayView2<'_, u32>,
    config: &RefineConfig,
) -> RefineResult<LabelGrid> {
    ensure_grid_matches_image("coarse labels", image.width(), image.height(), coarse.dim())?;

    let labels = num_labels(coarse);
    if labels == 1 {
        tracing::debug!("Single-label grid, skipping inference");
        return Ok(coarse.to_owned());
    }

    let unary = unary_from_labels(coarse, labels, config.gt_prob)?;
    let kernels = build_pairwise_kernels(image, &config.pairwise);
    let marginals = mean_field_inference(unary.view(), &kernels, config.num_iter)?;
    Ok(marginals.map_labels())
}

/// Refines coarse label grids against their source images.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of calls, including concurrent ones.
#[derive(Debug, Clone)]
pub struct MaskRefiner {
    config: RefineConfig,
}

impl MaskRefiner {
    /// Creates a refiner after validating `config`.
    pub fn new(config: RefineConfig) -> RefineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Refines `coarse` using the configured `do_crf` flag.
    pub fn refine(
        &self,
        image: &DynamicImage,
        coarse: ArrayView2<'_, u32>,
    ) -> RefineResult<LabelGrid> {
        self.refine_with(image, coarse, self.config.do_crf)
    }

    /// Refines `coarse`, overriding the configured `do_crf` flag.
    ///
    /// Images outside the size limits yield an all-zero grid of the image's
    /// shape. With `do_crf = false` an accepted image yields `coarse`
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RefineError::ShapeMismatch`](crate::RefineError::ShapeMismatch)
    /// when `coarse` is not `height × width`.
    pub fn refine_with(
        &self,
        image: &DynamicImage,
        coarse: ArrayView2<'_, u32>,
        do_crf: bool,
    ) -> RefineResult<LabelGrid> {
        let (width, height) = (image.width(), image.height());
        ensure_grid_matches_image("coarse labels", width, height, coarse.dim())?;

        if check_size(width, height, &self.config.size_limits) == GateDecision::Reject {
            return Ok(rejected_mask(width, height));
        }

        self.refine_accepted(&to_rgb(image), coarse, do_crf)
    }

    /// Everything after the size gate, for an image already reduced to RGB.
    pub(crate) fn refine_accepted(
        &self,
        image: &RgbImage,
        coarse: ArrayView2<'_, u32>,
        do_crf: bool,
    ) -> RefineResult<LabelGrid> {
        if !do_crf {
            return Ok(coarse.to_owned());
        }

        let start = Instant::now();
        let mut refined = apply_dense_crf(image, coarse, &self.config)?;
        let inference_time = start.elapsed();

        overlay_skeleton(&mut refined, coarse);
        let closed = close_labels(&refined);

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            iterations = self.config.num_iter,
            "Refined mask in {:?} (inference {:?})",
            start.elapsed(),
            inference_time
        );

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::RefineError;
    use image::{Rgb, Rgba, RgbaImage};
    use ndarray::s;

    fn two_tone(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([20, 30, 40])
            } else {
                Rgb([220, 210, 200])
            }
        })
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RefineConfig::default().with_gt_prob(1.0);
        assert!(matches!(
            MaskRefiner::new(config),
            Err(RefineError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_gated_image_returns_zeros() {
        let refiner = MaskRefiner::new(RefineConfig::default()).unwrap();
        let image = DynamicImage::ImageRgb8(two_tone(40, 60));
        let coarse = LabelGrid::ones((60, 40));
        let mask = refiner.refine(&image, coarse.view()).unwrap();
        assert_eq!(mask.dim(), (60, 40));
        assert!(mask.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let refiner = MaskRefiner::new(RefineConfig::default()).unwrap();
        let image = DynamicImage::ImageRgb8(two_tone(60, 60));
        let coarse = LabelGrid::zeros((60, 61));
        assert!(matches!(
            refiner.refine(&image, coarse.view()),
            Err(RefineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_without_crf_returns_coarse() {
        let refiner = MaskRefiner::new(RefineConfig::default().with_crf(false)).unwrap();
        let image = DynamicImage::ImageRgb8(two_tone(64, 64));
        let coarse = LabelGrid::from_shape_fn((64, 64), |(y, x)| ((x * 7 + y * 3) % 4) as u32);
        assert_eq!(refiner.refine(&image, coarse.view()).unwrap(), coarse);
    }

    #[test]
    fn test_single_label_is_unchanged_by_inference() {
        let image = two_tone(50, 50);
        let coarse = LabelGrid::from_elem((50, 50), 0);
        let out = apply_dense_crf(&image, coarse.view(), &RefineConfig::default()).unwrap();
        assert_eq!(out, coarse);
    }

    #[test]
    fn test_labels_follow_color_edge() {
        let image = two_tone(64, 64);
        // Coarse boundary sits four columns left of the color edge.
        let mut coarse = LabelGrid::zeros((64, 64));
        coarse.slice_mut(s![.., 28..]).fill(1);

        let out = apply_dense_crf(&image, coarse.view(), &RefineConfig::default()).unwrap();
        for y in [10, 32, 50] {
            assert_eq!(out[[y, 5]], 0);
            assert_eq!(out[[y, 60]], 1);
        }
        let moved = (28..32).filter(|&x| out[[32, x]] == 0).count();
        assert!(moved > 0, "boundary did not move toward the color edge");
    }

    #[test]
    fn test_rgba_matches_rgb() {
        let rgb = two_tone(56, 52);
        let rgba = RgbaImage::from_fn(56, 52, |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            Rgba([r, g, b, 255])
        });
        let mut coarse = LabelGrid::zeros((52, 56));
        coarse.slice_mut(s![10..40, 20..45]).fill(1);

        let refiner = MaskRefiner::new(RefineConfig::default()).unwrap();
        let from_rgb = refiner
            .refine(&DynamicImage::ImageRgb8(rgb), coarse.view())
            .unwrap();
        let from_rgba = refiner
            .refine(&DynamicImage::ImageRgba8(rgba), coarse.view())
            .unwrap();
        assert_eq!(from_rgb, from_rgba);
    }
}
