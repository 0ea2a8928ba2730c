//! Pairwise kernels of the dense field.
//!
//! Two Gaussian kernels couple every pair of pixels:
//! - a smoothness kernel over pixel position only, and
//! - an appearance kernel over position and color.
//!
//! Both use symmetric normalization: with `n_i = 1 / sqrt(Σ_j k(i, j))`, the
//! message for a signal `Q` is `n ⊙ K(n ⊙ Q)`. Each kernel carries a Potts
//! compatibility weight that scales its message before it enters the logits.

use super::permutohedral::PermutohedralLattice;
use crate::core::config::{BilateralKernelConfig, GaussianKernelConfig, PairwiseConfig};
use image::RgbImage;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Which kernel a [`PairwiseKernel`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// Position-only kernel.
    Smoothness,
    /// Position and color kernel.
    Appearance,
}

/// Row-major `(x, y)` position features divided by `scale`.
///
/// Rows follow pixel order `y * width + x`.
pub fn gaussian_features(width: u32, height: u32, scale: f32) -> Array2<f32> {
    let width = width as usize;
    let height = height as usize;
    Array2::from_shape_fn((width * height, 2), |(i, c)| {
        let coord = if c == 0 { i % width } else { i / width };
        coord as f32 / scale
    })
}

/// Row-major `(x, y, r, g, b)` features, position divided by
/// `spatial_scale` and color divided by `color_scale`.
pub fn bilateral_features(image: &RgbImage, spatial_scale: f32, color_scale: f32) -> Array2<f32> {
    let width = image.width() as usize;
    let mut features = Array2::zeros((width * image.height() as usize, 5));
    for (i, mut row) in features.outer_iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let pixel = image.get_pixel(x as u32, y as u32);
        row[0] = x as f32 / spatial_scale;
        row[1] = y as f32 / spatial_scale;
        row[2] = f32::from(pixel[0]) / color_scale;
        row[3] = f32::from(pixel[1]) / color_scale;
        row[4] = f32::from(pixel[2]) / color_scale;
    }
    features
}

/// A normalized Gaussian kernel with its compatibility weight.
#[derive(Debug, Clone)]
pub struct PairwiseKernel {
    kind: KernelKind,
    weight: f32,
    lattice: PermutohedralLattice,
    norm: Array1<f32>,
}

impl PairwiseKernel {
    /// Builds a kernel over `features` (one row per pixel).
    pub fn new(kind: KernelKind, features: ArrayView2<'_, f32>, weight: f32) -> Self {
        let lattice = PermutohedralLattice::new(features);
        let ones = Array2::<f32>::ones((features.nrows(), 1));
        let norm = lattice
            .compute(ones.view())
            .index_axis_move(Axis(1), 0)
            .mapv_into(|v| 1.0 / (v + 1e-20).sqrt());

        Self {
            kind,
            weight,
            lattice,
            norm,
        }
    }

    /// Smoothness kernel for a `width`×`height` image.
    pub fn smoothness(width: u32, height: u32, config: &GaussianKernelConfig) -> Self {
        let features = gaussian_features(width, height, config.spatial_scale);
        Self::new(KernelKind::Smoothness, features.view(), config.weight)
    }

    /// Appearance kernel for `image`.
    pub fn appearance(image: &RgbImage, config: &BilateralKernelConfig) -> Self {
        let features = bilateral_features(image, config.spatial_scale, config.color_scale);
        Self::new(KernelKind::Appearance, features.view(), config.weight)
    }

    /// Kernel kind.
    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// Potts compatibility weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Number of pixels the kernel was built for.
    pub fn num_pixels(&self) -> usize {
        self.lattice.num_points()
    }

    /// Normalized message for `q`, an `N × L` matrix of marginals.
    pub fn message(&self, q: ArrayView2<'_, f32>) -> Array2<f32> {
        let norm = self.norm.view().insert_axis(Axis(1));
        let scaled = &q * &norm;
        let mut filtered = self.lattice.compute(scaled.view());
        filtered *= &norm;
        filtered
    }
}

/// Builds the smoothness and appearance kernels for `image`.
pub fn build_pairwise_kernels(image: &RgbImage, config: &PairwiseConfig) -> Vec<PairwiseKernel> {
    vec![
        PairwiseKernel::smoothness(image.width(), image.height(), &config.smoothness),
        PairwiseKernel::appearance(image, &config.appearance),
    ]
}
