//! Mean-field inference for the dense pairwise field.
//!
//! Marginals start at `softmax(-U)`. Each iteration filters the current
//! marginals through every pairwise kernel, adds the weighted messages to the
//! negated unary energies and renormalizes:
//!
//! ```text
//! Q⁺ = softmax(-U + Σ_k w_k · K̃_k(Q))
//! ```
//!
//! The iteration count is fixed; convergence is never checked.

use super::LabelGrid;
use super::pairwise::PairwiseKernel;
use crate::core::errors::{ProcessingStage, RefineError, RefineResult};
use ndarray::{Array2, Array3, ArrayView3, ArrayViewMut1, Axis, Zip};

/// Per-pixel label marginals of one inference run.
///
/// Stored pixel-major (`N × L`) so each pixel's distribution is contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalGrid {
    q: Array2<f32>,
    height: usize,
    width: usize,
}

impl MarginalGrid {
    /// Initial marginals `softmax(-U)` for an `(L, H, W)` energy grid.
    pub fn from_unary(unary: ArrayView3<'_, f32>) -> Self {
        let (height, width) = (unary.len_of(Axis(1)), unary.len_of(Axis(2)));
        let mut q = negated_pixel_major(unary);
        softmax_rows(&mut q);
        Self { q, height, width }
    }

    /// Number of labels.
    pub fn num_labels(&self) -> usize {
        self.q.ncols()
    }

    /// Grid dimensions as `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Marginals as an `(L, H, W)` grid.
    pub fn probabilities(&self) -> Array3<f32> {
        let width = self.width;
        Array3::from_shape_fn((self.num_labels(), self.height, width), |(l, y, x)| {
            self.q[[y * width + x, l]]
        })
    }

    /// Most probable label per pixel; ties resolve to the lowest label.
    pub fn map_labels(&self) -> LabelGrid {
        let width = self.width;
        LabelGrid::from_shape_fn((self.height, width), |(y, x)| {
            let row = self.q.row(y * width + x);
            let mut best = 0usize;
            for (label, &p) in row.iter().enumerate().skip(1) {
                if p > row[best] {
                    best = label;
                }
            }
            best as u32
        })
    }
}

/// Runs `num_iter` mean-field iterations and returns the final marginals.
pub fn mean_field_inference(
    unary: ArrayView3<'_, f32>,
    kernels: &[PairwiseKernel],
    num_iter: usize,
) -> RefineResult<MarginalGrid> {
    let num_pixels = unary.len_of(Axis(1)) * unary.len_of(Axis(2));
    if unary.iter().any(|e| !e.is_finite()) {
        return Err(RefineError::processing(
            ProcessingStage::MeanField,
            "unary energies must be finite",
        ));
    }

    if let Some(kernel) = kernels.iter().find(|k| k.num_pixels() != num_pixels) {
        return Err(RefineError::processing(
            ProcessingStage::PairwisePotential,
            format!(
                "{:?} kernel built for {} pixels, grid has {}",
                kernel.kind(),
                kernel.num_pixels(),
                num_pixels
            ),
        ));
    }

    let neg_unary = negated_pixel_major(unary);
    let mut marginals = MarginalGrid::from_unary(unary);

    for iteration in 0..num_iter {
        let mut logits = neg_unary.clone();
        for kernel in kernels {
            if kernel.weight() == 0.0 {
                continue;
            }
            let message = kernel.message(marginals.q.view());
            logits.scaled_add(kernel.weight(), &message);
        }

        if logits.iter().any(|v| !v.is_finite()) {
            return Err(RefineError::processing(
                ProcessingStage::MeanField,
                format!("non-finite logits at iteration {}", iteration),
            ));
        }

        softmax_rows(&mut logits);
        marginals.q = logits;
        tracing::debug!("Mean-field iteration {}/{} done", iteration + 1, num_iter);
    }

    Ok(marginals)
}

/// `-U` rearranged from `(L, H, W)` to `(H·W, L)`.
fn negated_pixel_major(unary: ArrayView3<'_, f32>) -> Array2<f32> {
    let (labels, height, width) = unary.dim();
    Array2::from_shape_fn((height * width, labels), |(i, l)| {
        -unary[[l, i / width, i % width]]
    })
}

/// In-place softmax of every row, shifted by the row maximum.
fn softmax_rows(values: &mut Array2<f32>) {
    Zip::from(values.rows_mut()).par_for_each(softmax_in_place);
}

fn softmax_in_place(mut row: ArrayViewMut1<'_, f32>) {
    let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    row.mapv_inplace(|v| (v - max).exp());
    // The maximum contributes exp(0) = 1, so the sum is at least 1.
    let sum = row.sum();
    row.mapv_inplace(|v| v / sum);
}
