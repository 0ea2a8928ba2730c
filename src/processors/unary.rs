//! Unary energies from a coarse label grid.
//!
//! Every pixel trusts its coarse label with probability `gt_prob` and spreads
//! the remaining mass uniformly over the other labels. The energy is the
//! negative log of that probability, so no label ever gets an infinite cost.

use crate::core::errors::{ProcessingStage, RefineError, RefineResult};
use ndarray::{Array3, ArrayView2, Zip};

/// Number of labels implied by a grid: `max + 1`, or 1 for an empty grid.
pub fn num_labels(labels: ArrayView2<'_, u32>) -> usize {
    labels.iter().copied().max().map_or(1, |max| max as usize + 1)
}

/// Builds the `(L, H, W)` energy grid for `labels`.
///
/// With a single label every energy is 0; the residual probability
/// `(1 - gt_prob) / (L - 1)` is never evaluated.
pub fn unary_from_labels(
    labels: ArrayView2<'_, u32>,
    num_labels: usize,
    gt_prob: f32,
) -> RefineResult<Array3<f32>> {
    if !(gt_prob > 0.0 && gt_prob < 1.0) {
        return Err(RefineError::invalid_field(
            "gt_prob",
            "a value in (0, 1)",
            gt_prob.to_string(),
        ));
    }
    if num_labels == 0 {
        return Err(RefineError::InvalidInput {
            message: "label count must be at least 1".to_string(),
        });
    }
    if let Some(&max) = labels.iter().max()
        && max as usize >= num_labels
    {
        return Err(RefineError::Processing {
            kind: ProcessingStage::UnaryPotential,
            context: format!("label {} out of range for {} labels", max, num_labels),
            source: None,
        });
    }

    let (height, width) = labels.dim();
    if num_labels == 1 {
        return Ok(Array3::zeros((1, height, width)));
    }

    let gt_prob = f64::from(gt_prob);
    let match_energy = -gt_prob.ln() as f32;
    let other_energy = -((1.0 - gt_prob) / (num_labels - 1) as f64).ln() as f32;

    let mut energy = Array3::from_elem((num_labels, height, width), other_energy);
    for (label, mut plane) in energy.outer_iter_mut().enumerate() {
        Zip::from(&mut plane).and(labels).for_each(|e, &l| {
            if l as usize == label {
                *e = match_energy;
            }
        });
    }

    tracing::debug!(
        "Unary energies for {}x{} grid, {} labels (match {:.4}, other {:.4})",
        width,
        height,
        num_labels,
        match_energy,
        other_energy
    );

    Ok(energy)
}
