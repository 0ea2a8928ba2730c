//! Morphological closing of a label grid.
//!
//! Closing operates on the foreground indicator with a 3×3 square. Pixels
//! beyond the image edge never count as background, so shapes touching the
//! border are not eaten away. Pixels the closing adds to the foreground take
//! the most frequent non-zero label around them.

use super::LabelGrid;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use itertools::Itertools;

/// Label given to a filled pixel with no labeled neighbor.
const FALLBACK_LABEL: u32 = 1;

/// Foreground of `labels` as a 0/255 grayscale image.
fn foreground_image(labels: &LabelGrid) -> GrayImage {
    let (height, width) = labels.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        if labels[[y as usize, x as usize]] != 0 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Most frequent non-zero label in the 3×3 window around `(y, x)`; ties go
/// to the lowest label.
fn majority_label(labels: &LabelGrid, y: usize, x: usize) -> u32 {
    let (height, width) = labels.dim();
    let rows = y.saturating_sub(1)..(y + 2).min(height);
    let cols = x.saturating_sub(1)..(x + 2).min(width);

    rows.cartesian_product(cols)
        .map(|(ny, nx)| labels[[ny, nx]])
        .filter(|&l| l != 0)
        .counts()
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map_or(FALLBACK_LABEL, |(label, _)| label)
}

/// Closes `labels` with a 3×3 square structuring element.
///
/// The result is a superset of the input foreground, and closing it again
/// changes nothing.
pub fn close_labels(labels: &LabelGrid) -> LabelGrid {
    let closed = morphology::close(&foreground_image(labels), Norm::LInf, 1);

    let mut out = labels.clone();
    let mut filled = 0usize;
    for (x, y, pixel) in closed.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        if pixel[0] != 0 && labels[[y, x]] == 0 {
            out[[y, x]] = majority_label(labels, y, x);
            filled += 1;
        }
    }

    tracing::debug!("Closing filled {} pixels", filled);
    out
}
