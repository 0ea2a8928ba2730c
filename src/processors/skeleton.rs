//! Skeleton of the coarse foreground and its overlay onto a refined grid.
//!
//! Thinning peels the foreground one border direction at a time (north,
//! south, east, west). Candidates of a direction are collected first, then
//! removed one by one, each re-checked against the current grid: a pixel
//! goes only while it is a simple point (its 8-connectivity number is 1) and
//! not an end point. Components, holes and the extent of thin lines are
//! therefore kept. Pixels outside the grid count as background.

use super::LabelGrid;
use itertools::iproduct;
use ndarray::{Array2, ArrayView2, Zip};

/// Neighbor offsets `(dy, dx)`, counterclockwise from east.
const NEIGHBORS: [(isize, isize); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Border directions peeled by each pass: north, south, east, west.
const BORDERS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Foreground indicator of a label grid (`label != 0`).
pub fn foreground_mask(labels: ArrayView2<'_, u32>) -> Array2<bool> {
    labels.mapv(|l| l != 0)
}

/// Thins `mask` down to a one-pixel-wide, topology-preserving skeleton.
///
/// The result is a subset of `mask` with the same number of 8-connected
/// components; no component is ever removed entirely.
pub fn skeletonize(mask: &Array2<bool>) -> Array2<bool> {
    let mut skeleton = mask.clone();
    let (height, width) = skeleton.dim();
    let mut candidates = Vec::new();
    let mut passes = 0usize;

    loop {
        let mut changed = false;
        for (dy, dx) in BORDERS {
            candidates.clear();
            candidates.extend(iproduct!(0..height, 0..width).filter(|&(y, x)| {
                skeleton[[y, x]] && !is_set(&skeleton, y as isize + dy, x as isize + dx)
            }));
            for &(y, x) in &candidates {
                if is_removable(&skeleton, y, x) {
                    skeleton[[y, x]] = false;
                    changed = true;
                }
            }
        }
        passes += 1;
        if !changed {
            break;
        }
    }

    tracing::debug!(
        "Skeleton of {}x{} mask converged after {} passes",
        width,
        height,
        passes
    );
    skeleton
}

fn is_set(mask: &Array2<bool>, y: isize, x: isize) -> bool {
    let (height, width) = mask.dim();
    y >= 0
        && x >= 0
        && (y as usize) < height
        && (x as usize) < width
        && mask[[y as usize, x as usize]]
}

fn is_removable(mask: &Array2<bool>, y: usize, x: usize) -> bool {
    let p = NEIGHBORS.map(|(dy, dx)| is_set(mask, y as isize + dy, x as isize + dx));

    // End points and isolated pixels stay.
    if p.iter().filter(|&&v| v).count() < 2 {
        return false;
    }
    connectivity_number(&p) == 1
}

/// Yokoi 8-connectivity number of a pixel with neighbors `p`.
///
/// 0 for interior or isolated pixels, 1 for simple points, more when the
/// pixel joins several branches.
fn connectivity_number(p: &[bool; 8]) -> usize {
    let bg = p.map(|v| !v);
    [0, 2, 4, 6]
        .into_iter()
        .filter(|&k| bg[k] && !(bg[k + 1] && bg[(k + 2) % 8]))
        .count()
}

/// Forces the skeleton of `coarse`'s foreground into `refined`.
///
/// Every skeleton pixel takes its coarse label, whatever the refinement
/// decided there.
pub fn overlay_skeleton(refined: &mut LabelGrid, coarse: ArrayView2<'_, u32>) {
    let skeleton = skeletonize(&foreground_mask(coarse));
    Zip::from(refined)
        .and(&skeleton)
        .and(coarse)
        .for_each(|out, &on_skeleton, &label| {
            if on_skeleton {
                *out = label;
            }
        });
}
