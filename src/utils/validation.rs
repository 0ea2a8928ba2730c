//! Shape checks shared by the pipeline entry points.

use crate::core::errors::{RefineError, RefineResult};

/// Checks that a `(rows, cols)` grid covers a `width`×`height` image.
///
/// ```rust
/// # use mask_refine::utils::ensure_grid_matches_image;
/// assert!(ensure_grid_matches_image("labels", 64, 48, (48, 64)).is_ok());
/// assert!(ensure_grid_matches_image("labels", 64, 48, (64, 48)).is_err());
/// ```
pub fn ensure_grid_matches_image(
    context: &str,
    width: u32,
    height: u32,
    grid_dim: (usize, usize),
) -> RefineResult<()> {
    let expected = (height as usize, width as usize);
    if grid_dim != expected {
        return Err(RefineError::shape_mismatch(context, expected, grid_dim));
    }
    Ok(())
}
