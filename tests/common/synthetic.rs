//! Synthetic images and label grids for pipeline tests.

use image::{Rgb, RgbImage};
use mask_refine::LabelGrid;

pub const BACKGROUND: Rgb<u8> = Rgb([30, 40, 50]);
pub const OBJECT: Rgb<u8> = Rgb([210, 190, 60]);

/// A disc of `OBJECT` color centered in a `BACKGROUND` image.
pub fn disc_image(width: u32, height: u32, radius: f32) -> RgbImage {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    RgbImage::from_fn(width, height, |x, y| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= radius * radius {
            OBJECT
        } else {
            BACKGROUND
        }
    })
}

/// Labels of a disc with `label`, offset by `shift` pixels to the right.
pub fn disc_labels(width: u32, height: u32, radius: f32, shift: f32, label: u32) -> LabelGrid {
    let (cx, cy) = (width as f32 / 2.0 + shift, height as f32 / 2.0);
    LabelGrid::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= radius * radius {
            label
        } else {
            0
        }
    })
}
