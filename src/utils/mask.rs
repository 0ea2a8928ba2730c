//! Conversions between label grids, boolean masks and grayscale images.

use crate::core::errors::{RefineError, RefineResult};
use crate::processors::LabelGrid;
use image::{GrayImage, Luma};
use ndarray::Array2;

/// How labels map to 8-bit gray levels, in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaskEncoding {
    /// Background 0, any foreground label 255. Any non-zero level reads
    /// back as label 1.
    #[default]
    Binary,
    /// Gray level equals label; labels above 255 cannot be written.
    Raw,
}

/// Reads a label grid from a grayscale image.
///
/// A 0/255 mask read with [`MaskEncoding::Binary`] yields labels 0 and 1,
/// not 0 and 255.
pub fn labels_from_gray(image: &GrayImage, encoding: MaskEncoding) -> LabelGrid {
    let (width, height) = image.dimensions();
    LabelGrid::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let level = image.get_pixel(x as u32, y as u32)[0];
        match encoding {
            MaskEncoding::Binary => u32::from(level != 0),
            MaskEncoding::Raw => u32::from(level),
        }
    })
}

/// Writes `labels` into a grayscale image.
pub fn labels_to_gray(labels: &LabelGrid, encoding: MaskEncoding) -> RefineResult<GrayImage> {
    if encoding == MaskEncoding::Raw
        && let Some(&max) = labels.iter().max()
        && max > u32::from(u8::MAX)
    {
        return Err(RefineError::InvalidInput {
            message: format!("label {} does not fit in an 8-bit image", max),
        });
    }

    let (height, width) = labels.dim();
    Ok(GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let label = labels[[y as usize, x as usize]];
        let value = match encoding {
            MaskEncoding::Binary if label != 0 => u8::MAX,
            MaskEncoding::Binary => 0,
            MaskEncoding::Raw => label as u8,
        };
        Luma([value])
    }))
}

/// Converts an object mask into a binary label grid (`true` becomes 1).
pub fn mask_to_labels(mask: &Array2<bool>) -> LabelGrid {
    mask.mapv(u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_gray_round_trip_keeps_labels() {
        let labels = array![[0u32, 1, 2], [7, 0, 255]];
        let gray = labels_to_gray(&labels, MaskEncoding::Raw).unwrap();
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(labels_from_gray(&gray, MaskEncoding::Raw), labels);
    }

    #[test]
    fn test_binary_mask_reads_back_as_two_labels() {
        let labels = array![[0u32, 1, 1], [0, 0, 1]];
        let gray = labels_to_gray(&labels, MaskEncoding::Binary).unwrap();
        let read = labels_from_gray(&gray, MaskEncoding::Binary);
        assert_eq!(read, labels);
        assert_eq!(crate::processors::num_labels(read.view()), 2);

        // Anti-aliased or 0/1 masks still read as binary.
        let soft = GrayImage::from_fn(3, 1, |x, _| Luma([[0u8, 1, 128][x as usize]]));
        assert_eq!(labels_from_gray(&soft, MaskEncoding::Binary), array![[0u32, 1, 1]]);
    }

    #[test]
    fn test_binary_encoding() {
        let labels = array![[0u32, 3]];
        let gray = labels_to_gray(&labels, MaskEncoding::Binary).unwrap();
        assert_eq!(gray.get_pixel(0, 0)[0], 0);
        assert_eq!(gray.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_raw_encoding_rejects_wide_labels() {
        let labels = array![[256u32]];
        assert!(labels_to_gray(&labels, MaskEncoding::Raw).is_err());
        assert!(labels_to_gray(&labels, MaskEncoding::Binary).is_ok());
    }

    #[test]
    fn test_mask_to_labels() {
        let mask = array![[true, false], [false, true]];
        assert_eq!(mask_to_labels(&mask), array![[1u32, 0], [0, 1]]);
    }
}
