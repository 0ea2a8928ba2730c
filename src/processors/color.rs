//! Reduction of input images to 8-bit, 3-channel color.

use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// Drops the alpha channel, keeping the first three channels unchanged.
///
/// No premultiplication is applied.
pub fn drop_alpha(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        Rgb([r, g, b])
    })
}

/// Converts any supported image layout to RGB.
///
/// RGB input is returned as-is (cloned), RGBA input has its alpha dropped,
/// every other layout is converted by the `image` crate.
pub fn to_rgb(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        DynamicImage::ImageRgba8(rgba) => drop_alpha(rgba),
        other => {
            tracing::debug!("Converting {:?} image to RGB8", other.color());
            other.to_rgb8()
        }
    }
}
