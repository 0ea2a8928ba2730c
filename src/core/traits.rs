//! Contracts of the external models.
//!
//! The pipeline never loads, trains, or places models on a device. It only
//! relies on the input/output shapes described here. Implementations are
//! injected by the caller and shared immutably across requests.

use crate::core::errors::BoxError;
use crate::processors::LabelGrid;
use image::RgbImage;
use ndarray::Array2;
use std::fmt::Debug;

/// A semantic segmentation network.
///
/// Given an RGB image of size W×H, returns an H×W grid of integer label ids,
/// with label 0 meaning background.
pub trait SegmentationModel: Debug + Send + Sync {
    /// Human-readable model name used in errors and logs.
    fn name(&self) -> &str;

    /// Predicts the coarse label grid for `image`.
    fn segment(&self, image: &RgbImage) -> Result<LabelGrid, BoxError>;
}

/// A point/box-prompted segmentation model.
///
/// The image is set once; any number of prompts can then be evaluated
/// against it.
pub trait PromptSegmenter: Debug + Send {
    /// Human-readable model name used in errors and logs.
    fn name(&self) -> &str;

    /// Prepares the model for prompts on `image`.
    fn set_image(&mut self, image: &RgbImage) -> Result<(), BoxError>;

    /// Returns an H×W object mask for the given prompts.
    fn predict(&self, prompts: &Prompts) -> Result<Array2<bool>, BoxError>;
}

/// A single clicked point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrompt {
    /// Column in pixels.
    pub x: f32,
    /// Row in pixels.
    pub y: f32,
    /// True for a foreground click, false for a background click.
    pub positive: bool,
}

impl PointPrompt {
    /// Creates a foreground point.
    pub fn foreground(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            positive: true,
        }
    }

    /// Creates a background point.
    pub fn background(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            positive: false,
        }
    }
}

/// An axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPrompt {
    /// Left edge.
    pub x_min: f32,
    /// Top edge.
    pub y_min: f32,
    /// Right edge.
    pub x_max: f32,
    /// Bottom edge.
    pub y_max: f32,
}

impl BoxPrompt {
    /// Creates a box from two corners.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

/// Prompts evaluated against the current image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompts {
    /// Clicked points.
    pub points: Vec<PointPrompt>,
    /// Optional bounding box.
    pub bbox: Option<BoxPrompt>,
}

impl Prompts {
    /// Creates an empty prompt set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point.
    pub fn with_point(mut self, point: PointPrompt) -> Self {
        self.points.push(point);
        self
    }

    /// Sets the box.
    pub fn with_box(mut self, bbox: BoxPrompt) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Returns true when there is nothing to evaluate.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.bbox.is_none()
    }

    /// Checks that every coordinate lies inside a `width`×`height` image.
    pub fn validate_bounds(&self, width: u32, height: u32) -> Result<(), String> {
        let (w, h) = (width as f32, height as f32);
        let inside = |x: f32, y: f32| x >= 0.0 && y >= 0.0 && x < w && y < h;

        for (idx, point) in self.points.iter().enumerate() {
            if !inside(point.x, point.y) {
                return Err(format!(
                    "point {} at ({}, {}) lies outside the {}x{} image",
                    idx, point.x, point.y, width, height
                ));
            }
        }

        if let Some(bbox) = self.bbox {
            if bbox.x_min > bbox.x_max || bbox.y_min > bbox.y_max {
                return Err(format!("box {:?} has inverted corners", bbox));
            }
            if !inside(bbox.x_min, bbox.y_min) || bbox.x_max > w || bbox.y_max > h {
                return Err(format!(
                    "box {:?} lies outside the {}x{} image",
                    bbox, width, height
                ));
            }
        }

        Ok(())
    }
}
