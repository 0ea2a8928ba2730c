//! Refinement configuration.
//!
//! Defaults reproduce the reference dense-CRF setup: three mean-field
//! iterations, a 0.7 confidence in the coarse labels, a position-only
//! smoothness kernel (weight 3, scale 3) and a position+color appearance
//! kernel (weight 10, spatial scale 50, color scale 13).

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};

/// Accepted range of image side lengths, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    /// Smallest accepted height or width (default: 50).
    pub min_side: u32,
    /// Largest accepted height or width (default: 1000).
    pub max_side: u32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_side: 50,
            max_side: 1000,
        }
    }
}

impl SizeLimits {
    /// Returns true when both sides lie within `[min_side, max_side]`.
    pub fn accepts(&self, width: u32, height: u32) -> bool {
        let range = self.min_side..=self.max_side;
        range.contains(&width) && range.contains(&height)
    }
}

impl ConfigValidator for SizeLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_side > self.max_side {
            return Err(ConfigError::Invalid {
                message: format!(
                    "size limits are empty: min_side {} > max_side {}",
                    self.min_side, self.max_side
                ),
            });
        }
        Ok(())
    }
}

/// Position-only Gaussian kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianKernelConfig {
    /// Potts compatibility weight.
    pub weight: f32,
    /// Standard deviation in pixels, shared by x and y.
    pub spatial_scale: f32,
}

impl_config_validator!(GaussianKernelConfig {
    weight: min(0.0),
    spatial_scale: positive(),
});

/// Position+color bilateral kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilateralKernelConfig {
    /// Potts compatibility weight.
    pub weight: f32,
    /// Standard deviation in pixels, shared by x and y.
    pub spatial_scale: f32,
    /// Standard deviation in color units, shared by r, g and b.
    pub color_scale: f32,
}

impl_config_validator!(BilateralKernelConfig {
    weight: min(0.0),
    spatial_scale: positive(),
    color_scale: positive(),
});

/// The two pairwise kernels of the dense field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairwiseConfig {
    /// Removes isolated label noise irrespective of color.
    pub smoothness: GaussianKernelConfig,
    /// Pulls label boundaries onto color edges.
    pub appearance: BilateralKernelConfig,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self {
            smoothness: GaussianKernelConfig {
                weight: 3.0,
                spatial_scale: 3.0,
            },
            appearance: BilateralKernelConfig {
                weight: 10.0,
                spatial_scale: 50.0,
                color_scale: 13.0,
            },
        }
    }
}

impl ConfigValidator for PairwiseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.smoothness.validate()?;
        self.appearance.validate()
    }
}

/// Configuration of a single refinement call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Run the dense field and post-processing; when false the coarse grid is
    /// returned unchanged (default: true).
    pub do_crf: bool,
    /// Number of mean-field iterations (default: 3).
    pub num_iter: usize,
    /// Probability assigned to the coarse label of each pixel (default: 0.7).
    pub gt_prob: f32,
    /// Pairwise kernel parameters.
    pub pairwise: PairwiseConfig,
    /// Accepted image sizes.
    pub size_limits: SizeLimits,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            do_crf: true,
            num_iter: 3,
            gt_prob: 0.7,
            pairwise: PairwiseConfig::default(),
            size_limits: SizeLimits::default(),
        }
    }
}

impl RefineConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the dense field.
    pub fn with_crf(mut self, do_crf: bool) -> Self {
        self.do_crf = do_crf;
        self
    }

    /// Sets the number of mean-field iterations.
    pub fn with_num_iter(mut self, num_iter: usize) -> Self {
        self.num_iter = num_iter;
        self
    }

    /// Sets the confidence assigned to coarse labels.
    pub fn with_gt_prob(mut self, gt_prob: f32) -> Self {
        self.gt_prob = gt_prob;
        self
    }

    /// Replaces the pairwise kernel parameters.
    pub fn with_pairwise(mut self, pairwise: PairwiseConfig) -> Self {
        self.pairwise = pairwise;
        self
    }

    /// Replaces the accepted size range.
    pub fn with_size_limits(mut self, size_limits: SizeLimits) -> Self {
        self.size_limits = size_limits;
        self
    }
}

impl ConfigValidator for RefineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let gt_prob = f64::from(self.gt_prob);
        if !(gt_prob > 0.0 && gt_prob < 1.0) {
            return Err(ConfigError::OutOfOpenRange {
                field: "gt_prob",
                value: gt_prob,
                min: 0.0,
                max: 1.0,
            });
        }
        self.pairwise.validate()?;
        self.size_limits.validate()
    }
}
