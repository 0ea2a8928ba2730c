//! Core error types for the refinement pipeline.
//!
//! This module defines the main [`RefineError`] enum and the [`ProcessingStage`]
//! enum that identifies which stage of the pipeline failed.

use thiserror::Error;

/// Boxed error type used at the boundary with external models.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Enum representing the stages of the refinement pipeline.
///
/// Used to identify where an error occurred, providing context for
/// debugging and error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Size gating of the input image.
    SizeGate,
    /// Reduction of the input image to three color channels.
    ColorNormalization,
    /// Construction of the unary energy grid.
    UnaryPotential,
    /// Construction of the pairwise kernels.
    PairwisePotential,
    /// Mean-field inference iterations.
    MeanField,
    /// Skeleton computation and overlay.
    Skeleton,
    /// Morphological closing.
    Morphology,
    /// Invocation of an external model.
    ModelInference,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::SizeGate => write!(f, "size gate"),
            ProcessingStage::ColorNormalization => write!(f, "color normalization"),
            ProcessingStage::UnaryPotential => write!(f, "unary potential"),
            ProcessingStage::PairwisePotential => write!(f, "pairwise potential"),
            ProcessingStage::MeanField => write!(f, "mean-field inference"),
            ProcessingStage::Skeleton => write!(f, "skeleton overlay"),
            ProcessingStage::Morphology => write!(f, "morphological closing"),
            ProcessingStage::ModelInference => write!(f, "model inference"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors that can occur while refining a mask.
///
/// Rejected image sizes and single-label grids are *not* errors; they have
/// defined outputs. Everything listed here is a genuine failure.
#[derive(Error, Debug)]
pub enum RefineError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during a processing stage.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// Two grids that must share spatial dimensions do not.
    #[error(
        "shape mismatch in {context}: expected {expected_height}x{expected_width}, got {actual_height}x{actual_width}"
    )]
    ShapeMismatch {
        /// Where the mismatch was detected.
        context: String,
        /// Expected height (rows).
        expected_height: usize,
        /// Expected width (columns).
        expected_width: usize,
        /// Actual height (rows).
        actual_height: usize,
        /// Actual width (columns).
        actual_width: usize,
    },

    /// An external model failed.
    #[error("model '{model}' failed: {context}")]
    Model {
        /// Name of the model that failed.
        model: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from basic tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type RefineResult<T> = Result<T, RefineError>;

impl From<image::ImageError> for RefineError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl From<crate::core::config::ConfigError> for RefineError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

impl RefineError {
    /// Creates a shape mismatch error from `(rows, cols)` pairs.
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected_height: expected.0,
            expected_width: expected.1,
            actual_height: actual.0,
            actual_width: actual.1,
        }
    }

    /// Creates a processing error without an underlying source.
    pub fn processing(kind: ProcessingStage, context: impl Into<String>) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: None,
        }
    }

    /// Wraps an error returned by an external model.
    pub fn model_error(model: impl Into<String>, context: impl Into<String>, source: BoxError) -> Self {
        Self::Model {
            model: model.into(),
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error with context and details.
    ///
    /// ```rust
    /// # use mask_refine::RefineError;
    /// let err = RefineError::config_error_detailed(
    ///     "prompt model registry",
    ///     "no constructor registered for 'vit_b'",
    /// );
    /// assert!(matches!(err, RefineError::ConfigError { .. }));
    /// ```
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigError {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error for invalid field values.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ConfigError {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }
}
