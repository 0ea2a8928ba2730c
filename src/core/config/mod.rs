//! Configuration management for the refinement pipeline.
//!
//! This module provides configuration types, validation traits, and utilities
//! for managing refinement configurations.

pub mod errors;
pub mod parallel;
pub mod prompt;
pub mod refine;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator};
pub use parallel::ParallelPolicy;
pub use prompt::PromptModelConfig;
pub use refine::{
    BilateralKernelConfig, GaussianKernelConfig, PairwiseConfig, RefineConfig, SizeLimits,
};
