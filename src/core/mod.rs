//! The core module of the refinement pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Configuration management
//! - Error handling
//! - Contracts of the external models
//! - The interactive model variant registry

#[macro_use]
pub mod macros;
pub mod config;
pub mod errors;
pub mod registry;
pub mod traits;

pub use config::{ConfigError, ConfigValidator, ParallelPolicy, RefineConfig};
pub use errors::{BoxError, ProcessingStage, RefineError, RefineResult};
pub use registry::{PromptModelRegistry, PromptModelVariant};
pub use traits::{BoxPrompt, PointPrompt, PromptSegmenter, Prompts, SegmentationModel};
