//! Error handling for the refinement pipeline.

mod types;

pub use types::{BoxError, ProcessingStage, RefineError, RefineResult};
