//! Configuration of the interactive (prompt-driven) model.

use crate::core::registry::PromptModelVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Selects which interactive model to construct and where its weights live.
///
/// The variant is parsed when the configuration is built, so an unknown mode
/// string is rejected long before any image is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptModelConfig {
    /// Model variant (`vit_h`, `vit_l`, `vit_b`).
    #[serde(default)]
    pub variant: PromptModelVariant,
    /// Path to the model checkpoint.
    pub checkpoint: PathBuf,
}

impl PromptModelConfig {
    /// Creates a configuration for the given variant and checkpoint.
    pub fn new(variant: PromptModelVariant, checkpoint: impl Into<PathBuf>) -> Self {
        Self {
            variant,
            checkpoint: checkpoint.into(),
        }
    }
}
