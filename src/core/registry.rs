//! Closed registry of interactive model variants.
//!
//! Variants are an enum rather than free-form strings: the mode string is
//! parsed once at configuration time and every later lookup is exhaustive.
//! The registry maps each variant to the constructor that loads it.

use crate::core::config::{ConfigError, PromptModelConfig};
use crate::core::errors::{BoxError, RefineError, RefineResult};
use crate::core::traits::PromptSegmenter;
use crate::pipeline::InteractiveSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Interactive model backbones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptModelVariant {
    /// ViT-H backbone; also selected by the `default` mode.
    #[default]
    #[serde(alias = "default")]
    VitH,
    /// ViT-L backbone.
    VitL,
    /// ViT-B backbone.
    VitB,
}

impl PromptModelVariant {
    /// All variants, in registry order.
    pub const ALL: [PromptModelVariant; 3] = [Self::VitH, Self::VitL, Self::VitB];

    /// Canonical mode string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VitH => "vit_h",
            Self::VitL => "vit_l",
            Self::VitB => "vit_b",
        }
    }
}

impl fmt::Display for PromptModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptModelVariant {
    type Err = ConfigError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "default" | "vit_h" => Ok(Self::VitH),
            "vit_l" => Ok(Self::VitL),
            "vit_b" => Ok(Self::VitB),
            other => Err(ConfigError::Invalid {
                message: format!(
                    "unknown prompt model mode '{}', expected one of default, vit_h, vit_l, vit_b",
                    other
                ),
            }),
        }
    }
}

/// Loads a prompt model from a checkpoint path.
pub type PromptModelConstructor =
    Box<dyn Fn(&Path) -> Result<Box<dyn PromptSegmenter>, BoxError> + Send + Sync>;

/// Maps variants to their constructors.
#[derive(Default)]
pub struct PromptModelRegistry {
    constructors: HashMap<PromptModelVariant, PromptModelConstructor>,
}

impl fmt::Debug for PromptModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<_> = self.registered().collect();
        registered.sort_by_key(|v| v.as_str());
        f.debug_struct("PromptModelRegistry")
            .field("registered", &registered)
            .finish()
    }
}

impl PromptModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor for `variant`, replacing any previous one.
    pub fn register<F>(mut self, variant: PromptModelVariant, constructor: F) -> Self
    where
        F: Fn(&Path) -> Result<Box<dyn PromptSegmenter>, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(variant, Box::new(constructor));
        self
    }

    /// Returns true if `variant` has a constructor.
    pub fn contains(&self, variant: PromptModelVariant) -> bool {
        self.constructors.contains_key(&variant)
    }

    /// Iterates over registered variants.
    pub fn registered(&self) -> impl Iterator<Item = PromptModelVariant> + '_ {
        self.constructors.keys().copied()
    }

    /// Constructs the model for `config`.
    pub fn build(&self, config: &PromptModelConfig) -> RefineResult<Box<dyn PromptSegmenter>> {
        let constructor = self.constructors.get(&config.variant).ok_or_else(|| {
            RefineError::config_error_detailed(
                "prompt model registry",
                format!("no constructor registered for '{}'", config.variant),
            )
        })?;

        tracing::debug!(
            "Loading prompt model {} from {}",
            config.variant,
            config.checkpoint.display()
        );

        constructor(&config.checkpoint).map_err(|e| {
            RefineError::model_error(
                config.variant.as_str(),
                format!("failed to load checkpoint '{}'", config.checkpoint.display()),
                e,
            )
        })
    }

    /// Constructs the model for `config` and wraps it in a session.
    pub fn open_session(&self, config: &PromptModelConfig) -> RefineResult<InteractiveSession> {
        Ok(InteractiveSession::new(self.build(config)?))
    }
}
