//! Configuration validation errors and the validator trait.

use thiserror::Error;

/// Errors produced while validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value lies outside its closed interval.
    #[error("invalid value for '{field}': {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// A value lies outside its open interval.
    #[error("invalid value for '{field}': {value} is outside ({min}, {max})")]
    OutOfOpenRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: f64,
        /// Lower bound (exclusive).
        min: f64,
        /// Upper bound (exclusive).
        max: f64,
    },

    /// A value is below its minimum.
    #[error("invalid value for '{field}': {value} is below the minimum {min}")]
    BelowMinimum {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: f64,
        /// Minimum allowed value (inclusive).
        min: f64,
    },

    /// A value must be strictly positive.
    #[error("invalid value for '{field}': {value} must be positive")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: f64,
    },

    /// Cross-field or free-form validation failure.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

/// Trait for configurations that can check their own invariants.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates and returns the configuration.
    fn validated(self) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}
