//! Macros for the refinement pipeline.

/// Implements [`ConfigValidator`](crate::core::config::ConfigValidator) from a
/// list of per-field rules.
///
/// Supported rules:
/// - `range(min, max)`: closed interval
/// - `open_range(min, max)`: open interval
/// - `min(value)`: inclusive lower bound
/// - `positive()`: strictly greater than zero
///
/// NaN fails every rule.
///
/// # Usage
///
/// ```rust
/// use mask_refine::{ConfigValidator, impl_config_validator};
///
/// struct Blur {
///     sigma: f32,
///     passes: usize,
/// }
///
/// impl_config_validator!(Blur {
///     sigma: positive(),
///     passes: range(1, 8),
/// });
///
/// assert!(Blur { sigma: 1.5, passes: 2 }.validate().is_ok());
/// assert!(Blur { sigma: 0.0, passes: 2 }.validate().is_err());
/// ```
#[macro_export]
macro_rules! impl_config_validator {
    ($Config:ty { $($field:ident : $rule:ident ( $($arg:expr),* )),* $(,)? }) => {
        impl $crate::core::config::ConfigValidator for $Config {
            fn validate(&self) -> Result<(), $crate::core::config::ConfigError> {
                $(
                    $crate::check_config_rule!(self.$field, stringify!($field), $rule($($arg),*));
                )*
                Ok(())
            }
        }
    };
}

/// Checks a single rule for [`impl_config_validator!`].
#[doc(hidden)]
#[macro_export]
macro_rules! check_config_rule {
    ($value:expr, $name:expr, range($min:expr, $max:expr)) => {{
        let value = $value as f64;
        let (min, max) = ($min as f64, $max as f64);
        if !(value >= min && value <= max) {
            return Err($crate::core::config::ConfigError::OutOfRange {
                field: $name,
                value,
                min,
                max,
            });
        }
    }};
    ($value:expr, $name:expr, open_range($min:expr, $max:expr)) => {{
        let value = $value as f64;
        let (min, max) = ($min as f64, $max as f64);
        if !(value > min && value < max) {
            return Err($crate::core::config::ConfigError::OutOfOpenRange {
                field: $name,
                value,
                min,
                max,
            });
        }
    }};
    ($value:expr, $name:expr, min($min:expr)) => {{
        let value = $value as f64;
        let min = $min as f64;
        if !(value >= min) {
            return Err($crate::core::config::ConfigError::BelowMinimum {
                field: $name,
                value,
                min,
            });
        }
    }};
    ($value:expr, $name:expr, positive()) => {{
        let value = $value as f64;
        if !(value > 0.0) {
            return Err($crate::core::config::ConfigError::NotPositive { field: $name, value });
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::config::{ConfigError, ConfigValidator};

    #[derive(Debug)]
    struct TestConfig {
        ratio: f32,
        prob: f64,
        count: usize,
        scale: f32,
    }

    impl_config_validator!(TestConfig {
        ratio: range(0.0, 1.0),
        prob: open_range(0.0, 1.0),
        count: min(1),
        scale: positive(),
    });

    fn valid() -> TestConfig {
        TestConfig {
            ratio: 1.0,
            prob: 0.5,
            count: 1,
            scale: 0.1,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_open_range_rejects_bounds() {
        let config = TestConfig { prob: 1.0, ..valid() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfOpenRange { field: "prob", .. })
        ));
    }

    #[test]
    fn test_nan_fails_range() {
        let config = TestConfig { ratio: f32::NAN, ..valid() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "ratio", .. })
        ));
    }

    #[test]
    fn test_min_and_positive() {
        let config = TestConfig { count: 0, ..valid() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BelowMinimum { field: "count", .. })
        ));

        let config = TestConfig { scale: 0.0, ..valid() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "scale", .. })
        ));
    }
}
