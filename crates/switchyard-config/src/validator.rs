//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Poll budgets above this draw a warning.
const LONG_TIMEOUT_MS: u64 = 30 * 60 * 1000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::invalid_value(error.path, error.message)),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_dispatch(config, &mut result);
        Self::validate_resolver(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_dispatch(config: &Config, result: &mut ValidationResult) {
        let dispatch = &config.dispatch;

        if dispatch.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "dispatch.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        } else if dispatch.timeout_ms > LONG_TIMEOUT_MS {
            result.add_warning(ValidationWarning::new(
                "dispatch.timeout_ms",
                "timeout_ms is very high (>30 minutes), stalled jobs will hold callers for a long time",
            ));
        }

        if dispatch.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "dispatch.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if dispatch.max_poll_interval_ms < dispatch.poll_interval_ms {
            result.add_error(ValidationError::new(
                "dispatch.max_poll_interval_ms",
                "max_poll_interval_ms must not be lower than poll_interval_ms",
            ));
        }

        if dispatch.poll_backoff.is_nan() || dispatch.poll_backoff < 1.0 {
            result.add_error(ValidationError::new(
                "dispatch.poll_backoff",
                "poll_backoff must be at least 1.0",
            ));
        }
    }

    fn validate_resolver(config: &Config, result: &mut ValidationResult) {
        let resolver = &config.resolver;

        if !(0.0..=1.0).contains(&resolver.fuzzy_threshold) {
            result.add_error(ValidationError::new(
                "resolver.fuzzy_threshold",
                "fuzzy_threshold must be between 0.0 and 1.0",
            ));
        }

        if resolver.max_suggestions == 0 {
            result.add_error(ValidationError::new(
                "resolver.max_suggestions",
                "max_suggestions must be greater than 0",
            ));
        }

        for (alias, target) in &resolver.aliases {
            if target.is_empty() {
                result.add_error(ValidationError::new(
                    format!("resolver.aliases.{}", alias),
                    "alias target cannot be empty",
                ));
            } else if alias == target {
                result.add_error(ValidationError::new(
                    format!("resolver.aliases.{}", alias),
                    "alias cannot point at itself",
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                "level is empty, falling back to \"info\"",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
