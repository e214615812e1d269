//! Error types for the Panelquote core.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Input rejected at a validation boundary.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of what was rejected.
        reason: String,
    },

    /// Configuration value outside its accepted domain.
    #[error("Configuration error: {reason}")]
    ConfigError {
        /// Description of the configuration error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config_error(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_input("rounding must be nearest10|ceil10");
        assert!(err.to_string().contains("Invalid input"));
    }
}
