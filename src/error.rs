//! Error types for microsim.
//!
//! Every fallible operation returns `Result<T, SimError>` instead of
//! panicking. Scenario problems surface when a scenario is loaded, never
//! while a run is in progress.

use thiserror::Error;

/// Result type alias for microsim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all microsim operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Scenario Errors =====
    /// Scenario rejected at load/reset time (empty, malformed parameters).
    #[error("Invalid scenario '{scenario}': {reason}")]
    InvalidScenario {
        /// Name of the rejected scenario.
        scenario: String,
        /// Why it was rejected.
        reason: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Create an invalid-scenario error.
    #[must_use]
    pub fn invalid_scenario(scenario: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScenario {
            scenario: scenario.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether the error means the scenario cannot be shown at all.
    ///
    /// Widgets treat these as fatal to the current load and ask the user to
    /// pick another scenario.
    #[must_use]
    pub const fn is_scenario_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidScenario { .. } | Self::Validation(_) | Self::Config { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scenario_display() {
        let err = SimError::invalid_scenario("binary_search", "values must be sorted");
        let msg = err.to_string();
        assert!(msg.contains("Invalid scenario"));
        assert!(msg.contains("binary_search"));
        assert!(msg.contains("values must be sorted"));
        assert!(err.is_scenario_rejection());
    }

    #[test]
    fn test_error_config() {
        let err = SimError::config("interval out of range");
        assert!(err.is_scenario_rejection());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("interval out of range"));
    }

    #[test]
    fn test_error_serialization() {
        let err = SimError::serialization("failed to encode frame");
        assert!(!err.is_scenario_rejection());
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_io() {
        let err = SimError::Io(std::io::Error::other("file not found"));
        assert!(!err.is_scenario_rejection());
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_yaml_from() {
        let yaml_err = serde_yaml::from_str::<u32>("[not, a, number]").unwrap_err();
        let err: SimError = yaml_err.into();
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_error_debug() {
        let err = SimError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
