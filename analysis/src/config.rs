use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Run the rules of a phase as concurrent tasks.
    pub concurrent_validation: bool,

    /// Upper bound on rules running at once when `concurrent_validation` is set.
    pub max_parallel_rules: usize,

    /// Skip the deployment phase once the definition phase produced a fatal
    /// finding.
    pub fail_fast: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            concurrent_validation: false,
            max_parallel_rules: 4,
            fail_fast: false,
        }
    }
}

impl ValidatorConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.concurrent_validation && self.max_parallel_rules == 0 {
            return Err(EngineError::Config(
                "max_parallel_rules must be positive when concurrent_validation is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert!(!config.concurrent_validation);
        assert_eq!(config.max_parallel_rules, 4);
        assert!(!config.fail_fast);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_partial_json() {
        let json = r#"{"concurrent_validation": true}"#;
        let config: ValidatorConfig =
            serde_json::from_str(json).expect("deserialization should succeed");
        assert!(config.concurrent_validation);
        assert_eq!(config.max_parallel_rules, 4);
    }

    #[test]
    fn test_config_serialize_deserialize() {
        let config = ValidatorConfig {
            concurrent_validation: true,
            max_parallel_rules: 8,
            fail_fast: true,
        };
        let json = serde_json::to_string(&config).expect("serialization should succeed");
        let back: ValidatorConfig =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back, config);
    }

    #[test]
    fn test_zero_parallelism_is_rejected_when_concurrent() {
        let config = ValidatorConfig {
            concurrent_validation: true,
            max_parallel_rules: 0,
            fail_fast: false,
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_zero_parallelism_is_ignored_when_sequential() {
        let config = ValidatorConfig {
            max_parallel_rules: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
