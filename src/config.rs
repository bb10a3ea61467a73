use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Bank-owned account that is the counterparty of every ATM action.
    pub house_account: AccountId,
    /// How many times an operation is attempted when its commit hits a concurrent write.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl EngineConfig {
    pub fn new(house_account: AccountId) -> Self {
        Self {
            house_account,
            max_attempts: default_max_attempts(),
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_defaults() {
        let config = EngineConfig::from_toml_str("house_account = 1").unwrap();
        assert_eq!(config, EngineConfig::new(1));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = EngineConfig::from_toml_str("house_account = 1\nmax_attempts = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid engine config: max_attempts must be at least 1"
        );
    }

    #[test]
    fn missing_house_account() {
        let err = EngineConfig::from_toml_str("max_attempts = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
