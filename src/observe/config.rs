// Observer configuration, loadable from JSON

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which broadcasts to observe and how long values stay fresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Channels to observe; empty means every channel
    pub channels: Vec<u8>,

    /// Observations buffered between the scan callback and the control loop
    pub queue_depth: usize,

    /// A channel's latest values expire after this many milliseconds
    pub max_age_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            queue_depth: 16,
            max_age_ms: 1000,
        }
    }
}

impl ObserverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict observation to the given channels
    pub fn with_channels(mut self, channels: impl Into<Vec<u8>>) -> Self {
        self.channels = channels.into();
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age_ms = u64::try_from(max_age.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    /// True if broadcasts on `channel` should be delivered
    pub fn accepts(&self, channel: u8) -> bool {
        self.channels.is_empty() || self.channels.contains(&channel)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_depth == 0 {
            return Err(ConfigError::Invalid(
                "queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ObserverConfig::default();
        assert!(config.channels.is_empty());
        assert_eq!(config.queue_depth, 16);
        assert_eq!(config.max_age(), Duration::from_secs(1));
        assert!(config.accepts(0));
        assert!(config.accepts(255));
    }

    #[test]
    fn test_builder() {
        let config = ObserverConfig::new()
            .with_channels([1, 2])
            .with_queue_depth(4)
            .with_max_age(Duration::from_millis(250));

        assert!(config.accepts(1));
        assert!(config.accepts(2));
        assert!(!config.accepts(3));
        assert_eq!(config.queue_depth, 4);
        assert_eq!(config.max_age_ms, 250);
    }

    #[test]
    fn test_max_age_saturates() {
        let config = ObserverConfig::new().with_max_age(Duration::MAX);
        assert_eq!(config.max_age_ms, u64::MAX);
    }

    #[test]
    fn test_json_partial_fields_use_defaults() {
        let config = ObserverConfig::from_json(r#"{"channels": [1, 2]}"#).unwrap();
        assert_eq!(config.channels, vec![1, 2]);
        assert_eq!(config.queue_depth, 16);

        let back = ObserverConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_rejects_zero_queue() {
        let err = ObserverConfig::from_json(r#"{"queue_depth": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"channels": [3], "max_age_ms": 500}"#).unwrap();

        let config = ObserverConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.channels, vec![3]);
        assert_eq!(config.max_age(), Duration::from_millis(500));

        assert!(matches!(
            ObserverConfig::load("/nonexistent/observer.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
