//! Persisted display configuration

use crate::constants::{numeric, request, tracker};
use crate::error::{DisplayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Throttling and request settings shared by every tracker of a display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Minimum time between dispatched requests, in milliseconds
    pub throttle_interval_ms: u64,

    /// Number of samples requested for a timeline trace
    pub data_request_sample_count: usize,

    /// Relative tolerance for treating a min/max pair as a point
    pub point_tolerance: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            throttle_interval_ms: tracker::DEFAULT_THROTTLE_INTERVAL.as_millis() as u64,
            data_request_sample_count: request::DEFAULT_SAMPLE_COUNT,
            point_tolerance: numeric::POINT_TOLERANCE,
        }
    }
}

impl DisplayConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: DisplayConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded display config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.throttle_interval_ms == 0 {
            return Err(DisplayError::InvalidInterval(self.throttle_interval_ms));
        }
        if self.data_request_sample_count == 0 {
            return Err(DisplayError::Config(
                "data_request_sample_count must be at least 1".to_string(),
            ));
        }
        if !self.point_tolerance.is_finite() || self.point_tolerance < 0.0 {
            return Err(DisplayError::Config(format!(
                "point_tolerance must be a non-negative number, got {}",
                self.point_tolerance
            )));
        }
        Ok(())
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.throttle_interval(), Duration::from_millis(200));
        assert_eq!(config.data_request_sample_count, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        let config = DisplayConfig {
            throttle_interval_ms: 50,
            data_request_sample_count: 250,
            point_tolerance: 1e-6,
        };

        config.save(file.path()).unwrap();
        let loaded = DisplayConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: DisplayConfig = serde_json::from_str(r#"{"throttle_interval_ms": 100}"#).unwrap();
        assert_eq!(config.throttle_interval_ms, 100);
        assert_eq!(config.data_request_sample_count, 1000);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = DisplayConfig {
            throttle_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DisplayError::InvalidInterval(0))));
    }

    #[test]
    fn test_rejects_zero_sample_count() {
        let config = DisplayConfig {
            data_request_sample_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DisplayError::Config(_))));
    }

    #[test]
    fn test_load_or_default_on_bad_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"{ not json").unwrap();

        let config = DisplayConfig::load_or_default(file.path());
        assert_eq!(config, DisplayConfig::default());
    }
}
