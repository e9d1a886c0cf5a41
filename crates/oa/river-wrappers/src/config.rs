//! Wrapper configuration.
//!
//! All configs deserialize with `#[serde(default)]`, so a JSON document only
//! needs the fields it overrides.

use oa_types::LogLevel;
use serde::{Deserialize, Serialize};

use crate::buffer::validate_steprate;
use crate::error::{WrapperError, WrapperResult};

/// Default capacity of the instance buffer of detectors.
pub const DEFAULT_INSTANCE_BUFFER_SIZE: usize = 20;

/// Default detection step rate of detectors.
pub const DEFAULT_DETECTION_STEPRATE: usize = 1;

/// Default number of raised anomalies/drifts a detector retains.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

fn parse<T: for<'de> Deserialize<'de>>(json: &str) -> WrapperResult<T> {
    Ok(serde_json::from_str(json)?)
}

// ── Detectors ───────────────────────────────────────────────────────────

/// Configuration shared by anomaly and drift detector wrappers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Task name; defaults to the wrapped algorithm's type name.
    pub name: Option<String>,
    pub visualize: bool,
    pub logging: LogLevel,
    pub instance_buffer_size: usize,
    pub detection_steprate: usize,
    /// Raised anomalies/drifts retained by the wrapper.
    pub event_buffer_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            name: None,
            visualize: false,
            logging: LogLevel::All,
            instance_buffer_size: DEFAULT_INSTANCE_BUFFER_SIZE,
            detection_steprate: DEFAULT_DETECTION_STEPRATE,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl DetectorConfig {
    pub fn from_json_str(json: &str) -> WrapperResult<Self> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WrapperResult<()> {
        validate_steprate(self.instance_buffer_size, self.detection_steprate)?;
        if self.event_buffer_size == 0 {
            return Err(WrapperError::invalid("event_buffer_size", "must be >= 1"));
        }
        Ok(())
    }
}

/// Feature a drift detector monitors.
///
/// `id` takes precedence over `index` when set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSelector {
    /// 0-based position in the feature vector.
    pub index: usize,
    /// Dimension id.
    pub id: Option<String>,
}

impl FeatureSelector {
    pub fn by_index(index: usize) -> Self {
        Self { index, id: None }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            index: 0,
            id: Some(id.into()),
        }
    }
}

impl std::fmt::Display for FeatureSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "id '{}'", id),
            None => write!(f, "index {}", self.index),
        }
    }
}

// ── Cluster Analyzers ───────────────────────────────────────────────────

/// Configuration of cluster analyzer wrappers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Task name; defaults to the wrapper type label.
    pub name: Option<String>,
    /// Adaptivity; when off, instances are not learned.
    pub ada: bool,
    pub visualize: bool,
    pub logging: LogLevel,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            name: None,
            ada: true,
            visualize: false,
            logging: LogLevel::All,
        }
    }
}

impl AnalyzerConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> WrapperResult<Self> {
        parse(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.instance_buffer_size, 20);
        assert_eq!(config.detection_steprate, 1);
        assert_eq!(config.event_buffer_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn detector_from_json_validates() {
        let json = r#"{ "instance_buffer_size": 50, "detection_steprate": 50 }"#;
        let config = DetectorConfig::from_json_str(json).unwrap();
        assert_eq!(config.detection_steprate, 50);
        assert_eq!(config.logging, LogLevel::All);

        let json = r#"{ "instance_buffer_size": 10, "detection_steprate": 11 }"#;
        let err = DetectorConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, WrapperError::InvalidParameter { .. }));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = DetectorConfig::from_json_str("{ instance_buffer_size: }").unwrap_err();
        assert!(matches!(err, WrapperError::Config(_)));
    }

    #[test]
    fn feature_selector_display() {
        assert_eq!(FeatureSelector::by_index(2).to_string(), "index 2");
        assert_eq!(FeatureSelector::by_id("f1").to_string(), "id 'f1'");
    }

    #[test]
    fn analyzer_from_json() {
        let config =
            AnalyzerConfig::from_json_str(r#"{ "name": "t1", "logging": "nothing" }"#).unwrap();
        assert_eq!(config.name.as_deref(), Some("t1"));
        assert!(config.ada);
        assert_eq!(config.logging, LogLevel::Nothing);
    }
}
