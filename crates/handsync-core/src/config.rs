//! Configuration for the tracking, smoothing and node layers
//!
//! Every section falls back to its defaults when omitted, so a config file
//! only needs to name the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{HandsyncError, HandsyncResult, PeerId};

/// Pose classifier thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fingertip-to-wrist distance (metres) at or above which a finger
    /// counts as extended
    pub extended_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            extended_threshold: 0.08,
        }
    }
}

/// Remote head smoothing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Per-second blend rate; 0 freezes the displayed head
    pub smoothing_factor: f32,
    /// Distance at or beyond which the displayed head snaps to the target
    pub applied_distance: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            smoothing_factor: 2.0,
            applied_distance: 1.0,
        }
    }
}

/// Local hand rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Scalar pushing displayed fingertips away from the wrist
    pub fingertip_extension: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            fingertip_extension: 0.0,
        }
    }
}

/// Node runtime settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Identity this node publishes under
    pub local_peer: PeerId,
    /// Host tick rate, used by drivers that schedule `tick`
    pub tick_rate_hz: u32,
    /// Maximum queued inbound events before the oldest are dropped
    pub inbox_capacity: usize,
    /// Maximum queued outgoing snapshots before the oldest are dropped
    pub outbox_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            local_peer: PeerId::ZERO,
            tick_rate_hz: 60,
            inbox_capacity: 128,
            outbox_capacity: 8,
        }
    }
}

/// Complete handsync configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsyncConfig {
    pub classifier: ClassifierConfig,
    pub smoothing: SmoothingConfig,
    pub display: DisplayConfig,
    pub node: NodeConfig,
}

impl HandsyncConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> HandsyncResult<Self> {
        let config: HandsyncConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> HandsyncResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> HandsyncResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> HandsyncResult<()> {
        let threshold = self.classifier.extended_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(HandsyncError::InvalidConfig(format!(
                "extended_threshold must be finite and >= 0, got {}",
                threshold
            )));
        }

        let factor = self.smoothing.smoothing_factor;
        if !factor.is_finite() || factor < 0.0 {
            return Err(HandsyncError::InvalidConfig(format!(
                "smoothing_factor must be finite and >= 0, got {}",
                factor
            )));
        }

        let distance = self.smoothing.applied_distance;
        if !distance.is_finite() || distance < 0.0 {
            return Err(HandsyncError::InvalidConfig(format!(
                "applied_distance must be finite and >= 0, got {}",
                distance
            )));
        }

        if !self.display.fingertip_extension.is_finite() {
            return Err(HandsyncError::InvalidConfig(
                "fingertip_extension must be finite".into(),
            ));
        }

        if self.node.tick_rate_hz == 0 {
            return Err(HandsyncError::InvalidConfig(
                "tick_rate_hz must be > 0".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HandsyncConfig::default();
        assert_eq!(config.classifier.extended_threshold, 0.08);
        assert_eq!(config.smoothing.smoothing_factor, 2.0);
        assert_eq!(config.smoothing.applied_distance, 1.0);
        assert_eq!(config.display.fingertip_extension, 0.0);
        assert_eq!(config.node.tick_rate_hz, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = HandsyncConfig::from_json_str(
            r#"{ "smoothing": { "smoothing_factor": 3.0 }, "node": { "local_peer": 7 } }"#,
        )
        .unwrap();

        assert_eq!(config.smoothing.smoothing_factor, 3.0);
        assert_eq!(config.smoothing.applied_distance, 1.0);
        assert_eq!(config.node.local_peer, PeerId::new(7));
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = HandsyncConfig::default();
        config.display.fingertip_extension = 0.25;
        let json = config.to_json_pretty().unwrap();
        assert_eq!(HandsyncConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = HandsyncConfig::from_json_str(r#"{ "smoothing": { "applied_distance": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, HandsyncError::InvalidConfig(_)));

        let err =
            HandsyncConfig::from_json_str(r#"{ "classifier": { "extended_threshold": -0.1 } }"#)
                .unwrap_err();
        assert!(matches!(err, HandsyncError::InvalidConfig(_)));

        let err = HandsyncConfig::from_json_str(r#"{ "node": { "tick_rate_hz": 0 } }"#).unwrap_err();
        assert!(matches!(err, HandsyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = HandsyncConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HandsyncError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = HandsyncConfig::load(Path::new("/nonexistent/handsync.json")).unwrap_err();
        assert!(matches!(err, HandsyncError::ConfigIo(_)));
    }
}
