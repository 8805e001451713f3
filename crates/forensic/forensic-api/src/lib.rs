//! Forensic Scoring API
//!
//! Configuration types and builders for the forensic scoring engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use forensic_spi::{ForensicError, OutlierResult, Result, ScanStatus, Transaction};

// ============================================================================
// Detector Configuration
// ============================================================================

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    #[default]
    IsolationForest,
    #[serde(rename = "robust_zscore")]
    RobustZScore,
}

impl DetectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::IsolationForest => "isolation_forest",
            DetectorKind::RobustZScore => "robust_zscore",
        }
    }
}

impl std::str::FromStr for DetectorKind {
    type Err = ForensicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "isolation_forest" | "iforest" => Ok(DetectorKind::IsolationForest),
            "robust_zscore" | "zscore" | "mad" => Ok(DetectorKind::RobustZScore),
            other => Err(ForensicError::invalid_parameter(
                "detector",
                format!("unknown detector '{}'", other),
            )),
        }
    }
}

/// Outlier detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub kind: DetectorKind,
    /// Expected fraction of outliers in a batch (default: 0.06).
    pub contamination_rate: f64,
    /// Seed for randomized detectors (default: 42).
    pub seed: u64,
    /// Number of isolation trees (default: 100).
    pub n_estimators: usize,
    /// Sub-sample size per tree, capped at the batch size (default: 256).
    pub max_samples: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kind: DetectorKind::IsolationForest,
            contamination_rate: 0.06,
            seed: 42,
            n_estimators: 100,
            max_samples: 256,
        }
    }
}

impl DetectorConfig {
    pub fn new(kind: DetectorKind, contamination_rate: f64) -> Self {
        Self {
            kind,
            contamination_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.contamination_rate > 0.0 && self.contamination_rate <= 0.5) {
            return Err(ForensicError::invalid_parameter(
                "contamination_rate",
                "must be in (0, 0.5]",
            ));
        }
        if self.n_estimators == 0 {
            return Err(ForensicError::invalid_parameter(
                "n_estimators",
                "must be positive",
            ));
        }
        if self.max_samples < 2 {
            return Err(ForensicError::invalid_parameter(
                "max_samples",
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Replay Configuration
// ============================================================================

/// Replay and display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Polling interval between ticks, applied by the caller (default: 1200).
    pub interval_ms: u64,
    /// Maximum number of feed entries kept (default: 1000).
    pub feed_capacity: usize,
    /// Maximum recipient name length shown in the feed (default: 35).
    pub name_width: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1200,
            feed_capacity: 1000,
            name_width: 35,
        }
    }
}

impl ReplayConfig {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed_capacity == 0 {
            return Err(ForensicError::invalid_parameter(
                "feed_capacity",
                "must be positive",
            ));
        }
        if self.name_width == 0 {
            return Err(ForensicError::invalid_parameter(
                "name_width",
                "must be positive",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Top-level forensic engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicConfig {
    pub detector: DetectorConfig,
    pub replay: ReplayConfig,
}

impl ForensicConfig {
    pub fn new(detector: DetectorConfig, replay: ReplayConfig) -> Self {
        Self { detector, replay }
    }

    pub fn builder() -> ForensicConfigBuilder {
        ForensicConfigBuilder::new()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ForensicError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ForensicError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.replay.validate()
    }
}

/// Builder for ForensicConfig.
#[derive(Debug, Default)]
pub struct ForensicConfigBuilder {
    config: ForensicConfig,
}

impl ForensicConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ForensicConfig) -> Self {
        Self { config }
    }

    pub fn detector(mut self, kind: DetectorKind) -> Self {
        self.config.detector.kind = kind;
        self
    }

    pub fn contamination_rate(mut self, rate: f64) -> Self {
        self.config.detector.contamination_rate = rate;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.detector.seed = seed;
        self
    }

    pub fn n_estimators(mut self, n: usize) -> Self {
        self.config.detector.n_estimators = n;
        self
    }

    pub fn max_samples(mut self, n: usize) -> Self {
        self.config.detector.max_samples = n;
        self
    }

    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.replay.interval_ms = interval_ms;
        self
    }

    pub fn feed_capacity(mut self, capacity: usize) -> Self {
        self.config.replay.feed_capacity = capacity;
        self
    }

    pub fn name_width(mut self, width: usize) -> Self {
        self.config.replay.name_width = width;
        self
    }

    /// Build the configuration, validating every field.
    pub fn build(self) -> Result<ForensicConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ForensicConfig::default();
        assert_eq!(config.detector.kind, DetectorKind::IsolationForest);
        assert_eq!(config.detector.contamination_rate, 0.06);
        assert_eq!(config.detector.seed, 42);
        assert_eq!(config.replay.interval_ms, 1200);
        assert_eq!(config.replay.feed_capacity, 1000);
        assert_eq!(config.replay.name_width, 35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ForensicConfig::builder()
            .detector(DetectorKind::RobustZScore)
            .contamination_rate(0.1)
            .seed(7)
            .interval_ms(0)
            .build()
            .unwrap();
        assert_eq!(config.detector.kind, DetectorKind::RobustZScore);
        assert_eq!(config.detector.contamination_rate, 0.1);
        assert_eq!(config.detector.seed, 7);
        assert_eq!(config.replay.interval_ms, 0);
    }

    #[test]
    fn test_builder_rejects_bad_contamination() {
        let err = ForensicConfig::builder()
            .contamination_rate(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ForensicError::InvalidParameter { ref name, .. } if name == "contamination_rate"
        ));

        assert!(ForensicConfig::builder().contamination_rate(0.75).build().is_err());
        assert!(ForensicConfig::builder().contamination_rate(f64::NAN).build().is_err());
    }

    #[test]
    fn test_builder_rejects_zero_feed_capacity() {
        assert!(ForensicConfig::builder().feed_capacity(0).build().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config =
            ForensicConfig::from_json_str(r#"{"detector": {"contamination_rate": 0.1}}"#).unwrap();
        assert_eq!(config.detector.contamination_rate, 0.1);
        assert_eq!(config.detector.seed, 42);
        assert_eq!(config.replay, ReplayConfig::default());
    }

    #[test]
    fn test_json_detector_kind() {
        let config =
            ForensicConfig::from_json_str(r#"{"detector": {"kind": "robust_zscore"}}"#).unwrap();
        assert_eq!(config.detector.kind, DetectorKind::RobustZScore);
    }

    #[test]
    fn test_detector_kind_serde_matches_name() {
        for kind in [DetectorKind::IsolationForest, DetectorKind::RobustZScore] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            assert_eq!(serde_json::from_str::<DetectorKind>(&json).unwrap(), kind);
            assert_eq!(kind.name().parse::<DetectorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_json_malformed() {
        let err = ForensicConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ForensicError::Config(_)));
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"replay": {{"interval_ms": 250}}}}"#).unwrap();
        let config = ForensicConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.replay.interval_ms, 250);
    }

    #[test]
    fn test_detector_kind_from_str() {
        assert_eq!("iforest".parse::<DetectorKind>().unwrap(), DetectorKind::IsolationForest);
        assert_eq!("MAD".parse::<DetectorKind>().unwrap(), DetectorKind::RobustZScore);
        assert!("lof".parse::<DetectorKind>().is_err());
    }
}
