//! Dataset configuration management.
//!
//! One struct carries the full configuration surface of a dataset build,
//! with serialization support so experiments are reproducible from a
//! version-controlled file. The core never reads configuration files on its
//! own during construction; the save/load helpers exist for callers.
//!
//! # Example
//!
//! ```ignore
//! use embryo_windowing::DatasetConfig;
//!
//! let config = DatasetConfig::default()
//!     .with_window_size(8)
//!     .with_balance_flags(true);
//! config.save_toml("experiment.toml")?;
//!
//! let loaded = DatasetConfig::load_toml("experiment.toml")?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::windowing::WindowConfig;

/// Configuration surface consumed by the dataset build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Number of frames per window (8 for the frame-sequence model, 32 for
    /// the video model).
    pub window_size: usize,

    /// Sliding-window stride during training-data construction. Inference
    /// always uses stride 1 regardless of this value.
    pub stride: usize,

    /// Allow more than two phases inside a window (permissive validation).
    pub multiple_phases: bool,

    /// Subsample the population to an exact 1:1 transition-flag balance.
    pub balance_flags: bool,

    /// Seed driving every random draw of the build (video subsampling,
    /// balancing). Same seed + same input = same selections.
    pub seed: u64,

    /// Cap on the number of distinct videos, drawn with a seeded sample.
    /// `None` uses every video.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_videos: Option<usize>,

    /// Experiment metadata (optional, for bookkeeping only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<ExperimentMetadata>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            window_size: 8,
            stride: 1,
            multiple_phases: false,
            balance_flags: false,
            seed: 42,
            max_videos: None,
            metadata: None,
        }
    }
}

impl DatasetConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the training stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Select permissive chronology validation.
    pub fn with_multiple_phases(mut self, allow: bool) -> Self {
        self.multiple_phases = allow;
        self
    }

    /// Enable or disable class balancing.
    pub fn with_balance_flags(mut self, balance: bool) -> Self {
        self.balance_flags = balance;
        self
    }

    /// Set the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cap the number of videos used.
    pub fn with_max_videos(mut self, limit: Option<usize>) -> Self {
        self.max_videos = limit;
        self
    }

    /// Attach experiment metadata.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The windowing parameters of this configuration.
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig::new(self.window_size, self.stride)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.window_config().validate()
    }

    /// Save to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name.
    pub name: String,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Creation timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,

    /// Version or git commit.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,

    /// Custom tags.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tags: Option<Vec<String>>,
}

impl ExperimentMetadata {
    /// Metadata with the given name, stamped with the current time.
    pub fn now(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            version: None,
            tags: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_training_pipeline() {
        let config = DatasetConfig::default();
        assert_eq!(config.window_size, 8);
        assert_eq!(config.stride, 1);
        assert!(!config.multiple_phases);
        assert!(!config.balance_flags);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_videos, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_compose() {
        let config = DatasetConfig::new()
            .with_window_size(32)
            .with_stride(4)
            .with_multiple_phases(true)
            .with_balance_flags(true)
            .with_seed(7)
            .with_max_videos(Some(10));

        assert_eq!(config.window_size, 32);
        assert_eq!(config.stride, 4);
        assert!(config.multiple_phases);
        assert!(config.balance_flags);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_videos, Some(10));
        assert_eq!(config.window_config(), WindowConfig::new(32, 4));
    }

    #[test]
    fn zero_parameters_fail_validation() {
        assert!(DatasetConfig::new().with_window_size(0).validate().is_err());
        assert!(DatasetConfig::new().with_stride(0).validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("experiment.toml");

        let config = DatasetConfig::new()
            .with_window_size(32)
            .with_balance_flags(true)
            .with_metadata(ExperimentMetadata::now("video-model-run"));
        config.save_toml(&path).unwrap();

        let loaded = DatasetConfig::load_toml(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("experiment.json");

        let config = DatasetConfig::new().with_stride(2).with_max_videos(Some(5));
        config.save_json(&path).unwrap();

        let loaded = DatasetConfig::load_json(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_optionals_deserialize_as_none() {
        let config: DatasetConfig = toml::from_str(
            "window_size = 8\nstride = 1\nmultiple_phases = false\nbalance_flags = false\nseed = 42\n",
        )
        .unwrap();
        assert_eq!(config.max_videos, None);
        assert!(config.metadata.is_none());
    }
}
